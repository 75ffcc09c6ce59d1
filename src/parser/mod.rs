pub mod segments;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("unexpected token: \"{0}\"")]
    UnexpectedToken(String),
}

pub use segments::{Segment, SegmentWalker};
