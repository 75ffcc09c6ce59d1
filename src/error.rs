use nix::unistd::Pid;
use thiserror::Error;

use crate::parser::SegmentError;

/// Everything the shell reports on a diagnostic line. The rendered form is
/// `<reason>: "<token-or-path>"`; callers prepend the `shell: fault: `
/// prefix. The format is line-oriented and stable so scripts can match it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unexpected token: \"{0}\"")]
    UnexpectedToken(String),
    #[error("redirection: \"{0}\"")]
    Redirection(String),
    #[error("open file: \"{0}\"")]
    OpenFile(String),
    #[error("execute program: \"{0}\"")]
    ExecuteProgram(String),
    #[error("change directory: \"{0}\"")]
    ChangeDirectory(String),
    #[error("spawn process: \"{0}\"")]
    SpawnProcess(String),
}

impl From<SegmentError> for Fault {
    fn from(err: SegmentError) -> Self {
        match err {
            SegmentError::UnexpectedToken(lexeme) => Fault::UnexpectedToken(lexeme),
        }
    }
}

/// Fault lines go to stderr.
pub fn report_fault(fault: &Fault) {
    eprintln!("shell: fault: {fault}");
}

/// Info lines go to stdout.
pub fn report_started(pid: Pid) {
    println!("shell: info: started: [{pid}]");
}

pub fn report_finished(pid: Pid) {
    println!("shell: info: finished: [{pid}]");
}
