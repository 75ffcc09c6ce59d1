use crate::lexer::{Separator, Token, TokenKind};

use super::SegmentError;

/// A maximal run of consecutive word tokens, together with the operator that
/// preceded it (`None` for the first segment of a line) and the operator
/// that terminated it (`None` at end of stream).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub words: &'a [Token],
    pub preceding: Option<Separator>,
    pub terminator: Option<Separator>,
}

/// Partitions a token stream into alternating word-run/operator pairs.
///
/// A segment with zero words is a grammar violation, reported with the
/// offending operator's lexeme. Two empty segments are tolerated and end the
/// walk cleanly instead: the completely empty line, and the tail left behind
/// by a trailing background operator (`cmd &`).
pub struct SegmentWalker<'a> {
    tokens: &'a [Token],
    cursor: usize,
    preceding: Option<Separator>,
    done: bool,
}

impl<'a> SegmentWalker<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        SegmentWalker {
            tokens,
            cursor: 0,
            preceding: None,
            done: false,
        }
    }

    pub fn next_segment(&mut self) -> Result<Option<Segment<'a>>, SegmentError> {
        if self.done {
            return Ok(None);
        }
        let preceding = self.preceding;
        let start = self.cursor;
        let mut end = start;
        let mut terminator = None;
        while end < self.tokens.len() {
            let token = &self.tokens[end];
            match token.kind {
                TokenKind::Word => end += 1,
                TokenKind::Operator => {
                    terminator = Separator::from_lexeme(&token.lexeme);
                    debug_assert!(terminator.is_some(), "non-catalog operator: {:?}", token);
                    break;
                }
            }
        }
        match terminator {
            Some(_) => self.cursor = end + 1,
            None => self.done = true,
        }
        self.preceding = terminator;
        if start == end {
            self.done = true;
            let offending = match (terminator, preceding) {
                (Some(sep), _) => sep,
                (None, None) | (None, Some(Separator::Background)) => return Ok(None),
                (None, Some(sep)) => sep,
            };
            return Err(SegmentError::UnexpectedToken(offending.lexeme().to_string()));
        }
        Ok(Some(Segment {
            words: &self.tokens[start..end],
            preceding,
            terminator,
        }))
    }
}
