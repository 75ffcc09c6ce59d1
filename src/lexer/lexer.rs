use log::trace;

use super::separators::{is_separator_prefix, starts_separator};
use super::token::{Token, TokenKind};

const QUOTE_CHAR: char = '"';
const ESCAPE_CHAR: char = '\\';

/// Incremental tokenizer. Characters are fed in whatever chunks the input
/// source produces; finished tokens accumulate until the caller takes them.
///
/// The pending token tracks whether it has been *started*: a quote marks the
/// token started even when nothing has been appended yet, so `""` survives
/// as an explicit empty argument.
pub struct Lexer {
    tokens: Vec<Token>,
    pending: String,
    kind: TokenKind,
    started: bool,
    in_quotes: bool,
    in_escape: bool,
}

impl Lexer {
    pub fn new() -> Self {
        Lexer {
            tokens: Vec::new(),
            pending: String::new(),
            kind: TokenKind::Word,
            started: false,
            in_quotes: false,
            in_escape: false,
        }
    }

    /// Consume every character of `chunk`.
    pub fn advance(&mut self, chunk: &str) {
        for c in chunk.chars() {
            self.step(c);
        }
    }

    /// True when the previous character completed a token cleanly. Combined
    /// with "the input ended in a newline" this decides whether a logical
    /// line is finished; a bare newline check is not enough because quoted
    /// and escaped text may embed newlines.
    pub fn is_line_complete(&self) -> bool {
        !self.started
    }

    /// Hand over the finished stream and reset for the next line.
    pub fn take_tokens(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.tokens)
    }

    fn step(&mut self, c: char) {
        if self.kind == TokenKind::Operator {
            if self.extends_operator(c) {
                self.pending.push(c);
                return;
            }
            // the operator cannot grow further; `c` is reprocessed below as
            // the start of a new token
            self.flush();
        }
        if self.in_escape {
            // the escaped character is literal whatever it is, ahead of
            // quoting, whitespace and operator detection
            self.pending.push(c);
            self.started = true;
            self.in_escape = false;
        } else if c == ESCAPE_CHAR {
            self.in_escape = true;
        } else if self.in_quotes {
            if c == QUOTE_CHAR {
                self.in_quotes = false;
            } else {
                self.pending.push(c);
            }
        } else if c == QUOTE_CHAR {
            // the quote itself is dropped, but it marks the word present
            self.started = true;
            self.in_quotes = true;
        } else if c.is_whitespace() {
            if self.started {
                self.flush();
            }
        } else if starts_separator(c) {
            if self.started {
                self.flush();
            }
            self.pending.push(c);
            self.started = true;
            self.kind = TokenKind::Operator;
        } else {
            self.pending.push(c);
            self.started = true;
        }
    }

    fn extends_operator(&self, c: char) -> bool {
        let mut candidate = self.pending.clone();
        candidate.push(c);
        is_separator_prefix(&candidate)
    }

    fn flush(&mut self) {
        let token = Token {
            kind: self.kind,
            lexeme: std::mem::take(&mut self.pending),
        };
        trace!("token finalized: {:?}", token);
        self.tokens.push(token);
        self.kind = TokenKind::Word;
        self.started = false;
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Lexer::new()
    }
}
