use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::executor::Interpreter;
use crate::lexer::{Lexer, Token};
use crate::platform::Platform;

/// Read logical lines and run them until input is exhausted. A logical line
/// ends at a newline only once the lexer reports the pending token closed,
/// so quoted or escaped text may span raw lines (no continuation prompt is
/// shown). Exhausted input ends the loop with success, whatever the
/// commands themselves did.
pub fn run<R: BufRead, P: Platform>(
    mut input: R,
    interpreter: &mut Interpreter<P>,
    config: &Config,
) -> anyhow::Result<()> {
    let mut lexer = Lexer::new();
    loop {
        // exited background children are reported before any new tokens
        interpreter.reap_finished();
        print!("{}", config.prompt);
        io::stdout().flush()?;
        let Some(tokens) = read_tokens(&mut input, &mut lexer)? else {
            println!();
            return Ok(());
        };
        let _ = interpreter.run_line(&tokens);
    }
}

/// Feed raw chunks to the lexer until the logical line completes. End of
/// input is `None`, distinct from any fault; a partial line at EOF is
/// discarded.
fn read_tokens<R: BufRead>(input: &mut R, lexer: &mut Lexer) -> io::Result<Option<Vec<Token>>> {
    let mut chunk = String::new();
    loop {
        chunk.clear();
        if input.read_line(&mut chunk)? == 0 {
            *lexer = Lexer::new();
            return Ok(None);
        }
        lexer.advance(&chunk);
        if chunk.ends_with('\n') && lexer.is_line_complete() {
            return Ok(Some(lexer.take_tokens()));
        }
    }
}
