use log::debug;

use crate::error::{Fault, report_fault, report_finished, report_started};
use crate::lexer::{Separator, Token};
use crate::parser::{Segment, SegmentWalker};
use crate::platform::{Platform, STDIN_FD, STDOUT_FD};

use super::builtin;
use super::redirect::RedirectKind;
use super::stage::CommandStage;

/// The pipeline builder and process orchestrator. One instance is owned by
/// the caller and reused across lines; all OS access goes through the
/// platform adapter, so the logic runs unchanged against the recording fake
/// in tests.
pub struct Interpreter<P: Platform> {
    platform: P,
}

impl<P: Platform> Interpreter<P> {
    pub fn new(platform: P) -> Self {
        Interpreter { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Report every background process that has exited since the last call.
    /// Runs before each new input line is read.
    pub fn reap_finished(&mut self) {
        while let Some(pid) = self.platform.try_reap() {
            report_finished(pid);
        }
    }

    /// Build and launch every stage of one line. The first fault is reported
    /// and aborts the rest of the line, but stages spawned before it are
    /// still waited on and the terminal is handed back to the shell.
    pub fn run_line(&mut self, tokens: &[Token]) -> Result<(), Fault> {
        debug!("running line of {} tokens", tokens.len());
        let mut walker = SegmentWalker::new(tokens);
        let mut stage = CommandStage::new();
        let mut outcome = Ok(());
        loop {
            match walker.next_segment() {
                Ok(Some(segment)) => {
                    if let Err(fault) = self.handle_segment(&segment, &mut stage) {
                        report_fault(&fault);
                        outcome = Err(fault);
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    let fault = Fault::from(err);
                    report_fault(&fault);
                    outcome = Err(fault);
                    break;
                }
            }
        }
        self.finish(&mut stage);
        outcome
    }

    fn handle_segment(
        &mut self,
        segment: &Segment<'_>,
        stage: &mut CommandStage,
    ) -> Result<(), Fault> {
        match segment.preceding.and_then(RedirectKind::from_separator) {
            Some(kind) => {
                // the segment after a redirection operator is its target:
                // exactly one word
                if let Some(extra) = segment.words.get(1) {
                    return Err(Fault::UnexpectedToken(extra.lexeme.clone()));
                }
                self.bind_redirect(stage, kind, &segment.words[0].lexeme)?;
            }
            None => stage
                .args
                .extend(segment.words.iter().map(|token| token.lexeme.clone())),
        }
        match segment.terminator {
            Some(Separator::Pipe) => self.launch_piped(stage),
            Some(Separator::Background) => self.launch_background(stage),
            None => self.launch(stage),
            // a redirection operator: its target arrives with the next segment
            Some(_) => Ok(()),
        }
    }

    fn bind_redirect(
        &mut self,
        stage: &mut CommandStage,
        kind: RedirectKind,
        path: &str,
    ) -> Result<(), Fault> {
        let bound = if kind.is_input() {
            stage.fdin
        } else {
            stage.fdout
        };
        // a slot still holding a standard descriptor is unbound; anything
        // else (a file or a pipe end) must not be rebound
        if bound != STDIN_FD && bound != STDOUT_FD {
            return Err(Fault::Redirection(path.to_string()));
        }
        let fd = self
            .platform
            .open_path(path, kind)
            .map_err(|_| Fault::OpenFile(path.to_string()))?;
        if kind.is_input() {
            stage.fdin = fd;
        } else {
            stage.fdout = fd;
        }
        Ok(())
    }

    /// Launch the pending stage with a fresh pipe on its output and seed the
    /// next stage's input with the read end.
    fn launch_piped(&mut self, stage: &mut CommandStage) -> Result<(), Fault> {
        if stage.fdout != STDOUT_FD {
            // a file-bound output cannot also feed a pipe; checked before
            // the pipe exists
            let name = stage.args.first().cloned().unwrap_or_default();
            return Err(Fault::Redirection(name));
        }
        let (read_end, write_end) = self
            .platform
            .make_pipe()
            .map_err(|_| Fault::SpawnProcess(stage.args.first().cloned().unwrap_or_default()))?;
        stage.fdout = write_end;
        let result = self.launch(stage);
        // seeded even when the launch failed, so finish() closes it
        stage.fdin = read_end;
        result
    }

    /// Launch the pending stage detached: report its pids, forget them, and
    /// hand the terminal back so the next pipeline on the line starts fresh.
    fn launch_background(&mut self, stage: &mut CommandStage) -> Result<(), Fault> {
        self.launch(stage)?;
        for pid in stage.pids.drain(..) {
            report_started(pid);
        }
        self.platform.restore_foreground();
        stage.pgid = None;
        Ok(())
    }

    /// Dispatch the pending stage: the cd builtin in-process, anything else
    /// as a spawned child. The stage's descriptors are closed in the shell
    /// and reset afterwards either way.
    fn launch(&mut self, stage: &mut CommandStage) -> Result<(), Fault> {
        let args = std::mem::take(&mut stage.args);
        let result = match args.first().map(String::as_str) {
            None => Ok(()),
            Some(builtin::CD) => {
                // a failed cd aborts this command step only, not the line
                if let Err(fault) = builtin::change_dir(&mut self.platform, &args) {
                    report_fault(&fault);
                }
                Ok(())
            }
            Some(program) => self
                .spawn(&args, stage)
                .map_err(|_| Fault::SpawnProcess(program.to_string())),
        };
        self.reset_fds(stage);
        result
    }

    fn spawn(&mut self, args: &[String], stage: &mut CommandStage) -> std::io::Result<()> {
        let pid = self
            .platform
            .spawn(args, stage.fdin, stage.fdout, stage.pgid)?;
        debug!("spawned {} as pid {pid}", args[0]);
        if stage.pgid.is_none() {
            // the first process leads the pipeline's group and gets the
            // terminal; keyboard signals go to it, not the shell
            stage.pgid = Some(pid);
            self.platform.set_foreground(pid);
        }
        stage.pids.push(pid);
        Ok(())
    }

    fn reset_fds(&mut self, stage: &mut CommandStage) {
        if stage.fdin != STDIN_FD {
            self.platform.close_fd(stage.fdin);
            stage.fdin = STDIN_FD;
        }
        if stage.fdout != STDOUT_FD {
            self.platform.close_fd(stage.fdout);
            stage.fdout = STDOUT_FD;
        }
    }

    /// Close anything still bound, wait out every tracked pid and take the
    /// terminal back. Runs at the end of every line, faulted or not.
    fn finish(&mut self, stage: &mut CommandStage) {
        self.reset_fds(stage);
        for pid in stage.pids.drain(..) {
            self.platform.wait_for(pid);
        }
        self.platform.restore_foreground();
        stage.pgid = None;
    }
}
