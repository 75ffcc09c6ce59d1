use nix::unistd::Pid;

use crate::platform::{Fd, STDIN_FD, STDOUT_FD};

/// Build state for one pipeline member. Descriptors start at the standard
/// ones and are rebound by redirections or pipe wiring; `pgid` is unset
/// until the pipeline's first process is spawned and owns the group for the
/// rest of the pipeline; `pids` tracks every process spawned for it.
#[derive(Debug)]
pub struct CommandStage {
    pub fdin: Fd,
    pub fdout: Fd,
    pub args: Vec<String>,
    pub pgid: Option<Pid>,
    pub pids: Vec<Pid>,
}

impl CommandStage {
    pub fn new() -> Self {
        CommandStage {
            fdin: STDIN_FD,
            fdout: STDOUT_FD,
            args: Vec::new(),
            pgid: None,
            pids: Vec::new(),
        }
    }
}

impl Default for CommandStage {
    fn default() -> Self {
        CommandStage::new()
    }
}
