pub mod unix;

#[cfg(test)]
pub mod mock;

use std::io;

use nix::unistd::Pid;

use crate::executor::redirect::RedirectKind;

/// Raw file descriptor as the orchestrator tracks it.
pub type Fd = i32;

pub const STDIN_FD: Fd = 0;
pub const STDOUT_FD: Fd = 1;

/// The OS capabilities the interpreter needs. `UnixPlatform` backs real
/// execution; the recording fake in `mock` backs unit tests of the builder
/// and orchestrator without spawning anything.
pub trait Platform {
    /// Open a redirection target. Write modes create the file with 0666.
    fn open_path(&mut self, path: &str, kind: RedirectKind) -> io::Result<Fd>;

    /// A fresh pipe as (read end, write end).
    fn make_pipe(&mut self) -> io::Result<(Fd, Fd)>;

    fn close_fd(&mut self, fd: Fd);

    /// Fork and exec `argv` with the given stdin/stdout bindings. The child
    /// joins process group `pgid`, or leads a fresh group when `None`.
    /// Returns the child pid; an exec failure stays inside the child.
    fn spawn(
        &mut self,
        argv: &[String],
        fdin: Fd,
        fdout: Fd,
        pgid: Option<Pid>,
    ) -> io::Result<Pid>;

    /// Hand terminal-generated signals to the given process group.
    fn set_foreground(&mut self, pgid: Pid);

    /// Take the terminal back for the shell's own group.
    fn restore_foreground(&mut self);

    /// Block until `pid` exits.
    fn wait_for(&mut self, pid: Pid);

    /// Non-blocking poll for any exited child.
    fn try_reap(&mut self) -> Option<Pid>;

    fn change_dir(&mut self, path: &str) -> io::Result<()>;

    fn home_dir(&self) -> Option<String>;
}

pub use unix::UnixPlatform;
