use std::ffi::CString;
use std::io::{self, Write};
use std::os::fd::IntoRawFd;

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{self, ForkResult, Pid, fork};

use crate::error::Fault;
use crate::executor::redirect::RedirectKind;

use super::{Fd, Platform, STDIN_FD, STDOUT_FD};

const OPEN_PERMS: libc::c_int = 0o666;

/// The real adapter: fork/exec process control, pipes and redirect files
/// opened close-on-exec, terminal ownership via tcsetpgrp, zombie reaping
/// with waitpid.
pub struct UnixPlatform;

impl UnixPlatform {
    pub fn new() -> Self {
        UnixPlatform
    }
}

impl Default for UnixPlatform {
    fn default() -> Self {
        UnixPlatform::new()
    }
}

impl Platform for UnixPlatform {
    fn open_path(&mut self, path: &str, kind: RedirectKind) -> io::Result<Fd> {
        let c_path = CString::new(path)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))?;
        // close-on-exec keeps the fd out of sibling stages; dup2 onto a
        // standard descriptor clears the flag for the stage it belongs to
        let flags = match kind {
            RedirectKind::Read => libc::O_RDONLY,
            RedirectKind::Write => libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
            RedirectKind::Append => libc::O_WRONLY | libc::O_CREAT | libc::O_APPEND,
        } | libc::O_CLOEXEC;
        let fd = unsafe { libc::open(c_path.as_ptr(), flags, OPEN_PERMS) };
        if fd == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(fd)
    }

    fn make_pipe(&mut self) -> io::Result<(Fd, Fd)> {
        let (read_end, write_end) = unistd::pipe2(OFlag::O_CLOEXEC).map_err(io::Error::from)?;
        Ok((read_end.into_raw_fd(), write_end.into_raw_fd()))
    }

    fn close_fd(&mut self, fd: Fd) {
        let _ = unistd::close(fd);
    }

    fn spawn(
        &mut self,
        argv: &[String],
        fdin: Fd,
        fdout: Fd,
        pgid: Option<Pid>,
    ) -> io::Result<Pid> {
        debug_assert!(!argv.is_empty());
        let mut c_argv = Vec::with_capacity(argv.len());
        for arg in argv {
            c_argv.push(CString::new(arg.as_str()).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "argument contains NUL")
            })?);
        }
        // prepared up front: the child must not allocate between fork and exec
        let exec_fault = format!(
            "shell: fault: {}\n",
            Fault::ExecuteProgram(argv[0].clone())
        );
        // buffered shell output must not be replayed by the child
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        match unsafe { fork() }.map_err(io::Error::from)? {
            ForkResult::Child => {
                let pid = unistd::getpid();
                let _ = unistd::setpgid(pid, pgid.unwrap_or(pid));
                if fdin != STDIN_FD {
                    let _ = unistd::dup2(fdin, STDIN_FD);
                    let _ = unistd::close(fdin);
                }
                if fdout != STDOUT_FD {
                    let _ = unistd::dup2(fdout, STDOUT_FD);
                    let _ = unistd::close(fdout);
                }
                let _ = unistd::execvp(&c_argv[0], &c_argv);
                // reachable only when exec failed; the fault stays local to
                // the child, the parent just sees a nonzero exit
                unsafe {
                    libc::write(
                        libc::STDERR_FILENO,
                        exec_fault.as_ptr() as *const libc::c_void,
                        exec_fault.len(),
                    );
                    libc::_exit(1)
                }
            }
            ForkResult::Parent { child } => Ok(child),
        }
    }

    fn set_foreground(&mut self, pgid: Pid) {
        // fails without a controlling terminal, which is harmless
        unsafe {
            libc::tcsetpgrp(STDIN_FD, pgid.as_raw());
        }
    }

    fn restore_foreground(&mut self) {
        // reclaiming the terminal from a background group raises SIGTTOU;
        // hold it ignored for the duration of the handoff
        unsafe {
            let previous = libc::signal(libc::SIGTTOU, libc::SIG_IGN);
            libc::tcsetpgrp(STDIN_FD, libc::getpgid(0));
            libc::signal(libc::SIGTTOU, previous);
        }
    }

    fn wait_for(&mut self, pid: Pid) {
        // EINTR is the only retryable failure; anything else means the pid
        // is already gone
        while let Err(Errno::EINTR) = waitpid(pid, None) {}
    }

    fn try_reap(&mut self) -> Option<Pid> {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) | Err(_) => None,
            Ok(status) => status.pid(),
        }
    }

    fn change_dir(&mut self, path: &str) -> io::Result<()> {
        std::env::set_current_dir(path)
    }

    fn home_dir(&self) -> Option<String> {
        std::env::var("HOME").ok()
    }
}
