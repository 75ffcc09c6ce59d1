//! Recording fake for unit tests. Every capability call is logged, fds and
//! pids are invented sequentially, and individual calls can be told to fail.

use std::collections::{HashSet, VecDeque};
use std::io;

use nix::unistd::Pid;

use crate::executor::redirect::RedirectKind;

use super::{Fd, Platform};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRecord {
    pub argv: Vec<String>,
    pub fdin: Fd,
    pub fdout: Fd,
    pub pgid: Option<Pid>,
    pub pid: Pid,
}

#[derive(Debug, Default)]
pub struct MockPlatform {
    next_fd: Fd,
    next_pid: i32,
    pub spawns: Vec<SpawnRecord>,
    pub opens: Vec<(String, RedirectKind, Fd)>,
    pub pipes: Vec<(Fd, Fd)>,
    pub closed: Vec<Fd>,
    /// `Some(pgid)` for a handoff, `None` for a reclaim.
    pub foreground: Vec<Option<Pid>>,
    pub waited: Vec<Pid>,
    pub reapable: VecDeque<Pid>,
    pub chdirs: Vec<String>,
    pub home: Option<String>,
    pub fail_opens: HashSet<String>,
    pub fail_chdirs: HashSet<String>,
    pub fail_spawn: bool,
}

impl MockPlatform {
    pub fn new() -> Self {
        MockPlatform {
            next_fd: 3,
            next_pid: 100,
            home: Some("/home/tester".to_string()),
            ..Default::default()
        }
    }

    pub fn queue_reap(&mut self, pid: i32) {
        self.reapable.push_back(Pid::from_raw(pid));
    }
}

impl Platform for MockPlatform {
    fn open_path(&mut self, path: &str, kind: RedirectKind) -> io::Result<Fd> {
        if self.fail_opens.contains(path) {
            return Err(io::Error::from_raw_os_error(libc::ENOENT));
        }
        let fd = self.next_fd;
        self.next_fd += 1;
        self.opens.push((path.to_string(), kind, fd));
        Ok(fd)
    }

    fn make_pipe(&mut self) -> io::Result<(Fd, Fd)> {
        let read_end = self.next_fd;
        let write_end = self.next_fd + 1;
        self.next_fd += 2;
        self.pipes.push((read_end, write_end));
        Ok((read_end, write_end))
    }

    fn close_fd(&mut self, fd: Fd) {
        self.closed.push(fd);
    }

    fn spawn(
        &mut self,
        argv: &[String],
        fdin: Fd,
        fdout: Fd,
        pgid: Option<Pid>,
    ) -> io::Result<Pid> {
        if self.fail_spawn {
            return Err(io::Error::from_raw_os_error(libc::EAGAIN));
        }
        let pid = Pid::from_raw(self.next_pid);
        self.next_pid += 1;
        self.spawns.push(SpawnRecord {
            argv: argv.to_vec(),
            fdin,
            fdout,
            pgid,
            pid,
        });
        Ok(pid)
    }

    fn set_foreground(&mut self, pgid: Pid) {
        self.foreground.push(Some(pgid));
    }

    fn restore_foreground(&mut self) {
        self.foreground.push(None);
    }

    fn wait_for(&mut self, pid: Pid) {
        self.waited.push(pid);
    }

    fn try_reap(&mut self) -> Option<Pid> {
        self.reapable.pop_front()
    }

    fn change_dir(&mut self, path: &str) -> io::Result<()> {
        if self.fail_chdirs.contains(path) {
            return Err(io::Error::from_raw_os_error(libc::ENOENT));
        }
        self.chdirs.push(path.to_string());
        Ok(())
    }

    fn home_dir(&self) -> Option<String> {
        self.home.clone()
    }
}
