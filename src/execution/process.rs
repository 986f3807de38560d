//! Install a scope, drop privilege, then run a program in it
//!
//! The sequence is fixed and each step completes before the next starts:
//! 1. Install the resolved scope as the caller's own (a single host call)
//! 2. Drop effective group, then effective user, to the real ids
//! 3. Fork; the child only execs (see `child`)
//! 4. Wait for the child and interpret its status

use crate::execution::child;
use crate::execution::context::{ExecContext, ExecStage};
use crate::execution::outcome::{ChildStatus, ExitOutcome, StatusMode};
use crate::execution::request::ExecRequest;
use crate::host::ScopeHost;
use crate::scope::ScopeHandle;
use bsexec_core::privilege::drop_to_real;
use bsexec_core::{BsexecError, DropPolicy, Result};
use log::{debug, info, warn};
use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, fork};
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{AsRawFd, OwnedFd};

/// Knobs for a privileged run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecOptions {
    pub status: StatusMode,
    pub privilege_drop: DropPolicy,
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StatusMode) -> Self {
        self.status = status;
        self
    }

    pub fn with_privilege_drop(mut self, policy: DropPolicy) -> Self {
        self.privilege_drop = policy;
        self
    }
}

/// Runs programs inside a scope supplied by the caller
pub struct PrivilegedExec<'h, H: ScopeHost + ?Sized> {
    host: &'h H,
    options: ExecOptions,
}

impl<'h, H: ScopeHost + ?Sized> PrivilegedExec<'h, H> {
    pub fn new(host: &'h H, options: ExecOptions) -> Self {
        Self { host, options }
    }

    /// Run `request` inside `handle` with a fresh context
    pub fn run(&self, handle: ScopeHandle, request: &ExecRequest) -> Result<ExitOutcome> {
        let mut ctx = ExecContext::new(handle);
        self.run_in(&mut ctx, request)
    }

    /// Run `request` using `ctx`, which records how far the sequence got
    pub fn run_in(&self, ctx: &mut ExecContext, request: &ExecRequest) -> Result<ExitOutcome> {
        if ctx.stage() != ExecStage::Init {
            return Err(BsexecError::InvalidRequest(format!(
                "execution context already used (stage {:?})",
                ctx.stage()
            )));
        }

        let command = request.prepare()?;

        self.host
            .install_scope(ctx.scope())
            .map_err(|status| BsexecError::ScopeInstall(status.to_string()))?;
        ctx.advance(ExecStage::ScopeInstalled);

        let identity = drop_to_real(&ctx.identity(), self.options.privilege_drop)?;
        ctx.record_identity(identity);
        ctx.advance(ExecStage::PrivilegeDropped);

        let (error_read, error_write) = exec_error_pipe()?;
        let error_fd = error_write.as_raw_fd();

        info!("Executing: {} {:?}", request.program(), request.args());

        // SAFETY: the child branch only calls `replace_image`, which never
        // returns and uses nothing but async-signal-safe calls.
        let child = match unsafe { fork() } {
            Ok(ForkResult::Child) => child::replace_image(&command, error_fd),
            Ok(ForkResult::Parent { child }) => child,
            Err(e) => return Err(BsexecError::Fork(e.to_string())),
        };
        ctx.advance(ExecStage::Duplicated);
        drop(error_write);

        let exec_error = read_exec_error(error_read);
        match exec_error {
            Ok(None) => ctx.advance(ExecStage::Replaced),
            Ok(Some(_)) => ctx.advance(ExecStage::Terminated),
            Err(_) => {}
        }
        let status = wait_for_child(child)?;
        ctx.advance(ExecStage::Reaped);
        debug!("Child {} {}", child, status);

        if let Some(errno) = exec_error? {
            return Err(BsexecError::Exec(format!(
                "{}: {}",
                request.program(),
                io::Error::from_raw_os_error(errno)
            )));
        }

        Ok(self.options.status.interpret(status))
    }
}

/// Pipe the child reports exec failure on. Both ends are close-on-exec, so
/// a successful exec closes the write end and the parent reads nothing.
fn exec_error_pipe() -> Result<(OwnedFd, OwnedFd)> {
    let (read_end, write_end) =
        nix::unistd::pipe().map_err(|e| BsexecError::Fork(format!("pipe failed: {}", e)))?;

    // Not atomic: a fork on another thread before FD_CLOEXEC is set leaks
    // the write end, and our read then waits for that unrelated child too.
    // macOS has no pipe2.
    for fd in [&read_end, &write_end] {
        // SAFETY: fd is a valid descriptor owned by this function
        if unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETFD, libc::FD_CLOEXEC) } == -1 {
            return Err(BsexecError::Io(io::Error::last_os_error()));
        }
    }

    Ok((read_end, write_end))
}

/// Blocks until the child has exec'd or exited
fn read_exec_error(read_end: OwnedFd) -> Result<Option<i32>> {
    let mut buf = Vec::with_capacity(4);
    File::from(read_end).read_to_end(&mut buf)?;

    if buf.len() < 4 {
        if !buf.is_empty() {
            warn!("Ignoring truncated exec error report ({} bytes)", buf.len());
        }
        return Ok(None);
    }

    let mut errno = [0u8; 4];
    errno.copy_from_slice(&buf[..4]);
    Ok(Some(i32::from_ne_bytes(errno)))
}

/// Wait for child process and get its termination status
fn wait_for_child(pid: Pid) -> Result<ChildStatus> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, status)) => return Ok(ChildStatus::Exited(status)),
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                return Ok(ChildStatus::Signaled(signal as i32));
            }
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(BsexecError::Wait(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_builder() {
        let options = ExecOptions::new()
            .with_status(StatusMode::Raw)
            .with_privilege_drop(DropPolicy::Lenient);
        assert_eq!(options.status, StatusMode::Raw);
        assert_eq!(options.privilege_drop, DropPolicy::Lenient);
    }

    #[test]
    fn default_options_are_pass_fail_and_strict() {
        let options = ExecOptions::default();
        assert_eq!(options.status, StatusMode::PassFail);
        assert_eq!(options.privilege_drop, DropPolicy::Strict);
    }

    #[test]
    fn wait_for_child_returns_exit_status() {
        match unsafe { fork() } {
            Ok(ForkResult::Child) => unsafe { libc::_exit(42) },
            Ok(ForkResult::Parent { child }) => {
                assert_eq!(wait_for_child(child).unwrap(), ChildStatus::Exited(42));
            }
            Err(e) => panic!("fork failed: {}", e),
        }
    }

    #[test]
    fn wait_for_child_with_signal() {
        match unsafe { fork() } {
            Ok(ForkResult::Child) => unsafe {
                libc::raise(libc::SIGTERM);
                libc::_exit(1)
            },
            Ok(ForkResult::Parent { child }) => {
                assert_eq!(
                    wait_for_child(child).unwrap(),
                    ChildStatus::Signaled(libc::SIGTERM)
                );
            }
            Err(e) => panic!("fork failed: {}", e),
        }
    }

    #[test]
    fn wait_for_unknown_child_fails() {
        let err = wait_for_child(Pid::from_raw(i32::MAX)).unwrap_err();
        assert!(matches!(err, BsexecError::Wait(_)));
    }

    #[test]
    fn exec_error_pipe_reports_nothing_when_writer_closes() {
        let (read_end, write_end) = exec_error_pipe().unwrap();
        drop(write_end);
        assert_eq!(read_exec_error(read_end).unwrap(), None);
    }

    #[test]
    fn exec_error_pipe_carries_errno() {
        use std::io::Write;

        let (read_end, write_end) = exec_error_pipe().unwrap();
        File::from(write_end)
            .write_all(&libc::ENOENT.to_ne_bytes())
            .unwrap();
        assert_eq!(read_exec_error(read_end).unwrap(), Some(libc::ENOENT));
    }
}
