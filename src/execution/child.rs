//! The only code that runs in the duplicated child.
//!
//! Between fork and exec the child may call `execv`, `write` and `_exit`
//! and nothing else: no allocation, no locks, no logging, no unwinding.
//! Everything it touches was built by the parent before the fork.

use crate::execution::request::{PreparedCommand, SHELL};
use std::os::unix::io::RawFd;

/// Exit status of a child whose image could not be replaced
pub(crate) const EXEC_FAILURE_STATUS: libc::c_int = 127;

/// Replace the child's image, or report errno on `error_fd` and exit.
///
/// A file the kernel rejects as not loadable is run as a shell script.
pub(crate) fn replace_image(command: &PreparedCommand, error_fd: RawFd) -> ! {
    // SAFETY: all pointers come from `command`, which outlives this call, or `SHELL`,
    // and every function called is async-signal-safe.
    unsafe {
        libc::execv(command.path().as_ptr(), command.argv_ptr());

        let mut errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        if errno == libc::ENOEXEC {
            libc::execv(SHELL.as_ptr(), command.shell_argv_ptr());
            errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        }

        let bytes = errno.to_ne_bytes();
        libc::write(error_fd, bytes.as_ptr().cast(), bytes.len());

        libc::_exit(EXEC_FAILURE_STATUS)
    }
}
