//! How the child ended and what that means for the caller

use nix::sys::signal::Signal;
use std::fmt;

/// Whether the caller wants pass/fail or the child's own status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusMode {
    #[default]
    PassFail,
    Raw,
}

impl StatusMode {
    pub fn interpret(self, status: ChildStatus) -> ExitOutcome {
        match (self, status) {
            (StatusMode::Raw, status) => ExitOutcome::Raw(status),
            (StatusMode::PassFail, ChildStatus::Exited(0)) => ExitOutcome::Success,
            (StatusMode::PassFail, status) => ExitOutcome::Failure(status),
        }
    }
}

/// Termination observed by waitpid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    Exited(i32),
    Signaled(i32),
}

impl fmt::Display for ChildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ChildStatus::Exited(code) => write!(f, "exited with status {}", code),
            ChildStatus::Signaled(signal) => match Signal::try_from(signal) {
                Ok(sig) => write!(f, "terminated by signal {} ({})", signal, sig.as_str()),
                Err(_) => write!(f, "terminated by signal {}", signal),
            },
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Child exited normally with status 0
    Success,
    /// Anything else, when only pass/fail was asked for
    Failure(ChildStatus),
    /// The child's own status, when asked for
    Raw(ChildStatus),
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ExitOutcome::Success | ExitOutcome::Raw(ChildStatus::Exited(0))
        )
    }

    /// Status for the front end to exit with
    pub fn exit_code(&self) -> i32 {
        match *self {
            ExitOutcome::Success => 0,
            ExitOutcome::Failure(_) => 1,
            ExitOutcome::Raw(ChildStatus::Exited(code)) => code,
            ExitOutcome::Raw(ChildStatus::Signaled(signal)) => 128 + signal,
        }
    }
}
