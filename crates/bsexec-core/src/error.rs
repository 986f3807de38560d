//! Error types for bsexec operations

use std::io;
use thiserror::Error;

/// Result type for bsexec operations
pub type Result<T> = std::result::Result<T, BsexecError>;

/// Errors that can occur while resolving a scope or executing inside it
#[derive(Error, Debug)]
pub enum BsexecError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("parent scope query failed with status {code}")]
    ParentQuery { code: i32 },

    #[error("no permission to inspect process {pid}: {reason}")]
    ProcessNotInspectable { pid: i32, reason: String },

    #[error("could not obtain scope of process {pid}: {reason}")]
    ScopeUnavailable { pid: i32, reason: String },

    #[error("scope hierarchy has no root within {steps} steps")]
    ScopeCycle { steps: usize },

    #[error("{0}")]
    ScopeInstall(String),

    #[error("privilege drop failed: {0}")]
    PrivilegeDrop(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("fork failed: {0}")]
    Fork(String),

    #[error("exec failed: {0}")]
    Exec(String),

    #[error("waitpid failed: {0}")]
    Wait(String),

    #[error("Feature not available: {0}")]
    FeatureNotAvailable(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Coarse classification used by front ends to pick a diagnostic prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    Resolution,
    ScopeInstall,
    PrivilegeDrop,
    Exec,
    Wait,
    Unsupported,
}

impl BsexecError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BsexecError::Usage(_) => ErrorCategory::Usage,
            BsexecError::PermissionDenied
            | BsexecError::ParentQuery { .. }
            | BsexecError::ProcessNotInspectable { .. }
            | BsexecError::ScopeUnavailable { .. }
            | BsexecError::ScopeCycle { .. } => ErrorCategory::Resolution,
            BsexecError::ScopeInstall(_) => ErrorCategory::ScopeInstall,
            BsexecError::PrivilegeDrop(_) => ErrorCategory::PrivilegeDrop,
            BsexecError::InvalidRequest(_)
            | BsexecError::CommandNotFound(_)
            | BsexecError::Fork(_)
            | BsexecError::Exec(_)
            | BsexecError::Io(_) => ErrorCategory::Exec,
            BsexecError::Wait(_) => ErrorCategory::Wait,
            BsexecError::FeatureNotAvailable(_) => ErrorCategory::Unsupported,
        }
    }

    /// Every failure ends the invocation with the same status
    pub fn exit_code(&self) -> i32 {
        1
    }
}
