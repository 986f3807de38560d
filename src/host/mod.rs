//! The operating-system seam for scope queries
//!
//! Everything that touches bootstrap ports goes through [`ScopeHost`], so
//! the resolver and the executor can be driven by a fake in tests.

#[cfg(target_os = "macos")]
pub mod mach;

use crate::scope::{ProcessId, ScopeHandle, TaskHandle};
use bsexec_core::Result;
use std::fmt;

#[cfg(not(target_os = "macos"))]
use bsexec_core::BsexecError;

/// Status returned by a failed host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostStatus {
    /// The caller lacks the privilege the call requires
    NotPrivileged,
    /// Any other failure, with the raw status and its description
    Failed { code: i32, description: String },
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostStatus::NotPrivileged => write!(f, "not privileged"),
            HostStatus::Failed { description, .. } => write!(f, "{}", description),
        }
    }
}

pub type HostResult<T> = std::result::Result<T, HostStatus>;

/// Per-process scope operations provided by the platform
pub trait ScopeHost {
    /// The scope the calling process currently looks services up in
    fn current_scope(&self) -> ScopeHandle;

    /// One step up the hierarchy. The root is its own parent.
    fn parent_scope(&self, scope: ScopeHandle) -> HostResult<ScopeHandle>;

    /// Control handle for another process
    fn task_for_pid(&self, pid: ProcessId) -> HostResult<TaskHandle>;

    /// The scope registered for a task. Consumes the task handle.
    fn task_scope(&self, task: TaskHandle) -> HostResult<ScopeHandle>;

    /// Make `scope` the calling process's own scope, inherited by children
    fn install_scope(&self, scope: ScopeHandle) -> HostResult<()>;
}

#[cfg(target_os = "macos")]
pub type PlatformHost = mach::MachHost;

/// Stand-in for platforms without bootstrap ports. It has no values, so
/// nothing can ever call into it.
#[cfg(not(target_os = "macos"))]
#[derive(Debug)]
pub enum PlatformHost {}

#[cfg(not(target_os = "macos"))]
impl ScopeHost for PlatformHost {
    fn current_scope(&self) -> ScopeHandle {
        match *self {}
    }

    fn parent_scope(&self, _scope: ScopeHandle) -> HostResult<ScopeHandle> {
        match *self {}
    }

    fn task_for_pid(&self, _pid: ProcessId) -> HostResult<TaskHandle> {
        match *self {}
    }

    fn task_scope(&self, _task: TaskHandle) -> HostResult<ScopeHandle> {
        match *self {}
    }

    fn install_scope(&self, _scope: ScopeHandle) -> HostResult<()> {
        match *self {}
    }
}

/// The host for the running platform
#[cfg(target_os = "macos")]
pub fn default_host() -> Result<PlatformHost> {
    Ok(mach::MachHost::new())
}

/// The host for the running platform
#[cfg(not(target_os = "macos"))]
pub fn default_host() -> Result<PlatformHost> {
    Err(BsexecError::FeatureNotAvailable(
        "bootstrap scopes are only available on macOS".to_string(),
    ))
}
