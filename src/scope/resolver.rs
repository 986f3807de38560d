//! Turning a scope token into a concrete scope handle

use crate::host::{HostStatus, ScopeHost};
use crate::scope::handle::{ProcessId, ScopeHandle};
use crate::scope::token::ScopeToken;
use bsexec_core::{BsexecError, Result};
use log::{debug, info};

/// Upper bound on parent steps taken while looking for the root scope
pub const MAX_SCOPE_DEPTH: usize = 64;

/// Resolves scope tokens against a [`ScopeHost`].
///
/// Resolution only reads: the caller's own scope is never changed here.
pub struct ScopeResolver<'h, H: ScopeHost + ?Sized> {
    host: &'h H,
}

impl<'h, H: ScopeHost + ?Sized> ScopeResolver<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Parse `token` and resolve it
    pub fn resolve(&self, token: &str) -> Result<ScopeHandle> {
        self.resolve_token(ScopeToken::parse(token))
    }

    pub fn resolve_token(&self, token: ScopeToken) -> Result<ScopeHandle> {
        let handle = match token {
            ScopeToken::Root => self.root_scope()?,
            ScopeToken::Parent => self.parent_of(self.host.current_scope())?,
            ScopeToken::Null => ScopeHandle::NULL,
            ScopeToken::Process(pid) => self.scope_of_process(pid)?,
        };

        info!("Resolved {} scope to {}", token.kind(), handle);
        Ok(handle)
    }

    fn parent_of(&self, scope: ScopeHandle) -> Result<ScopeHandle> {
        self.host.parent_scope(scope).map_err(|status| match status {
            HostStatus::NotPrivileged => BsexecError::PermissionDenied,
            HostStatus::Failed { code, .. } => BsexecError::ParentQuery { code },
        })
    }

    /// Walk parents from the caller's scope until a step returns the
    /// scope it started from.
    fn root_scope(&self) -> Result<ScopeHandle> {
        let mut current = self.host.current_scope();

        for step in 1..=MAX_SCOPE_DEPTH {
            let parent = self.parent_of(current)?;
            if parent == current {
                debug!("Reached root scope {} after {} steps", parent, step);
                return Ok(parent);
            }
            debug!("Scope {} has parent {}", current, parent);
            current = parent;
        }

        Err(BsexecError::ScopeCycle {
            steps: MAX_SCOPE_DEPTH,
        })
    }

    fn scope_of_process(&self, pid: ProcessId) -> Result<ScopeHandle> {
        let task = self.host.task_for_pid(pid).map_err(|status| {
            BsexecError::ProcessNotInspectable {
                pid: pid.as_raw(),
                reason: status.to_string(),
            }
        })?;

        self.host
            .task_scope(task)
            .map_err(|status| BsexecError::ScopeUnavailable {
                pid: pid.as_raw(),
                reason: status.to_string(),
            })
    }
}
