//! Explicit per-invocation state for the privileged exec sequence

use crate::scope::ScopeHandle;
use bsexec_core::Identity;
use log::debug;

/// Where an invocation is in the install, drop, fork, wait sequence.
///
/// After `Duplicated` a run passes through exactly one of `Replaced` or
/// `Terminated` before `Reaped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExecStage {
    Init,
    ScopeInstalled,
    PrivilegeDropped,
    Duplicated,
    /// The child is running the requested program
    Replaced,
    /// The child exited without replacing its image
    Terminated,
    Reaped,
}

/// Scope and identity the invocation acts on.
///
/// A context is used for exactly one run; only `PrivilegedExec` advances it.
#[derive(Debug, Clone)]
pub struct ExecContext {
    scope: ScopeHandle,
    identity: Identity,
    stage: ExecStage,
    image_replaced: Option<bool>,
}

impl ExecContext {
    pub fn new(scope: ScopeHandle) -> Self {
        Self::with_identity(scope, Identity::current())
    }

    pub fn with_identity(scope: ScopeHandle, identity: Identity) -> Self {
        Self {
            scope,
            identity,
            stage: ExecStage::Init,
            image_replaced: None,
        }
    }

    pub fn scope(&self) -> ScopeHandle {
        self.scope
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn stage(&self) -> ExecStage {
        self.stage
    }

    /// Whether the child ran the requested program; `None` until known
    pub fn image_replaced(&self) -> Option<bool> {
        self.image_replaced
    }

    pub(crate) fn advance(&mut self, next: ExecStage) {
        debug_assert!(next > self.stage, "{:?} cannot follow {:?}", next, self.stage);
        debug!("Exec stage {:?} -> {:?}", self.stage, next);
        match next {
            ExecStage::Replaced => self.image_replaced = Some(true),
            ExecStage::Terminated => self.image_replaced = Some(false),
            _ => {}
        }
        self.stage = next;
    }

    pub(crate) fn record_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }
}
