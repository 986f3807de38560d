//! Scope, task and process identifiers

use std::fmt;

/// Opaque name of a bootstrap scope (a Mach port name on macOS).
///
/// The handle is an attribute of whichever process holds it; nothing here
/// allocates or releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeHandle(u32);

impl ScopeHandle {
    /// The null scope (MACH_PORT_NULL)
    pub const NULL: ScopeHandle = ScopeHandle(0);

    pub const fn from_raw(raw: u32) -> Self {
        ScopeHandle(raw)
    }

    pub const fn as_raw(self) -> u32 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

impl fmt::Display for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Control handle of another process, obtained only to read its scope.
///
/// Not `Copy`: handing it to `ScopeHost::task_scope` gives it up.
#[derive(Debug, PartialEq, Eq)]
pub struct TaskHandle(u32);

impl TaskHandle {
    pub const fn from_raw(raw: u32) -> Self {
        TaskHandle(raw)
    }

    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

/// Numeric process identifier named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(i32);

impl ProcessId {
    pub const fn from_raw(raw: i32) -> Self {
        ProcessId(raw)
    }

    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
