//! bsexec: run a program inside another process's bootstrap scope
//!
//! Resolves a scope token into a bootstrap scope handle, installs it as the
//! caller's own scope, drops to the real user and group, and runs a program
//! that inherits the scope.
//!
//! # Modules
//!
//! - **scope**: Scope handles, tokens and the resolver
//! - **host**: The platform seam (Mach on macOS)
//! - **execution**: Scope install, privilege drop, fork and exec
//! - **invocation**: The `bsexec <scope> <program> [args...]` command
//!
//! # Scope tokens
//!
//! | Token | Scope |
//! |---|---|
//! | `/` | Root of the hierarchy |
//! | `..` | Parent of the caller's scope |
//! | `0`, `NULL` | The null scope |
//! | anything else | Scope of the process with that id |
//!
//! # Example
//!
//! ```ignore
//! use bsexec::{ExecOptions, Invocation, default_host};
//!
//! let host = default_host()?;
//! let invocation = Invocation::from_args(&["..".into(), "/usr/bin/true".into()])?;
//! let outcome = invocation.execute(&host, ExecOptions::default())?;
//! std::process::exit(outcome.exit_code());
//! ```

pub mod execution;
pub mod host;
pub mod invocation;
pub mod scope;

pub use bsexec_core::{BsexecError, DropPolicy, ErrorCategory, Identity, Result};
pub use execution::{
    ChildStatus, ExecContext, ExecOptions, ExecRequest, ExecStage, ExitOutcome, PrivilegedExec,
    StatusMode,
};
pub use host::{HostResult, HostStatus, PlatformHost, ScopeHost, default_host};
pub use invocation::{Invocation, USAGE};
pub use scope::{ProcessId, ScopeHandle, ScopeResolver, ScopeToken, TaskHandle};
