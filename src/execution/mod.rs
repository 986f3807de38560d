//! Execution layer: running a program inside a borrowed scope
//!
//! # Features
//!
//! - **Scope install**: the resolved handle becomes the caller's own scope
//! - **Privilege drop**: effective group then user set to the real ids
//! - **Fork and exec**: all preparation in the parent, exec-only child
//! - **Status mapping**: pass/fail or the child's raw status
//!
//! # Examples
//!
//! ```ignore
//! use bsexec::execution::{ExecOptions, ExecRequest, PrivilegedExec};
//!
//! let request = ExecRequest::new("/usr/bin/true", vec![]);
//! let outcome = PrivilegedExec::new(&host, ExecOptions::default()).run(handle, &request)?;
//! assert!(outcome.is_success());
//! ```

mod child;
pub mod context;
pub mod outcome;
pub mod process;
pub mod request;

pub use context::{ExecContext, ExecStage};
pub use outcome::{ChildStatus, ExitOutcome, StatusMode};
pub use process::{ExecOptions, PrivilegedExec};
pub use request::ExecRequest;
