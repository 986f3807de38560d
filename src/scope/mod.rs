//! Scope handles, scope tokens and their resolution

pub mod handle;
pub mod resolver;
pub mod token;

pub use handle::{ProcessId, ScopeHandle, TaskHandle};
pub use resolver::{MAX_SCOPE_DEPTH, ScopeResolver};
pub use token::ScopeToken;
