//! bsexec-core: shared types, errors, and privilege handling for bsexec
//!
//! This crate provides the foundational pieces used by the bsexec crates:
//! - Error type, error categories and Result alias
//! - Process identity and the permanent drop to real ids
//! - Runtime capability detection (root, elevation, bootstrap ports)

pub mod capabilities;
pub mod error;
pub mod privilege;

pub use error::{BsexecError, ErrorCategory, Result};
pub use privilege::{DropPolicy, Identity};
