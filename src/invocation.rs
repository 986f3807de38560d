//! The `bsexec <scope> <program> [args...]` command as a whole

use crate::execution::{ExecOptions, ExecRequest, ExitOutcome, PrivilegedExec};
use crate::host::ScopeHost;
use crate::scope::ScopeResolver;
use bsexec_core::{BsexecError, Result};

/// Argument synopsis shown on usage errors
pub const USAGE: &str = "bsexec <scope> <program> [args...]";

/// A checked `bsexec` invocation: a scope token and what to run in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub token: String,
    pub request: ExecRequest,
}

impl Invocation {
    /// Split the arguments following the subcommand.
    ///
    /// Fewer than two (scope and program) is a usage error.
    pub fn from_args(args: &[String]) -> Result<Self> {
        match args {
            [token, argv @ ..] if !argv.is_empty() => Ok(Self {
                token: token.clone(),
                request: ExecRequest::from_argv(argv)?,
            }),
            _ => Err(BsexecError::Usage(USAGE.to_string())),
        }
    }

    /// Resolve the scope, then run the request inside it
    pub fn execute<H: ScopeHost + ?Sized>(
        &self,
        host: &H,
        options: ExecOptions,
    ) -> Result<ExitOutcome> {
        let handle = ScopeResolver::new(host).resolve(&self.token)?;
        PrivilegedExec::new(host, options).run(handle, &self.request)
    }
}
