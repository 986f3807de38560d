use bsexec::{
    BsexecError, DropPolicy, ErrorCategory, ExecOptions, ExitOutcome, Invocation, ScopeHost,
    StatusMode, USAGE, default_host,
};
use console::style;
use log::debug;

/// Configuration for a bsexec run
pub struct RunConfig {
    pub argv: Vec<String>,
    pub raw_status: bool,
    pub lenient_privileges: bool,
}

impl RunConfig {
    fn options(&self) -> ExecOptions {
        let status = if self.raw_status {
            StatusMode::Raw
        } else {
            StatusMode::PassFail
        };
        let policy = if self.lenient_privileges {
            DropPolicy::Lenient
        } else {
            DropPolicy::Strict
        };
        ExecOptions::new()
            .with_status(status)
            .with_privilege_drop(policy)
    }
}

/// Run the `bsexec` subcommand and return the process exit code
pub fn run_bsexec(config: RunConfig) -> i32 {
    // Usage is checked before anything touches the host.
    let invocation = match Invocation::from_args(&config.argv) {
        Ok(invocation) => invocation,
        Err(e) => return report_error(&e),
    };

    match default_host() {
        Ok(host) => run_with_host(&host, &invocation, config.options()),
        Err(e) => report_error(&e),
    }
}

pub fn run_with_host<H: ScopeHost + ?Sized>(
    host: &H,
    invocation: &Invocation,
    options: ExecOptions,
) -> i32 {
    debug!("Using options: {:?}", options);

    match invocation.execute(host, options) {
        Ok(ExitOutcome::Failure(status)) => {
            eprintln!(
                "{} bsexec failed: {} {}",
                style("error:").red().bold(),
                invocation.request.program(),
                status
            );
            ExitOutcome::Failure(status).exit_code()
        }
        Ok(outcome) => outcome.exit_code(),
        Err(e) => report_error(&e),
    }
}

/// Print an error with the prefix for its category; returns the exit code
pub fn report_error(err: &BsexecError) -> i32 {
    let message = match err.category() {
        ErrorCategory::Usage => format!("usage: bsexec-ctl {}", USAGE),
        ErrorCategory::Resolution | ErrorCategory::Unsupported => err.to_string(),
        ErrorCategory::ScopeInstall => format!("couldn't switch to new scope: {}", err),
        ErrorCategory::PrivilegeDrop
        | ErrorCategory::Exec
        | ErrorCategory::Wait => format!("bsexec failed: {}", err),
    };

    eprintln!("{} {}", style("error:").red().bold(), message);
    err.exit_code()
}
