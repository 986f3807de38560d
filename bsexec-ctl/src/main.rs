//! bsexec-ctl: run programs inside another process's bootstrap scope

mod cli;
mod commands;
mod logging;
mod runner;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{check_requirements, resolve_scope};
use runner::{RunConfig, run_bsexec};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and succeed; real parse errors exit 1.
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    logging::init_logger(cli.verbose);

    let code = match cli.command {
        Commands::Bsexec {
            raw_status,
            lenient_privileges,
            argv,
        } => run_bsexec(RunConfig {
            argv,
            raw_status,
            lenient_privileges,
        }),
        Commands::Resolve { scope, json } => resolve_scope(&scope, json),
        Commands::Check => {
            check_requirements();
            0
        }
    };

    std::process::exit(code);
}
