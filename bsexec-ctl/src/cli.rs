use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bsexec-ctl")]
#[command(version, about = "Run programs inside another process's bootstrap scope", long_about = None)]
#[command(after_help = "SCOPES:
    /           root of the bootstrap hierarchy
    ..          parent of the current scope
    0, NULL     the null scope
    <PID>       scope of the process with that id (needs task_for_pid rights)

EXAMPLES:
    # Run a shell in the scope of process 412
    sudo bsexec-ctl bsexec 412 /bin/zsh

    # Run in the root scope and exit with the program's own status
    bsexec-ctl bsexec --raw-status / /usr/bin/env

    # Only print what a scope resolves to
    bsexec-ctl resolve .. --json
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a program inside another bootstrap scope
    Bsexec {
        /// Exit with the program's own status (128+N when killed by signal N)
        #[arg(long)]
        raw_status: bool,

        /// Keep going if dropping to the real user/group fails
        #[arg(long)]
        lenient_privileges: bool,

        /// Scope, then the program and its arguments
        #[arg(
            value_name = "SCOPE PROGRAM [ARGS]",
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        argv: Vec<String>,
    },

    /// Print the handle a scope resolves to
    Resolve {
        /// Scope to resolve
        #[arg(allow_hyphen_values = true)]
        scope: String,

        /// Print a JSON object instead of the bare handle
        #[arg(long)]
        json: bool,
    },

    /// Check identity and platform support
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bsexec_collects_trailing_arguments() {
        let cli = Cli::try_parse_from(["bsexec-ctl", "bsexec", "412", "/bin/ls", "-l", "/tmp"])
            .unwrap();
        match cli.command {
            Commands::Bsexec {
                argv, raw_status, ..
            } => {
                assert_eq!(argv, ["412", "/bin/ls", "-l", "/tmp"]);
                assert!(!raw_status);
            }
            _ => panic!("expected bsexec"),
        }
    }

    #[test]
    fn bsexec_flags_come_before_scope() {
        let cli = Cli::try_parse_from([
            "bsexec-ctl",
            "bsexec",
            "--raw-status",
            "--lenient-privileges",
            "..",
            "env",
            "--raw-status",
        ])
        .unwrap();
        match cli.command {
            Commands::Bsexec {
                argv,
                raw_status,
                lenient_privileges,
            } => {
                assert!(raw_status);
                assert!(lenient_privileges);
                assert_eq!(argv, ["..", "env", "--raw-status"]);
            }
            _ => panic!("expected bsexec"),
        }
    }

    #[test]
    fn bsexec_accepts_missing_arguments() {
        let cli = Cli::try_parse_from(["bsexec-ctl", "bsexec"]).unwrap();
        assert!(matches!(cli.command, Commands::Bsexec { argv, .. } if argv.is_empty()));
    }

    #[test]
    fn resolve_takes_root_marker() {
        let cli = Cli::try_parse_from(["bsexec-ctl", "-v", "resolve", "/", "--json"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Resolve { scope, json: true } if scope == "/"));
    }
}
