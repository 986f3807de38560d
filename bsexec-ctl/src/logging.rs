use console::style;
use env_logger::{Builder, Env, Target};
use log::Level;
use std::io::Write;

/// Initialize logger based on verbose flag. `RUST_LOG` wins when set.
pub fn init_logger(verbose: bool) {
    let env = Env::default().default_filter_or(if verbose { "debug" } else { "warn" });

    Builder::from_env(env)
        .target(Target::Stderr)
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => style("ERROR").red().bold(),
                Level::Warn => style("WARN ").yellow().bold(),
                Level::Info => style("INFO ").green(),
                Level::Debug => style("DEBUG").cyan(),
                Level::Trace => style("TRACE").dim(),
            };
            let module = record
                .module_path()
                .and_then(|path| path.rsplit("::").next())
                .unwrap_or("bsexec");
            writeln!(buf, "{} {} {}", level, style(module).dim(), record.args())
        })
        .init();
}
