//! pyboot launcher entry point.
//!
//! Stdout belongs to the service, so every diagnostic goes to stderr.

use std::path::PathBuf;

use clap::Parser;
use pyboot::bootstrap::{launch, report_error};
use pyboot::cli::LauncherCli;
use pyboot::config::{env, load_config, parse_flag};
use pyboot::ui::{OutputMode, TerminalUI};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `PYBOOT_DEBUG` sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pyboot=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pyboot=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = LauncherCli::parse();
    let debug = std::env::var(env::DEBUG)
        .ok()
        .and_then(|value| parse_flag(&value))
        .unwrap_or(false);
    init_tracing(debug);

    tracing::debug!("pyboot starting, forwarding {:?}", cli.args);

    let working_dir = std::env::current_dir().unwrap_or_default();
    let explicit = std::env::var_os(env::CONFIG).map(PathBuf::from);

    let config = match load_config(&working_dir, explicit.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let mut ui = TerminalUI::new(OutputMode::Normal);
            report_error(&mut ui, &e);
            std::process::exit(e.exit_code());
        }
    };

    let mut ui = TerminalUI::new(config.output);
    let code = launch(&config, &mut ui, &cli.args);
    std::process::exit(code);
}
