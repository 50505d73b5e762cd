//! pyboot-setup entry point.

use std::process::ExitCode;

use clap::Parser;
use pyboot::bootstrap::report_error;
use pyboot::cli::{CommandDispatcher, SetupCli};
use pyboot::config::{env, load_config, parse_flag};
use pyboot::ui::{OutputMode, TerminalUI};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` or `PYBOOT_DEBUG` sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pyboot=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pyboot=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Exit codes above 255 cannot be expressed; they collapse to 1.
fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn main() -> ExitCode {
    let cli = SetupCli::parse();
    let debug = cli.debug
        || std::env::var(env::DEBUG)
            .ok()
            .and_then(|value| parse_flag(&value))
            .unwrap_or(false);
    init_tracing(debug);

    tracing::debug!("pyboot-setup starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let working_dir = std::env::current_dir().unwrap_or_default();
    let config = match load_config(&working_dir, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let mut ui = TerminalUI::new(OutputMode::Normal);
            report_error(&mut ui, &e);
            return exit_code(e.exit_code());
        }
    };

    // Flags win over the configured output mode
    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        config.output
    };
    let mut ui = TerminalUI::new(output_mode);

    let dispatcher = CommandDispatcher::new(config);
    match dispatcher.dispatch(&cli, &mut ui) {
        Ok(result) => exit_code(result.exit_code),
        Err(e) => {
            report_error(&mut ui, &e);
            exit_code(e.exit_code())
        }
    }
}
