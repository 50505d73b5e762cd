//! Library integration tests.

use pyboot::bootstrap::Bootstrap;
use pyboot::config::LauncherConfig;
use pyboot::error::exit_code;
use pyboot::requirements::{InstallChain, StrategyKind};
use pyboot::shell::{MockResponse, MockRunner, Platform};
use pyboot::ui::MockUI;
use pyboot::PybootError;

#[test]
fn error_types_are_public() {
    let err = PybootError::SpawnFailed {
        command: "python3 -m visidata_mcp.server".into(),
        message: "No such file or directory".into(),
    };
    assert!(err.to_string().contains("Failed to start"));
    assert_eq!(err.exit_code(), exit_code::SPAWN_FAILED);
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> pyboot::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use pyboot::cli::{SetupCli, SetupCommands};

    let cli = SetupCli::parse_from(["pyboot-setup", "verify", "--json"]);
    if let SetupCommands::Verify(args) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Verify command");
    }
}

#[test]
fn default_chain_order() {
    assert_eq!(
        InstallChain::default().names(),
        ["direct", "user", "pipx", "bootstrap-pipx"]
    );
    assert_eq!(StrategyKind::ALL.len(), 4);
}

#[test]
fn pipx_installs_after_pip_routes_fail() {
    let config = LauncherConfig::default();
    let runner = MockRunner::new();
    runner.on("python3 --version", MockResponse::stdout("Python 3.12.1"));
    runner.on("python3 -c \"import visidata_mcp\"", MockResponse::exit(1));
    runner.on("python3 -m pip install visidata-mcp", MockResponse::exit(1));
    runner.on(
        "python3 -m pip install --user visidata-mcp",
        MockResponse::exit(1),
    );
    runner.on("pipx --version", MockResponse::stdout("1.4.3"));
    runner.on("pipx install visidata-mcp", MockResponse::ok());
    runner.on("pipx ensurepath", MockResponse::ok());
    runner.on(
        "pipx environment --value PIPX_LOCAL_VENVS",
        MockResponse::stdout("/opt/pipx/venvs"),
    );
    runner.on(
        "/opt/pipx/venvs/visidata-mcp/bin/python --version",
        MockResponse::stdout("Python 3.12.1"),
    );
    runner.on(
        "/opt/pipx/venvs/visidata-mcp/bin/python -c \"import visidata_mcp\"",
        MockResponse::ok(),
    );
    let mut ui = MockUI::new();

    let installation = Bootstrap::new(&config, &runner)
        .with_platform(Platform::Linux)
        .prepare(&mut ui)
        .unwrap();

    assert_eq!(installation.strategy.as_deref(), Some("pipx"));
    assert_eq!(
        installation.runtime.command,
        "/opt/pipx/venvs/visidata-mcp/bin/python"
    );
    assert_eq!(
        installation.attempts.strategy_names(),
        ["direct", "user", "pipx"]
    );
}
