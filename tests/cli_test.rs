//! Integration tests for the `pyboot` and `pyboot-setup` binaries.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const OVERRIDES: &[&str] = &[
    "PYBOOT_CONFIG",
    "PYBOOT_PYTHON",
    "PYBOOT_PACKAGE",
    "PYBOOT_IMPORT_NAME",
    "PYBOOT_MODULE",
    "PYBOOT_MIN_PYTHON",
    "PYBOOT_WORKDIR",
    "PYBOOT_QUIET",
    "PYBOOT_DEBUG",
    "RUST_LOG",
];

fn write_config(dir: &Path, config: &str) -> PathBuf {
    let path = dir.join("pyboot.yml");
    fs::write(&path, config).unwrap();
    path
}

/// A binary with a config file and none of the caller's `PYBOOT_*` settings.
fn command(bin: &str, dir: &Path, config: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin(bin));
    for var in OVERRIDES {
        cmd.env_remove(var);
    }
    cmd.current_dir(dir).env("PYBOOT_CONFIG", config);
    cmd
}

const MISSING_PYTHON: &str = r#"
runtime:
  candidates: [pyboot-test-no-such-python]
"#;

#[test]
fn setup_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pyboot-setup"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("verify"));
    Ok(())
}

#[test]
fn setup_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pyboot-setup"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn setup_rejects_unknown_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pyboot-setup"));
    cmd.arg("reinstall");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn launcher_without_python_exits_10() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = write_config(temp.path(), MISSING_PYTHON);

    command("pyboot", temp.path(), &config)
        .arg("--help")
        .assert()
        .code(10)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Python 3.10+ is required"));
    Ok(())
}

#[test]
fn launcher_with_invalid_config_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = write_config(temp.path(), "install:\n  strategies: []\n");

    command("pyboot", temp.path(), &config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no-strategies"));
    Ok(())
}

#[test]
fn launcher_with_unparseable_config_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = write_config(temp.path(), "runtime: [unclosed\n");

    command("pyboot", temp.path(), &config).assert().code(2);
    Ok(())
}

#[test]
fn check_without_python_exits_10() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = write_config(temp.path(), MISSING_PYTHON);

    command("pyboot-setup", temp.path(), &config)
        .arg("check")
        .assert()
        .code(10);
    Ok(())
}

#[test]
fn uninstall_without_python_exits_0() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = write_config(temp.path(), MISSING_PYTHON);

    command("pyboot-setup", temp.path(), &config)
        .arg("uninstall")
        .assert()
        .success();
    Ok(())
}

#[test]
fn config_flag_overrides_environment() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let missing = write_config(temp.path(), MISSING_PYTHON);
    let invalid = temp.path().join("invalid.yml");
    fs::write(&invalid, "runtime:\n  min_version: three\n")?;

    command("pyboot-setup", temp.path(), &missing)
        .arg("check")
        .arg("--config")
        .arg(&invalid)
        .assert()
        .code(2);
    Ok(())
}

/// Tests against a shell script standing in for Python.
#[cfg(unix)]
mod fake_python {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// `import` succeeds when `imports` is true; pip always fails; the
    /// service echoes its arguments and exits 7.
    fn fake_python(dir: &Path, imports: bool) -> PathBuf {
        let import_status = if imports { 0 } else { 1 };
        let script = format!(
            r#"#!/bin/sh
case "$1" in
  --version) echo "Python 3.11.2" ;;
  -c) exit {import_status} ;;
  -m)
    if [ "$2" = "pip" ]; then exit 1; fi
    shift 2
    echo "service args: $*"
    exit 7
    ;;
esac
"#
        );
        let path = dir.join("fake-python");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn config_for(dir: &Path, python: &Path) -> PathBuf {
        write_config(
            dir,
            &format!(
                "runtime:\n  candidates: [\"{}\"]\ninstall:\n  strategies: [direct, user]\n",
                python.display()
            ),
        )
    }

    #[test]
    fn launcher_forwards_args_and_exit_code() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let python = fake_python(temp.path(), true);
        let config = config_for(temp.path(), &python);

        command("pyboot", temp.path(), &config)
            .args(["--help", "-x", "data.csv"])
            .assert()
            .code(7)
            .stdout(predicate::str::contains("service args: --help -x data.csv"));
        Ok(())
    }

    #[test]
    fn launcher_reports_exhausted_install() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let python = fake_python(temp.path(), false);
        let config = config_for(temp.path(), &python);

        command("pyboot", temp.path(), &config)
            .assert()
            .code(11)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Failed to install visidata-mcp"))
            .stderr(predicate::str::contains("Troubleshooting options"));
        Ok(())
    }

    #[test]
    fn install_prints_client_snippet() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let python = fake_python(temp.path(), true);
        let config = config_for(temp.path(), &python);

        command("pyboot-setup", temp.path(), &config)
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"mcpServers\""))
            .stdout(predicate::str::contains("\"command\": \"pyboot\""));
        Ok(())
    }

    #[test]
    fn verify_json_reports_all_stages() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let python = fake_python(temp.path(), true);
        let config = config_for(temp.path(), &python);

        let output = command("pyboot-setup", temp.path(), &config)
            .args(["verify", "--json"])
            .output()?;

        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(report["version"], "Python 3.11.2");
        assert_eq!(report["stages"].as_array().map(Vec::len), Some(3));
        Ok(())
    }

    #[test]
    fn verify_fails_when_package_is_missing() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let python = fake_python(temp.path(), false);
        let config = config_for(temp.path(), &python);

        command("pyboot-setup", temp.path(), &config)
            .arg("verify")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("package import"));
        Ok(())
    }

    #[test]
    fn python_override_takes_precedence() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let python = fake_python(temp.path(), true);
        let config = write_config(temp.path(), MISSING_PYTHON);

        command("pyboot-setup", temp.path(), &config)
            .env("PYBOOT_PYTHON", &python)
            .arg("check")
            .assert()
            .success()
            .stderr(predicate::str::contains("Python 3.11.2"));
        Ok(())
    }
}
