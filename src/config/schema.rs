//! Configuration schema.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the stock visidata-mcp launcher.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::requirements::{PackageSpec, StrategyKind};
use crate::runtime::VersionFloor;
use crate::ui::OutputMode;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub package: PackageConfig,
    pub runtime: RuntimeConfig,
    pub install: InstallConfig,
    pub supervisor: SupervisorConfig,
    pub output: OutputMode,
}

impl LauncherConfig {
    /// The package as the installer and supervisor see it.
    pub fn package_spec(&self) -> PackageSpec {
        PackageSpec::new(
            self.package.name.clone(),
            self.package.import_name.clone(),
            self.package.module.clone(),
        )
    }
}

/// The Python package hosting the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Name given to pip / pipx.
    pub name: String,
    /// Name used in `import` to check presence.
    pub import_name: String,
    /// Module started with `python -m`.
    pub module: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: "visidata-mcp".to_string(),
            import_name: "visidata_mcp".to_string(),
            module: "visidata_mcp.server".to_string(),
        }
    }
}

/// Interpreter discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Commands tried in order; the first that meets `min_version` wins.
    pub candidates: Vec<String>,
    /// Minimum `MAJOR.MINOR`.
    pub min_version: String,
    /// Bound on each version or import probe.
    pub probe_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            candidates: vec!["python3".to_string(), "python".to_string()],
            min_version: "3.10".to_string(),
            probe_timeout_secs: 10,
        }
    }
}

impl RuntimeConfig {
    /// Parsed `min_version`. Validation guarantees this parses.
    pub fn floor(&self) -> Result<VersionFloor, String> {
        self.min_version.parse()
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Install strategy selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Strategies in the order they are tried.
    pub strategies: Vec<StrategyKind>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            strategies: StrategyKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Directory the service runs in; the current directory when unset.
    pub working_dir: Option<PathBuf>,
}
