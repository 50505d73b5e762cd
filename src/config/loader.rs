//! Configuration file discovery, layering and environment overrides.
//!
//! Layers, later overriding earlier:
//! 1. Built-in defaults
//! 2. User config (`~/.pyboot/config.yml`)
//! 3. Project config (`.pyboot/config.yml` in the working directory)
//! 4. Environment overrides (`PYBOOT_*`)
//!
//! An explicit file (`--config` or `PYBOOT_CONFIG`) replaces layers 2 and 3.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::config::merger::merge_configs;
use crate::config::schema::LauncherConfig;
use crate::config::validator::validate;
use crate::error::{PybootError, Result};
use crate::ui::OutputMode;

/// Names of the environment variables pyboot reads.
pub mod env {
    pub const CONFIG: &str = "PYBOOT_CONFIG";
    pub const PYTHON: &str = "PYBOOT_PYTHON";
    pub const PACKAGE: &str = "PYBOOT_PACKAGE";
    pub const IMPORT_NAME: &str = "PYBOOT_IMPORT_NAME";
    pub const MODULE: &str = "PYBOOT_MODULE";
    pub const MIN_PYTHON: &str = "PYBOOT_MIN_PYTHON";
    pub const WORKDIR: &str = "PYBOOT_WORKDIR";
    pub const QUIET: &str = "PYBOOT_QUIET";
    pub const DEBUG: &str = "PYBOOT_DEBUG";
}

/// Config files that take part in a load, in merge order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config: ~/.pyboot/config.yml
    pub user_global: Option<PathBuf>,

    /// Project config: .pyboot/config.yml
    pub project: Option<PathBuf>,

    /// Explicitly requested file; when set, the other two are ignored.
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for `working_dir`.
    pub fn discover(working_dir: &Path, explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self {
                explicit: Some(path.to_path_buf()),
                ..Self::default()
            };
        }

        Self {
            user_global: Self::find_user_global(),
            project: Self::find_project_config(working_dir),
            explicit: None,
        }
    }

    fn find_user_global() -> Option<PathBuf> {
        let path = dirs::home_dir()?.join(".pyboot").join("config.yml");
        path.exists().then_some(path)
    }

    fn find_project_config(working_dir: &Path) -> Option<PathBuf> {
        let path = working_dir.join(".pyboot").join("config.yml");
        path.exists().then_some(path)
    }

    /// Returns all config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        if let Some(path) = &self.explicit {
            return vec![path];
        }
        self.user_global.iter().chain(self.project.iter()).collect()
    }
}

/// Load one file as a raw YAML value for merging.
///
/// An empty file counts as an empty mapping.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist, `ConfigParseError`
/// if it is not valid YAML or does not fit the schema.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PybootError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PybootError::Io(e)
        }
    })?;

    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| PybootError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let value = if value.is_null() {
        Value::Mapping(Default::default())
    } else {
        value
    };

    // Type-check this layer on its own so errors name the right file.
    serde_yaml::from_value::<LauncherConfig>(value.clone()).map_err(|e| {
        PybootError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    Ok(value)
}

/// Merge the files in `paths` over the built-in defaults.
pub fn load_merged_config(paths: &ConfigPaths) -> Result<LauncherConfig> {
    let existing = paths.all_existing();
    let mut layers = Vec::with_capacity(existing.len());
    for path in &existing {
        tracing::debug!("loading config from {}", path.display());
        layers.push(load_config_value(path)?);
    }

    serde_yaml::from_value(merge_configs(&layers)).map_err(|e| PybootError::ConfigParseError {
        path: existing
            .last()
            .map(|p| p.to_path_buf())
            .unwrap_or_default(),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Apply `PYBOOT_*` overrides read through `lookup`.
///
/// # Errors
///
/// Returns `ConfigValidationError` for a `PYBOOT_QUIET` value that is
/// neither truthy nor falsy.
pub fn apply_env_overrides(
    config: &mut LauncherConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(python) = non_empty(env::PYTHON) {
        config.runtime.candidates.retain(|c| c != &python);
        config.runtime.candidates.insert(0, python);
    }
    if let Some(name) = non_empty(env::PACKAGE) {
        config.package.name = name;
    }
    if let Some(import_name) = non_empty(env::IMPORT_NAME) {
        config.package.import_name = import_name;
    }
    if let Some(module) = non_empty(env::MODULE) {
        config.package.module = module;
    }
    if let Some(min_version) = non_empty(env::MIN_PYTHON) {
        config.runtime.min_version = min_version;
    }
    if let Some(dir) = non_empty(env::WORKDIR) {
        config.supervisor.working_dir = Some(PathBuf::from(dir));
    }
    if let Some(quiet) = non_empty(env::QUIET) {
        match parse_flag(&quiet) {
            Some(true) => config.output = OutputMode::Quiet,
            Some(false) => {}
            None => {
                return Err(PybootError::ConfigValidationError {
                    message: format!("{} must be a boolean, got '{}'", env::QUIET, quiet),
                })
            }
        }
    }

    Ok(())
}

/// Interpret a boolean-ish environment value.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load, override from the process environment, and validate.
pub fn load_config(working_dir: &Path, explicit: Option<&Path>) -> Result<LauncherConfig> {
    load_config_with_env(working_dir, explicit, |name| std::env::var(name).ok())
}

/// [`load_config`] with an injectable environment.
pub fn load_config_with_env(
    working_dir: &Path,
    explicit: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LauncherConfig> {
    let paths = ConfigPaths::discover(working_dir, explicit);
    let mut config = load_merged_config(&paths)?;
    apply_env_overrides(&mut config, lookup)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::StrategyKind;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_project_config(root: &Path, content: &str) -> PathBuf {
        let dir = root.join(".pyboot");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yml");
        fs::write(&path, content).unwrap();
        path
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn discover_finds_project_config() {
        let temp = TempDir::new().unwrap();
        write_project_config(temp.path(), "output: quiet\n");

        let paths = ConfigPaths::discover(temp.path(), None);
        assert!(paths.project.is_some());
    }

    #[test]
    fn explicit_path_replaces_discovered_files() {
        let temp = TempDir::new().unwrap();
        write_project_config(temp.path(), "output: quiet\n");
        let explicit = temp.path().join("other.yml");
        fs::write(&explicit, "output: verbose\n").unwrap();

        let paths = ConfigPaths::discover(temp.path(), Some(&explicit));
        assert_eq!(paths.all_existing(), [&explicit]);

        let config = load_merged_config(&paths).unwrap();
        assert_eq!(config.output, OutputMode::Verbose);
    }

    #[test]
    fn missing_explicit_file_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");

        let err = load_config_with_env(temp.path(), Some(&missing), env_of(&[])).unwrap_err();
        assert!(matches!(err, PybootError::ConfigNotFound { .. }));
    }

    #[test]
    fn no_files_yields_defaults() {
        let paths = ConfigPaths::default();
        assert_eq!(
            load_merged_config(&paths).unwrap(),
            LauncherConfig::default()
        );
    }

    #[test]
    fn empty_file_is_no_change() {
        let temp = TempDir::new().unwrap();
        let path = write_project_config(temp.path(), "");

        let value = load_config_value(&path).unwrap();
        assert!(value.as_mapping().unwrap().is_empty());
    }

    #[test]
    fn project_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        write_project_config(
            temp.path(),
            r#"
runtime:
  candidates: [python3.12]
install:
  strategies: [pipx, bootstrap-pipx]
"#,
        );

        let config = load_config_with_env(temp.path(), None, env_of(&[])).unwrap();

        assert_eq!(config.runtime.candidates, ["python3.12"]);
        assert_eq!(
            config.install.strategies,
            [StrategyKind::Pipx, StrategyKind::BootstrapPipx]
        );
        assert_eq!(config.package.name, "visidata-mcp");
    }

    #[test]
    fn parse_error_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = write_project_config(temp.path(), "runtime: [not, a, mapping]\n");

        let err = load_config_with_env(temp.path(), None, env_of(&[])).unwrap_err();
        match err {
            PybootError::ConfigParseError { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn env_overrides_apply_after_files() {
        let temp = TempDir::new().unwrap();
        write_project_config(temp.path(), "package:\n  name: from-file\n");

        let config = load_config_with_env(
            temp.path(),
            None,
            env_of(&[
                (env::PYTHON, "/opt/py/bin/python3.12"),
                (env::PACKAGE, "from-env"),
                (env::MODULE, "from_env.server"),
                (env::MIN_PYTHON, "3.11"),
                (env::WORKDIR, "/srv"),
                (env::QUIET, "1"),
            ]),
        )
        .unwrap();

        assert_eq!(
            config.runtime.candidates,
            ["/opt/py/bin/python3.12", "python3", "python"]
        );
        assert_eq!(config.package.name, "from-env");
        assert_eq!(config.package.module, "from_env.server");
        assert_eq!(config.runtime.min_version, "3.11");
        assert_eq!(config.supervisor.working_dir, Some(PathBuf::from("/srv")));
        assert_eq!(config.output, OutputMode::Quiet);
    }

    #[test]
    fn env_python_already_listed_moves_to_front() {
        let mut config = LauncherConfig::default();
        apply_env_overrides(&mut config, env_of(&[(env::PYTHON, "python")])).unwrap();
        assert_eq!(config.runtime.candidates, ["python", "python3"]);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = LauncherConfig::default();
        apply_env_overrides(&mut config, env_of(&[(env::PACKAGE, " ")])).unwrap();
        assert_eq!(config.package.name, "visidata-mcp");
    }

    #[test]
    fn bad_quiet_value_is_rejected() {
        let mut config = LauncherConfig::default();
        let result = apply_env_overrides(&mut config, env_of(&[(env::QUIET, "loud")]));
        assert!(matches!(
            result,
            Err(PybootError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn invalid_env_floor_fails_validation() {
        let temp = TempDir::new().unwrap();
        let err = load_config_with_env(temp.path(), None, env_of(&[(env::MIN_PYTHON, "three")]))
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::CONFIG_INVALID);
    }

    #[test]
    fn parse_flag_values() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
