//! Configuration loading, merging, and validation for pyboot.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, layering and `PYBOOT_*` overrides in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use pyboot::config::load_config_with_env;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let explicit = temp.path().join("pyboot.yml");
//! fs::write(&explicit, "package:\n  name: other-mcp\n").unwrap();
//!
//! let config = load_config_with_env(temp.path(), Some(&explicit), |_| None).unwrap();
//! assert_eq!(config.package.name, "other-mcp");
//! assert_eq!(config.runtime.min_version, "3.10");
//! ```

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{
    apply_env_overrides, env, load_config, load_config_value, load_config_with_env,
    load_merged_config, parse_flag, ConfigPaths,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{InstallConfig, LauncherConfig, PackageConfig, RuntimeConfig, SupervisorConfig};
pub use validator::{validate, validate_config, ValidationError};
