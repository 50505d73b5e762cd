//! Configuration validation rules.
//!
//! Validation collects every problem instead of stopping at the first, so
//! a user can fix a config file in one pass.

use std::collections::HashSet;

use crate::config::schema::LauncherConfig;
use crate::error::{PybootError, Result};
use crate::requirements::StrategyKind;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Dotted path of the offending field
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &LauncherConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_package(config));
    errors.extend(validate_runtime(config));
    errors.extend(validate_install(config));

    errors
}

fn validate_package(config: &LauncherConfig) -> Vec<ValidationError> {
    let package = &config.package;
    [
        ("package.name", &package.name),
        ("package.import_name", &package.import_name),
        ("package.module", &package.module),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| {
        ValidationError::new("empty-name", field, format!("'{}' must not be empty", field))
    })
    .collect()
}

fn validate_runtime(config: &LauncherConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let runtime = &config.runtime;

    if runtime.candidates.is_empty() {
        errors.push(ValidationError::new(
            "no-candidates",
            "runtime.candidates",
            "At least one interpreter candidate is required",
        ));
    }
    if runtime.candidates.iter().any(|c| c.trim().is_empty()) {
        errors.push(ValidationError::new(
            "empty-candidate",
            "runtime.candidates",
            "Interpreter candidates must not be empty strings",
        ));
    }
    if let Err(e) = runtime.floor() {
        errors.push(ValidationError::new(
            "invalid-min-version",
            "runtime.min_version",
            format!("Invalid minimum Python version: {}", e),
        ));
    }
    if runtime.probe_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "zero-probe-timeout",
            "runtime.probe_timeout_secs",
            "Probe timeout must be at least one second",
        ));
    }

    errors
}

fn validate_install(config: &LauncherConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let strategies = &config.install.strategies;

    if strategies.is_empty() {
        errors.push(ValidationError::new(
            "no-strategies",
            "install.strategies",
            "At least one install strategy is required",
        ));
    }

    let mut seen = HashSet::new();
    for kind in strategies {
        if !seen.insert(*kind) {
            errors.push(ValidationError::new(
                "duplicate-strategy",
                "install.strategies",
                format!("Strategy '{}' is listed more than once", kind),
            ));
        }
    }

    if let Some(bootstrap) = strategies
        .iter()
        .position(|k| *k == StrategyKind::BootstrapPipx)
    {
        let pipx = strategies.iter().position(|k| *k == StrategyKind::Pipx);
        if pipx.is_none_or(|pipx| pipx > bootstrap) {
            errors.push(ValidationError::new(
                "bootstrap-without-pipx",
                "install.strategies",
                "'bootstrap-pipx' must come after 'pipx'",
            ));
        }
    }

    errors
}

/// Validate and fold every problem into one `ConfigValidationError`.
pub fn validate(config: &LauncherConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors
            .iter()
            .map(|e| format!("{} [{}]", e.message, e.rule))
            .collect();
        Err(PybootError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(config: &LauncherConfig) -> Vec<String> {
        validate_config(config).into_iter().map(|e| e.rule).collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&LauncherConfig::default()).is_empty());
        assert!(validate(&LauncherConfig::default()).is_ok());
    }

    #[test]
    fn empty_names_are_reported_per_field() {
        let mut config = LauncherConfig::default();
        config.package.name = String::new();
        config.package.module = "  ".to_string();

        let errors = validate_config(&config);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["package.name", "package.module"]);
    }

    #[test]
    fn runtime_rules() {
        let mut config = LauncherConfig::default();
        config.runtime.candidates.clear();
        config.runtime.min_version = "3".to_string();
        config.runtime.probe_timeout_secs = 0;

        let rules = rules(&config);
        assert!(rules.contains(&"no-candidates".to_string()));
        assert!(rules.contains(&"invalid-min-version".to_string()));
        assert!(rules.contains(&"zero-probe-timeout".to_string()));
    }

    #[test]
    fn strategies_must_be_present_and_unique() {
        let mut config = LauncherConfig::default();
        config.install.strategies.clear();
        assert_eq!(rules(&config), ["no-strategies"]);

        config.install.strategies = vec![StrategyKind::User, StrategyKind::User];
        assert_eq!(rules(&config), ["duplicate-strategy"]);
    }

    #[test]
    fn bootstrap_requires_pipx_before_it() {
        let mut config = LauncherConfig::default();
        config.install.strategies = vec![StrategyKind::Direct, StrategyKind::BootstrapPipx];
        assert_eq!(rules(&config), ["bootstrap-without-pipx"]);

        config.install.strategies = vec![StrategyKind::BootstrapPipx, StrategyKind::Pipx];
        assert_eq!(rules(&config), ["bootstrap-without-pipx"]);

        config.install.strategies = vec![StrategyKind::Pipx, StrategyKind::BootstrapPipx];
        assert!(rules(&config).is_empty());
    }

    #[test]
    fn validate_joins_all_errors_with_rule_ids() {
        let mut config = LauncherConfig::default();
        config.runtime.candidates.clear();
        config.install.strategies.clear();

        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("[no-candidates]"));
        assert!(err.contains("[no-strategies]"));
    }
}
