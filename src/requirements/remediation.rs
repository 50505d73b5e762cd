//! The diagnostic shown when every install strategy failed.

use std::fmt::Write;

use crate::shell::Platform;

use super::status::{AttemptLog, AttemptOutcome, PackageSpec};

/// A manual fix the user can paste into a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remediation {
    pub title: String,
    pub commands: Vec<String>,
}

/// The three manual routes, in order of preference.
pub fn remediations(package: &PackageSpec, platform: Platform) -> Vec<Remediation> {
    let mut pipx = Vec::new();
    if let Some(manager) = platform.system_package_manager() {
        pipx.push(manager.install_command("pipx").to_string());
    }
    pipx.push(format!("pipx install {}", package.name));

    let python = if platform.is_windows() { "python" } else { "python3" };

    vec![
        Remediation {
            title: "Install with pipx (recommended for applications)".to_string(),
            commands: pipx,
        },
        Remediation {
            title: "Use a virtual environment".to_string(),
            commands: vec![
                format!("{} -m venv venv", python),
                platform.venv_activate("venv"),
                format!("pip install {}", package.name),
            ],
        },
        Remediation {
            title: "Override the system package guard (not recommended)".to_string(),
            commands: vec![format!(
                "{} -m pip install --break-system-packages {}",
                python, package.name
            )],
        },
    ]
}

/// Render every attempt followed by the manual remediations.
pub fn exhausted_report(log: &AttemptLog, package: &PackageSpec, platform: Platform) -> String {
    let mut out = String::new();

    if log.is_empty() {
        out.push_str("No install strategy applied on this system.\n");
    } else {
        out.push_str("Attempted:\n");
        for (i, attempt) in log.attempts().iter().enumerate() {
            let _ = writeln!(out, "  {}. {}: {}", i + 1, attempt.strategy_name, attempt.command);
            let status = match &attempt.outcome {
                AttemptOutcome::Success => "ok".to_string(),
                AttemptOutcome::Failure(reason) => reason.to_string(),
            };
            let _ = writeln!(out, "     {}", status);
            if let Some(diagnostic) = &attempt.diagnostic {
                let _ = writeln!(out, "     {}", diagnostic);
            }
        }
    }

    out.push_str("\nTroubleshooting options:\n");
    for (i, remediation) in remediations(package, platform).iter().enumerate() {
        let _ = writeln!(out, "  {}. {}:", i + 1, remediation.title);
        for command in &remediation.commands {
            let _ = writeln!(out, "       {}", command);
        }
    }

    out.trim_end().to_string()
}
