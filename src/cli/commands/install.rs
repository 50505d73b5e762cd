//! `pyboot-setup install`: install the package and print the client config.
//!
//! Progress goes to stderr. Stdout carries only the JSON snippet, so it can
//! be piped straight into a client's configuration file.

use serde_json::{json, Value};

use crate::bootstrap::Bootstrap;
use crate::error::{PybootError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Command an MCP client should run to start the service.
const LAUNCHER: &str = "pyboot";

/// The install command implementation.
pub struct InstallCommand<'a> {
    bootstrap: Bootstrap<'a>,
}

impl<'a> InstallCommand<'a> {
    /// Create a new install command.
    pub fn new(bootstrap: Bootstrap<'a>) -> Self {
        Self { bootstrap }
    }

    /// MCP client configuration registering the launcher.
    pub fn client_snippet(&self) -> Value {
        let mut servers = serde_json::Map::new();
        servers.insert(
            server_key(&self.bootstrap.config().package.name),
            json!({ "command": LAUNCHER }),
        );
        json!({ "mcpServers": servers })
    }
}

/// "visidata-mcp" registers as "visidata".
fn server_key(package: &str) -> String {
    package
        .strip_suffix("-mcp")
        .filter(|key| !key.is_empty())
        .unwrap_or(package)
        .to_string()
}

impl Command for InstallCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let installation = self.bootstrap.prepare(ui)?;
        let package = &self.bootstrap.config().package.name;

        if installation.was_present() {
            ui.success(&format!(
                "{} is already installed for {}",
                package, installation.runtime.version_string
            ));
        }

        let snippet = serde_json::to_string_pretty(&self.client_snippet())
            .map_err(|e| PybootError::Other(e.into()))?;
        ui.message("Add this to your MCP client configuration:");
        println!("{}", snippet);

        Ok(CommandResult::success())
    }
}
