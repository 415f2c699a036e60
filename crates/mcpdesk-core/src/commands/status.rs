//! Status collection for the configured MCP servers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::registry::ConfigRegistry;
use crate::validate::{CommandResolver, PathResolver, ValidationReport, validate_document};

/// Summary of one configured server. Env values are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub env_keys: Vec<String>,
    /// Whether the server is known to the catalog
    pub cataloged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub config_path: PathBuf,
    /// Whether the config file exists
    pub configured: bool,
    pub servers: Vec<ServerStatus>,
    pub latest_backup: Option<PathBuf>,
    pub backup_count: usize,
    pub validation: ValidationReport,
}

pub struct StatusCommand {
    registry: ConfigRegistry,
    resolver: Box<dyn CommandResolver>,
}

impl StatusCommand {
    pub fn new(registry: ConfigRegistry) -> Self {
        Self::with_resolver(registry, Box::new(PathResolver))
    }

    pub fn with_resolver(registry: ConfigRegistry, resolver: Box<dyn CommandResolver>) -> Self {
        Self { registry, resolver }
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(ConfigRegistry::with_defaults()?))
    }

    pub fn execute(&self) -> anyhow::Result<StatusReport> {
        let document = self.registry.load()?;
        let configured = document.is_some();
        let document = document.unwrap_or_default();

        let servers = document
            .mcp_servers
            .iter()
            .map(|(name, entry)| ServerStatus {
                name: name.clone(),
                command: entry.command.clone(),
                args: entry.args.clone(),
                env_keys: entry.env.keys().cloned().collect(),
                cataloged: crate::catalog::lookup(name).is_ok(),
            })
            .collect();

        let backups = self.registry.backups()?;

        Ok(StatusReport {
            config_path: self.registry.config_path().to_path_buf(),
            configured,
            servers,
            latest_backup: backups.last().cloned(),
            backup_count: backups.len(),
            validation: validate_document(&document, self.resolver.as_ref()),
        })
    }
}
