//! mcpdesk Core Library
//!
//! Installs and validates MCP server integrations for the desktop client by
//! managing the `mcpServers` section of its JSON configuration file.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod fs;
pub mod installer;
pub mod registry;
pub mod validate;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::catalog::{CatalogEntry, CatalogError, InstallParams};
    pub use crate::commands::{InstallCommand, InstallOptions, StatusCommand};
    pub use crate::config::{ConfigDocument, ServerEntry, Settings};
    pub use crate::installer::{InstallError, Installer, NpmInstaller};
    pub use crate::registry::{ConfigRegistry, RegistryError};
    pub use crate::validate::{CommandResolver, FindingKind, Severity, ValidationReport};
}
