//! Install command implementation.
//!
//! Looks the server up in the catalog, builds its entry from explicit
//! parameters, installs the package and upserts the entry into the desktop
//! client config.

use std::path::PathBuf;

use anyhow::Context;
use tracing::warn;

use crate::catalog::{self, InstallParams};
use crate::config::Settings;
use crate::installer::{Installer, NpmInstaller};
use crate::registry::ConfigRegistry;

/// Options for the install command
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Catalog identifier of the server
    pub name: String,
    /// Parameter values (args and env)
    pub params: InstallParams,
    /// Only write the config entry, skip the package manager
    pub skip_package: bool,
}

impl InstallOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: InstallParams::new(),
            skip_package: false,
        }
    }

    /// Set a parameter value
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.values.insert(key.into(), value.into());
        self
    }

    /// Add a `KEY=VALUE` parameter
    pub fn with_param_pair(self, pair: &str) -> anyhow::Result<Self> {
        let (key, value) = pair
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Invalid parameter '{}'. Use KEY=VALUE", pair))?;
        Ok(self.with_param(key.trim(), value))
    }

    /// Fill missing parameters with `your-*-here` placeholders
    pub fn with_placeholders(mut self, allow: bool) -> Self {
        self.params.allow_placeholders = allow;
        self
    }

    pub fn with_skip_package(mut self, skip: bool) -> Self {
        self.skip_package = skip;
        self
    }
}

/// Report from an install operation
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub name: String,
    pub package: String,
    /// Whether the package manager ran
    pub package_installed: bool,
    /// Whether an existing entry was replaced
    pub replaced: bool,
    /// Backup written before the config changed
    pub backup: Option<PathBuf>,
    pub config_path: PathBuf,
    pub warnings: Vec<String>,
}

/// Install command orchestrator
pub struct InstallCommand {
    registry: ConfigRegistry,
    installer: Box<dyn Installer>,
}

impl InstallCommand {
    pub fn new(registry: ConfigRegistry, installer: Box<dyn Installer>) -> Self {
        Self {
            registry,
            installer,
        }
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        let settings = Settings::load_default()?;
        Self::from_settings(&settings)
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(
            ConfigRegistry::from_settings(settings)?,
            Box::new(NpmInstaller::new(settings.npm_program())),
        ))
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    pub fn execute(&self, options: &InstallOptions) -> anyhow::Result<InstallReport> {
        let catalog_entry = catalog::lookup(&options.name)?;
        let built = catalog_entry.build_entry(&options.params)?;

        let mut warnings = Vec::new();
        for key in &built.placeholders {
            warn!(server = catalog_entry.id, key = key.as_str(), "using placeholder value");
            warnings.push(format!(
                "{} was not provided; edit {} and replace the placeholder",
                key,
                self.registry.config_path().display()
            ));
        }

        if !options.skip_package {
            self.installer
                .install(catalog_entry.package)
                .with_context(|| format!("Failed to install '{}'", catalog_entry.id))?;
        }

        let upserted = self
            .registry
            .upsert(catalog_entry.id, built.entry)
            .with_context(|| format!("Failed to configure '{}'", catalog_entry.id))?;

        Ok(InstallReport {
            name: catalog_entry.id.to_string(),
            package: catalog_entry.package.to_string(),
            package_installed: !options.skip_package,
            replaced: upserted.replaced,
            backup: upserted.backup,
            config_path: self.registry.config_path().to_path_buf(),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_pair_parsing() {
        let options = InstallOptions::new("filesystem")
            .with_param_pair("path=/tmp/a=b")
            .unwrap();
        assert_eq!(options.params.get("path"), Some("/tmp/a=b"));
    }

    #[test]
    fn test_param_pair_requires_key() {
        assert!(InstallOptions::new("x").with_param_pair("=value").is_err());
        assert!(InstallOptions::new("x").with_param_pair("novalue").is_err());
    }
}
