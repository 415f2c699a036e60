//! Tool settings (`settings.toml`) with helpful parse errors.
//!
//! ```toml
//! config_path = "~/.config/Claude/claude_desktop_config.json"
//! backup_dir = "~/.config/Claude/backups"
//! npm = "npm"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::paths::{backup_dir_for, default_client_config_path, expand_home};

/// Environment variable pointing at an alternative settings file.
pub const SETTINGS_ENV: &str = "MCPDESK_SETTINGS";

/// Default package manager program.
pub const DEFAULT_NPM: &str = "npm";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Desktop client configuration file
    #[serde(default)]
    pub config_path: Option<PathBuf>,

    /// Directory receiving timestamped backups
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,

    /// Package manager used for global installs
    #[serde(default)]
    pub npm: Option<String>,
}

impl Settings {
    /// Default settings file location (`<config dir>/mcpdesk/settings.toml`).
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("mcpdesk").join("settings.toml"))
    }

    /// Load settings from the default location; a missing file yields defaults.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        parse_settings_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Resolved desktop client config path.
    pub fn resolve_config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(expand_home(path)),
            None => default_client_config_path(),
        }
    }

    /// Resolved backup directory for the given config path.
    pub fn resolve_backup_dir(&self, config_path: &Path) -> PathBuf {
        match &self.backup_dir {
            Some(dir) => expand_home(dir),
            None => backup_dir_for(config_path),
        }
    }

    pub fn npm_program(&self) -> &str {
        self.npm.as_deref().unwrap_or(DEFAULT_NPM)
    }
}

/// Parse settings content from string
pub fn parse_settings_str(content: &str) -> Result<Settings> {
    toml::from_str(content).map_err(|e| enhance_toml_error(e, content))
}

/// Enhance TOML parsing errors with the offending lines
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();

    let line_num = error
        .span()
        .and_then(|span| content.get(..span.start))
        .map(|prefix| prefix.matches('\n').count() + 1);

    match line_num {
        Some(line_num) => anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            get_line_context(content, line_num),
            message
        ),
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
