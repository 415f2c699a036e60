//! Catalog of known MCP servers.
//!
//! Each entry names the npm package to install globally and describes how
//! to build its [`ServerEntry`] from caller-supplied parameters.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::ServerEntry;
use crate::validate::placeholder_for;

/// Command used to launch catalog servers.
pub const LAUNCHER: &str = "npx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Appended to `args`
    Arg,
    /// Set in `env`
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Parameter key (env variable name for [`ParamKind::Env`])
    pub key: &'static str,
    pub kind: ParamKind,
    pub prompt: &'static str,
    /// Whether the value is a credential
    pub secret: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub description: &'static str,
    pub package: &'static str,
    pub params: &'static [Param],
}

const fn arg(key: &'static str, prompt: &'static str) -> Param {
    Param {
        key,
        kind: ParamKind::Arg,
        prompt,
        secret: false,
    }
}

const fn secret(key: &'static str, prompt: &'static str) -> Param {
    Param {
        key,
        kind: ParamKind::Env,
        prompt,
        secret: true,
    }
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "filesystem",
        description: "Read and write files under an allowed directory",
        package: "@modelcontextprotocol/server-filesystem",
        params: &[arg("path", "Directory the server may access")],
    },
    CatalogEntry {
        id: "brave-search",
        description: "Web and local search through the Brave Search API",
        package: "@modelcontextprotocol/server-brave-search",
        params: &[secret("BRAVE_API_KEY", "Brave Search API key")],
    },
    CatalogEntry {
        id: "github",
        description: "Repositories, issues and pull requests on GitHub",
        package: "@modelcontextprotocol/server-github",
        params: &[secret(
            "GITHUB_PERSONAL_ACCESS_TOKEN",
            "GitHub personal access token",
        )],
    },
    CatalogEntry {
        id: "memory",
        description: "Knowledge-graph based persistent memory",
        package: "@modelcontextprotocol/server-memory",
        params: &[],
    },
    CatalogEntry {
        id: "puppeteer",
        description: "Browser automation with Puppeteer",
        package: "@modelcontextprotocol/server-puppeteer",
        params: &[],
    },
    CatalogEntry {
        id: "sequential-thinking",
        description: "Structured step-by-step problem solving",
        package: "@modelcontextprotocol/server-sequential-thinking",
        params: &[],
    },
    CatalogEntry {
        id: "slack",
        description: "Channels and messages in a Slack workspace",
        package: "@modelcontextprotocol/server-slack",
        params: &[
            secret("SLACK_BOT_TOKEN", "Slack bot token (xoxb-...)"),
            secret("SLACK_TEAM_ID", "Slack team ID"),
        ],
    },
    CatalogEntry {
        id: "postgres",
        description: "Read-only access to a PostgreSQL database",
        package: "@modelcontextprotocol/server-postgres",
        params: &[arg("database_url", "PostgreSQL connection URL")],
    },
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown server '{0}'. Run 'mcpdesk list' to see available servers")]
    UnknownServer(String),

    #[error("Missing required parameter '{key}' for server '{server}'")]
    MissingParameter { server: String, key: String },
}

/// Caller-supplied parameter values for building an entry.
///
/// Deciding whether to prompt, fail or fall back to a placeholder belongs to
/// the caller; the catalog only applies that decision.
#[derive(Debug, Clone, Default)]
pub struct InstallParams {
    pub values: BTreeMap<String, String>,
    /// Substitute `your-*-here` sentinels for missing secrets
    pub allow_placeholders: bool,
}

impl InstallParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_placeholders(mut self, allow: bool) -> Self {
        self.allow_placeholders = allow;
        self
    }

    /// Value for a key; empty strings count as missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Entry built from the catalog, plus the keys that received placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltEntry {
    pub entry: ServerEntry,
    pub placeholders: Vec<String>,
}

pub fn lookup(id: &str) -> Result<&'static CatalogEntry, CatalogError> {
    CATALOG
        .iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| CatalogError::UnknownServer(id.to_string()))
}

impl CatalogEntry {
    /// Shell command that installs the server package.
    pub fn install_command(&self) -> String {
        format!("npm install -g {}", self.package)
    }

    pub fn build_entry(&self, params: &InstallParams) -> Result<BuiltEntry, CatalogError> {
        let mut entry = ServerEntry::new(LAUNCHER).with_args([self.package]);
        let mut placeholders = Vec::new();

        for param in self.params {
            let value = match params.get(param.key) {
                Some(value) => value.to_string(),
                // Only credentials may be left for later; args are required.
                None if params.allow_placeholders && param.secret => {
                    placeholders.push(param.key.to_string());
                    placeholder_for(param.key)
                }
                None => {
                    return Err(CatalogError::MissingParameter {
                        server: self.id.to_string(),
                        key: param.key.to_string(),
                    });
                }
            };

            match param.kind {
                ParamKind::Arg => entry.args.push(value),
                ParamKind::Env => {
                    entry.env.insert(param.key.to_string(), value);
                }
            }
        }

        Ok(BuiltEntry {
            entry,
            placeholders,
        })
    }
}
