//! Desktop client configuration schema.
//!
//! Mirrors the `claude_desktop_config.json` layout:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "filesystem": {
//!       "command": "npx",
//!       "args": ["@modelcontextprotocol/server-filesystem", "/home/user/Documents"],
//!       "env": {}
//!     }
//!   }
//! }
//! ```
//!
//! Keys this crate does not manage are carried through untouched, since the
//! desktop client keeps its own settings in the same file.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Root of the desktop client configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Server name -> launch configuration
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, ServerEntry>,

    /// Unmanaged top-level keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a server entry, returning the previous one.
    pub fn upsert(&mut self, name: impl Into<String>, entry: ServerEntry) -> Option<ServerEntry> {
        self.mcp_servers.insert(name.into(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&ServerEntry> {
        self.mcp_servers.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.mcp_servers.is_empty()
    }

    /// Pretty-printed JSON, terminated by a newline.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        Ok(content)
    }
}

/// Launch configuration for one MCP server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Executable name or path. Empty means the entry is unusable.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub command: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Environment overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Unmanaged per-entry keys (e.g. `type`, `url`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerEntry {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// `"command": null` reads the same as an absent command.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
