//! Config path resolution helpers.

use std::path::{Path, PathBuf};

/// Directory name the desktop client uses under the platform config dir.
pub const CLIENT_DIR_NAME: &str = "Claude";

/// File name of the desktop client configuration.
pub const CLIENT_CONFIG_FILE: &str = "claude_desktop_config.json";

/// Directory name for backups, next to the configuration file.
pub const BACKUP_DIR_NAME: &str = "backups";

/// Default desktop client config path for the current user.
///
/// `~/Library/Application Support/Claude` on macOS, `%APPDATA%\Claude` on
/// Windows and `~/.config/Claude` elsewhere.
pub fn default_client_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(client_config_path_in(&config_dir))
}

pub fn client_config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(CLIENT_DIR_NAME).join(CLIENT_CONFIG_FILE)
}

/// Sibling `backups` directory for a configuration file.
pub fn backup_dir_for(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|parent| parent.join(BACKUP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(BACKUP_DIR_NAME))
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_dir_is_sibling() {
        let config = Path::new("/home/user/.config/Claude/claude_desktop_config.json");
        assert_eq!(
            backup_dir_for(config),
            PathBuf::from("/home/user/.config/Claude/backups")
        );
    }

    #[test]
    fn test_client_config_path_in() {
        assert_eq!(
            client_config_path_in(Path::new("/cfg")),
            PathBuf::from("/cfg/Claude/claude_desktop_config.json")
        );
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        let path = Path::new("/etc/mcp.json");
        assert_eq!(expand_home(path), path.to_path_buf());
    }

    #[test]
    fn test_expand_home_expands_tilde() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_home(Path::new("~/x.json")), home.join("x.json"));
    }
}
