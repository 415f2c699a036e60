use std::path::PathBuf;

use tempfile::TempDir;

use mcpdesk_core::commands::StatusCommand;
use mcpdesk_core::config::ServerEntry;
use mcpdesk_core::registry::ConfigRegistry;
use mcpdesk_core::validate::{CommandResolver, FindingKind};

struct Nothing;

impl CommandResolver for Nothing {
    fn resolve(&self, _command: &str) -> Option<PathBuf> {
        None
    }
}

fn registry_in(temp: &TempDir) -> ConfigRegistry {
    ConfigRegistry::new(temp.path().join("config.json"), temp.path().join("backups"))
}

#[test]
fn status_without_config() {
    let temp = TempDir::new().unwrap();

    let report = StatusCommand::with_resolver(registry_in(&temp), Box::new(Nothing))
        .execute()
        .unwrap();

    assert!(!report.configured);
    assert!(report.servers.is_empty());
    assert!(report.latest_backup.is_none());
    assert_eq!(report.backup_count, 0);
    assert_eq!(report.validation.total, 0);
}

#[test]
fn status_lists_servers_without_env_values() {
    let temp = TempDir::new().unwrap();
    let registry = registry_in(&temp);
    registry
        .upsert(
            "brave-search",
            ServerEntry::new("npx")
                .with_args(["@modelcontextprotocol/server-brave-search"])
                .with_env("BRAVE_API_KEY", "sk-secret"),
        )
        .unwrap();
    registry
        .upsert("custom", ServerEntry::new("/opt/custom/server"))
        .unwrap();

    let report = StatusCommand::with_resolver(registry.clone(), Box::new(Nothing))
        .execute()
        .unwrap();

    assert!(report.configured);
    assert_eq!(report.servers.len(), 2);
    let brave = &report.servers[0];
    assert_eq!(brave.name, "brave-search");
    assert_eq!(brave.env_keys, vec!["BRAVE_API_KEY".to_string()]);
    assert!(brave.cataloged);
    assert!(!report.servers[1].cataloged);

    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("sk-secret"));

    assert_eq!(report.backup_count, 1);
    assert_eq!(report.latest_backup, registry.backups().unwrap().last().cloned());
    assert_eq!(
        report
            .validation
            .findings
            .iter()
            .filter(|f| f.kind == FindingKind::CommandNotResolvable)
            .count(),
        2
    );
}

#[test]
fn status_propagates_parse_errors() {
    let temp = TempDir::new().unwrap();
    let registry = registry_in(&temp);
    std::fs::write(registry.config_path(), "not json").unwrap();

    let result = StatusCommand::with_resolver(registry, Box::new(Nothing)).execute();

    assert!(result.is_err());
}
