use std::collections::HashSet;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use mcpdesk_core::config::ConfigDocument;
use mcpdesk_core::registry::ConfigRegistry;
use mcpdesk_core::validate::{CommandResolver, FindingKind, Severity, validate_document};

/// Resolver that only knows a fixed set of commands.
struct KnownCommands(HashSet<&'static str>);

impl KnownCommands {
    fn new(commands: &[&'static str]) -> Self {
        Self(commands.iter().copied().collect())
    }
}

impl CommandResolver for KnownCommands {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        self.0
            .contains(command)
            .then(|| PathBuf::from("/usr/local/bin").join(command))
    }
}

fn document(value: serde_json::Value) -> ConfigDocument {
    serde_json::from_value(value).unwrap()
}

#[test]
fn missing_command_is_an_error() {
    let doc = document(json!({"mcpServers": {"x": {}}}));

    let report = validate_document(&doc, &KnownCommands::new(&["npx"]));

    assert_eq!(report.total, 1);
    assert_eq!(report.valid, 0);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].server, "x");
    assert_eq!(report.findings[0].kind, FindingKind::MissingCommand);
    assert_eq!(report.findings[0].severity, Severity::Error);
}

#[test]
fn empty_command_is_an_error() {
    let doc = document(json!({"mcpServers": {"x": {"command": ""}}}));

    let report = validate_document(&doc, &KnownCommands::new(&[]));

    assert_eq!(report.valid, 0);
    assert_eq!(report.errors().count(), 1);
}

#[test]
fn null_command_is_reported_as_missing() {
    let doc = document(json!({"mcpServers": {"ok": {"command": "npx"}, "x": {"command": null}}}));

    let report = validate_document(&doc, &KnownCommands::new(&["npx"]));

    assert_eq!(report.total, 2);
    assert_eq!(report.valid, 1);
    let x: Vec<_> = report.for_server("x").collect();
    assert_eq!(x.len(), 1);
    assert_eq!(x[0].kind, FindingKind::MissingCommand);
    assert_eq!(report.for_server("ok").count(), 0);
}

#[test]
fn placeholder_env_value_is_a_warning() {
    let doc = document(json!({
        "mcpServers": {
            "brave-search": {
                "command": "npx",
                "env": {"API_KEY": "your-brave-api-key-here"}
            },
            "real": {
                "command": "npx",
                "env": {"API_KEY": "sk-real-value"}
            }
        }
    }));

    let report = validate_document(&doc, &KnownCommands::new(&["npx"]));

    assert_eq!(report.total, 2);
    assert_eq!(report.valid, 2);
    let brave: Vec<_> = report.for_server("brave-search").collect();
    assert_eq!(brave.len(), 1);
    assert_eq!(brave[0].kind, FindingKind::PlaceholderValue);
    assert_eq!(brave[0].severity, Severity::Warning);
    assert!(brave[0].detail.contains("API_KEY"));
    assert_eq!(report.for_server("real").count(), 0);
}

#[test]
fn unresolvable_command_is_advisory() {
    let doc = document(json!({"mcpServers": {"custom": {"command": "my-server"}}}));

    let report = validate_document(&doc, &KnownCommands::new(&["npx"]));

    assert_eq!(report.valid, 1);
    assert_eq!(report.warnings().count(), 1);
    assert_eq!(report.findings[0].kind, FindingKind::CommandNotResolvable);
}

#[test]
fn clean_document_has_no_findings() {
    let doc = document(json!({
        "mcpServers": {
            "filesystem": {"command": "npx", "args": ["@modelcontextprotocol/server-filesystem", "/tmp"]},
            "memory": {"command": "npx", "args": ["@modelcontextprotocol/server-memory"]}
        }
    }));

    let report = validate_document(&doc, &KnownCommands::new(&["npx"]));

    assert!(report.is_clean());
    assert_eq!(report.total, 2);
    assert_eq!(report.valid, 2);
}

#[test]
fn registry_validate_does_not_mutate() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.json");
    let registry = ConfigRegistry::new(&config_path, temp.path().join("backups"));
    let content = r#"{"mcpServers": {"x": {}, "y": {"command": "npx", "env": {"K": "your-k-here"}}}}"#;
    std::fs::write(&config_path, content).unwrap();

    let report = registry
        .validate_with(&KnownCommands::new(&["npx"]))
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.valid, 1);
    assert_eq!(report.findings.len(), 2);
    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), content);
    assert!(!temp.path().join("backups").exists());
}

#[test]
fn registry_validate_reports_null_command_from_disk() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.json");
    let registry = ConfigRegistry::new(&config_path, temp.path().join("backups"));
    std::fs::write(
        &config_path,
        r#"{"mcpServers":{"ok":{"command":"npx"},"x":{"command":null}}}"#,
    )
    .unwrap();

    let report = registry
        .validate_with(&KnownCommands::new(&["npx"]))
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.valid, 1);
    assert_eq!(report.errors().count(), 1);
    assert_eq!(report.errors().next().unwrap().server, "x");
}

#[test]
fn registry_validate_without_config_is_empty() {
    let temp = TempDir::new().unwrap();
    let registry = ConfigRegistry::new(temp.path().join("config.json"), temp.path().join("backups"));

    let report = registry.validate().unwrap();

    assert_eq!(report.total, 0);
    assert!(report.is_clean());
}
