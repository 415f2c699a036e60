//! Read-only validation of configured MCP server entries.
//!
//! Findings are collected into a [`ValidationReport`]; validation never
//! aborts on a bad entry and never touches the filesystem beyond looking up
//! commands.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDocument, ServerEntry};

/// Severity of a finding. Only errors make an entry invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// `command` is absent or empty
    MissingCommand,
    /// `command` was not found on the search path (advisory)
    CommandNotResolvable,
    /// An `env` value still holds an installer placeholder
    PlaceholderValue,
}

impl FindingKind {
    pub fn severity(self) -> Severity {
        match self {
            FindingKind::MissingCommand => Severity::Error,
            FindingKind::CommandNotResolvable | FindingKind::PlaceholderValue => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub server: String,
    pub kind: FindingKind,
    pub severity: Severity,
    pub detail: String,
}

impl Finding {
    fn new(server: &str, kind: FindingKind, detail: String) -> Self {
        Self {
            server: server.to_string(),
            kind,
            severity: kind.severity(),
            detail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Number of entries examined
    pub total: usize,
    /// Entries without error findings
    pub valid: usize,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn for_server<'a>(&'a self, server: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.server == server)
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Locates executables for the advisory resolvability check.
pub trait CommandResolver {
    fn resolve(&self, command: &str) -> Option<PathBuf>;
}

/// Resolves commands through `PATH`; paths are checked for existence.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathResolver;

impl CommandResolver for PathResolver {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        let path = Path::new(command);
        if path.components().count() > 1 || path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }
        which::which(command).ok()
    }
}

/// Whether a value is an unfilled `your-*-here` sentinel.
pub fn is_placeholder(value: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)^your-.*-here$").expect("valid placeholder regex"))
        .is_match(value)
}

/// Placeholder sentinel for a parameter, e.g. `BRAVE_API_KEY` ->
/// `your-brave-api-key-here`.
pub fn placeholder_for(param: &str) -> String {
    let slug = param.to_lowercase().replace('_', "-");
    format!("your-{slug}-here")
}

/// Validate all entries of a document.
pub fn validate_document(
    document: &ConfigDocument,
    resolver: &dyn CommandResolver,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (name, entry) in &document.mcp_servers {
        let findings = validate_entry(name, entry, resolver);
        report.total += 1;
        if !findings.iter().any(|f| f.severity == Severity::Error) {
            report.valid += 1;
        }
        report.findings.extend(findings);
    }

    report
}

pub fn validate_entry(
    name: &str,
    entry: &ServerEntry,
    resolver: &dyn CommandResolver,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    let command = entry.command.trim();
    if command.is_empty() {
        findings.push(Finding::new(
            name,
            FindingKind::MissingCommand,
            "no command configured".to_string(),
        ));
    } else if resolver.resolve(command).is_none() {
        findings.push(Finding::new(
            name,
            FindingKind::CommandNotResolvable,
            format!("'{}' was not found on PATH", command),
        ));
    }

    for (key, value) in &entry.env {
        if is_placeholder(value) {
            findings.push(Finding::new(
                name,
                FindingKind::PlaceholderValue,
                format!("{} is still set to placeholder '{}'", key, value),
            ));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Everywhere;

    impl CommandResolver for Everywhere {
        fn resolve(&self, command: &str) -> Option<PathBuf> {
            Some(PathBuf::from("/usr/bin").join(command))
        }
    }

    #[test]
    fn test_placeholder_pattern() {
        assert!(is_placeholder("your-brave-api-key-here"));
        assert!(is_placeholder("your--here"));
        assert!(!is_placeholder("sk-real-value"));
        assert!(!is_placeholder("prefix your-key-here"));
        assert!(!is_placeholder("your-key-here-now"));
    }

    #[test]
    fn test_placeholder_spanning_lines() {
        assert!(is_placeholder("your-multi\nline-here"));
        assert!(!is_placeholder("your-key-here\nsk-real-value"));
    }

    #[test]
    fn test_placeholder_for() {
        assert_eq!(placeholder_for("BRAVE_API_KEY"), "your-brave-api-key-here");
        assert!(is_placeholder(&placeholder_for("GITHUB_PERSONAL_ACCESS_TOKEN")));
    }

    #[test]
    fn test_whitespace_command_is_missing() {
        let findings = validate_entry("x", &ServerEntry::new("   "), &Everywhere);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::MissingCommand);
    }

    #[test]
    fn test_missing_command_skips_resolution() {
        struct Panics;
        impl CommandResolver for Panics {
            fn resolve(&self, _: &str) -> Option<PathBuf> {
                panic!("resolver must not be called");
            }
        }

        let findings = validate_entry("x", &ServerEntry::default(), &Panics);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_path_resolver_checks_paths() {
        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("server.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        assert!(PathResolver.resolve(script.to_str().unwrap()).is_some());
        assert!(
            PathResolver
                .resolve(temp.path().join("missing").to_str().unwrap())
                .is_none()
        );
    }
}
