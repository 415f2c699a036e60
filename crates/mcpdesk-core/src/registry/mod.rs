//! Registry of MCP server entries stored in the desktop client config file.
//!
//! Every mutation is a single read-modify-write cycle:
//! load the document, copy the current file to the backup directory, apply
//! the change in memory and write the whole document back atomically.

mod error;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::{debug, info};

use crate::config::{ConfigDocument, ServerEntry, Settings};
use crate::fs::write_atomic;
use crate::validate::{CommandResolver, PathResolver, ValidationReport, validate_document};

pub use error::{RegistryError, Result};

/// Timestamp format for backup file names; sorts lexicographically.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Result of an upsert.
#[derive(Debug, Clone)]
pub struct UpsertReport {
    /// Document as written to disk
    pub document: ConfigDocument,
    /// Backup of the previous file, if there was one
    pub backup: Option<PathBuf>,
    /// Whether an entry with the same name was replaced
    pub replaced: bool,
}

/// Owns the desktop client configuration file and its backups.
#[derive(Debug, Clone)]
pub struct ConfigRegistry {
    config_path: PathBuf,
    backup_dir: PathBuf,
}

impl ConfigRegistry {
    pub fn new(config_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Resolve paths from `settings.toml` and platform defaults.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let settings = Settings::load_default()?;
        Self::from_settings(&settings)
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let config_path = settings.resolve_config_path()?;
        let backup_dir = settings.resolve_backup_dir(&config_path);
        Ok(Self::new(config_path, backup_dir))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Read and parse the configuration file.
    ///
    /// Returns `Ok(None)` when the file does not exist yet.
    pub fn load(&self) -> Result<Option<ConfigDocument>> {
        let bytes = match std::fs::read(&self.config_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.config_path.display(), "config file not found");
                return Ok(None);
            }
            Err(e) => return Err(RegistryError::io(&self.config_path, e)),
        };

        let document =
            serde_json::from_slice(&bytes).map_err(|source| RegistryError::Parse {
                path: self.config_path.clone(),
                source,
            })?;
        debug!(path = %self.config_path.display(), "loaded config");
        Ok(Some(document))
    }

    /// Load the document, falling back to an empty one on first run.
    pub fn load_or_default(&self) -> Result<ConfigDocument> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Copy the current file into the backup directory.
    ///
    /// Returns `Ok(None)` without touching the filesystem when there is no
    /// file to back up.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        self.backup_at(Local::now())
    }

    /// Like [`backup`](Self::backup) with an explicit timestamp.
    pub fn backup_at(&self, now: DateTime<Local>) -> Result<Option<PathBuf>> {
        if !self.config_path.is_file() {
            debug!(path = %self.config_path.display(), "nothing to back up");
            return Ok(None);
        }

        std::fs::create_dir_all(&self.backup_dir)
            .map_err(|e| RegistryError::io(&self.backup_dir, e))?;

        let stamp = now.format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let target = self.free_backup_path(&stamp);
        std::fs::copy(&self.config_path, &target).map_err(|e| RegistryError::io(&target, e))?;

        info!(backup = %target.display(), "backed up config");
        Ok(Some(target))
    }

    /// Existing backups of this config, oldest first.
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RegistryError::io(&self.backup_dir, e)),
        };

        let prefix = format!("{}_", self.stem());
        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RegistryError::io(&self.backup_dir, e))?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let stamp = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"));
            if stamp.is_some_and(is_backup_stamp) {
                backups.push(entry.path());
            }
        }
        backups.sort();
        Ok(backups)
    }

    /// Insert or replace a server entry.
    ///
    /// The previous file is backed up before anything is written. A crash
    /// between backup and write leaves the backup as the recovery point.
    pub fn upsert(&self, name: &str, entry: ServerEntry) -> Result<UpsertReport> {
        let mut document = self.load_or_default()?;
        let backup = self.backup()?;

        let replaced = document.upsert(name, entry).is_some();
        self.write(&document)?;

        info!(server = name, replaced, "upserted server entry");
        Ok(UpsertReport {
            document,
            backup,
            replaced,
        })
    }

    /// Remove a server entry. Returns `false`, without backup or write, when
    /// the entry (or the whole file) does not exist.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let Some(mut document) = self.load()? else {
            return Ok(false);
        };
        if !document.mcp_servers.contains_key(name) {
            return Ok(false);
        }

        self.backup()?;
        document.mcp_servers.remove(name);
        self.write(&document)?;

        info!(server = name, "removed server entry");
        Ok(true)
    }

    /// Validate every entry, resolving commands on the search path.
    pub fn validate(&self) -> Result<ValidationReport> {
        self.validate_with(&PathResolver)
    }

    pub fn validate_with(&self, resolver: &dyn CommandResolver) -> Result<ValidationReport> {
        let document = self.load_or_default()?;
        Ok(validate_document(&document, resolver))
    }

    fn write(&self, document: &ConfigDocument) -> Result<()> {
        let content = document.to_pretty_json().map_err(RegistryError::Serialize)?;
        write_atomic(&self.config_path, content.as_bytes())
            .map_err(|e| RegistryError::io(&self.config_path, e))?;
        debug!(path = %self.config_path.display(), "wrote config");
        Ok(())
    }

    fn stem(&self) -> String {
        self.config_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string())
    }

    fn free_backup_path(&self, stamp: &str) -> PathBuf {
        let stem = self.stem();
        let mut candidate = self.backup_dir.join(format!("{stem}_{stamp}.json"));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self
                .backup_dir
                .join(format!("{stem}_{stamp}_{counter:03}.json"));
            counter += 1;
        }
        candidate
    }
}

/// Whether a file name fragment is a backup stamp, e.g. `20261016_090503`
/// or `20261016_090503_002`.
fn is_backup_stamp(stamp: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\d{8}_\d{6}(_\d+)?$").expect("valid backup stamp regex"))
        .is_match(stamp)
}
