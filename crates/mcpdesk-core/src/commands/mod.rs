//! High-level commands for mcpdesk operations.
//!
//! These are the entry points frontends call; they wire the catalog, the
//! installer and the config registry together.

pub mod install;
pub mod status;

pub use install::{InstallCommand, InstallOptions, InstallReport};
pub use status::{ServerStatus, StatusCommand, StatusReport};
