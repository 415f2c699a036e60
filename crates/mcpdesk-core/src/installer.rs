//! Package installation capability.

use std::process::Command;

use thiserror::Error;
use tracing::info;

use crate::config::settings::DEFAULT_NPM;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("'{0}' was not found on PATH. Install Node.js first")]
    NotAvailable(String),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Installing {package} failed ({status}): {stderr}")]
    Failed {
        package: String,
        status: String,
        stderr: String,
    },
}

/// Installs a server package so its command is available to the client.
pub trait Installer {
    fn install(&self, package: &str) -> Result<(), InstallError>;
}

/// Global installs through `npm install -g`.
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    program: String,
}

impl Default for NpmInstaller {
    fn default() -> Self {
        Self::new(DEFAULT_NPM)
    }
}

impl NpmInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Installer for NpmInstaller {
    fn install(&self, package: &str) -> Result<(), InstallError> {
        let program = which::which(&self.program)
            .map_err(|_| InstallError::NotAvailable(self.program.clone()))?;

        info!(package, program = %program.display(), "installing package");
        let output = Command::new(&program)
            .args(["install", "-g", package])
            .output()
            .map_err(|source| InstallError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InstallError::Failed {
                package: package.to_string(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}
