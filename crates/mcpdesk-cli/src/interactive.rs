//! Interactive flow for the install command.
//!
//! Collects missing install parameters when `-i` is passed. Uses dialoguer
//! for terminal prompts; the core only ever sees the resulting
//! [`InstallParams`].

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};

use mcpdesk_core::catalog::{CATALOG, CatalogEntry, InstallParams, ParamKind};

/// Pre-filled values from CLI args that skip prompts.
#[derive(Debug, Clone, Default)]
pub struct PrefilledOptions {
    /// Server identifier - if Some, skip server selection
    pub name: Option<String>,
    /// Parameter values given with --param
    pub params: InstallParams,
    /// Skip all confirmations
    pub yes: bool,
}

/// Result of interactive flow.
#[derive(Debug, Clone)]
pub struct InteractiveResult {
    pub name: String,
    pub params: InstallParams,
    /// Whether user confirmed the install
    pub confirmed: bool,
}

pub struct InteractiveFlow {
    prefilled: PrefilledOptions,
    theme: ColorfulTheme,
}

impl InteractiveFlow {
    pub fn new(prefilled: PrefilledOptions) -> Self {
        Self {
            prefilled,
            theme: ColorfulTheme::default(),
        }
    }

    /// Run the interactive flow.
    ///
    /// Flow:
    /// 1. Select a server if not provided
    /// 2. Prompt for each parameter not given on the command line
    /// 3. Show summary and confirm
    ///
    /// Secrets left empty fall back to a `your-*-here` placeholder, which
    /// `mcpdesk validate` reports until it is replaced.
    pub fn collect(&mut self) -> Result<InteractiveResult> {
        println!();
        println!("{}", style("Install an MCP server").bold().cyan());
        println!();

        let entry = self.prompt_server()?;
        let mut params = self.prefilled.params.clone();
        params.allow_placeholders = true;

        for param in entry.params {
            if params.get(param.key).is_some() {
                continue;
            }
            let value = if param.secret {
                Password::with_theme(&self.theme)
                    .with_prompt(format!("{} (leave empty to fill in later)", param.prompt))
                    .allow_empty_password(true)
                    .interact()?
            } else {
                Input::<String>::with_theme(&self.theme)
                    .with_prompt(param.prompt)
                    .interact_text()?
            };
            params.values.insert(param.key.to_string(), value);
        }

        self.print_summary(entry, &params);

        let confirmed = if self.prefilled.yes {
            true
        } else {
            Confirm::with_theme(&self.theme)
                .with_prompt("Proceed with installation?")
                .default(true)
                .interact()?
        };

        Ok(InteractiveResult {
            name: entry.id.to_string(),
            params,
            confirmed,
        })
    }

    fn prompt_server(&self) -> Result<&'static CatalogEntry> {
        if let Some(name) = &self.prefilled.name {
            return Ok(mcpdesk_core::catalog::lookup(name)?);
        }

        let items: Vec<String> = CATALOG
            .iter()
            .map(|entry| format!("{:<20} {}", entry.id, entry.description))
            .collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Select a server")
            .items(&items)
            .default(0)
            .interact()?;
        Ok(&CATALOG[selection])
    }

    fn print_summary(&self, entry: &CatalogEntry, params: &InstallParams) {
        println!();
        println!("{}", style("Summary").bold());
        println!("  Server:  {}", entry.id);
        println!("  Package: {}", entry.package);
        for param in entry.params {
            let shown = match params.get(param.key) {
                Some(_) if param.secret => style("(set)".to_string()).green(),
                Some(value) => style(value.to_string()).green(),
                None => style("(placeholder)".to_string()).yellow(),
            };
            let label = match param.kind {
                ParamKind::Arg => "arg",
                ParamKind::Env => "env",
            };
            println!("  {} {}: {}", label, param.key, shown);
        }
        println!();
    }
}
