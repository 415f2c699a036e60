//! mcpdesk - MCP server installer for the desktop client
//!
//! Usage:
//!   mcpdesk list                 # Known servers
//!   mcpdesk install <server> ... # Install and configure a server
//!   mcpdesk status               # Configured servers
//!   mcpdesk validate             # Check configured servers
//!   mcpdesk backup               # Back up the config file

mod interactive;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpdesk_core::catalog::{CATALOG, ParamKind};
use mcpdesk_core::commands::{
    InstallCommand, InstallOptions, InstallReport, StatusCommand, StatusReport,
};
use mcpdesk_core::config::Settings;
use mcpdesk_core::registry::ConfigRegistry;
use mcpdesk_core::validate::{Severity, ValidationReport};

use crate::interactive::{InteractiveFlow, PrefilledOptions};

#[derive(Parser)]
#[command(name = "mcpdesk", version)]
#[command(about = "Install and validate MCP servers for the desktop client", long_about = None)]
struct Cli {
    /// Desktop client config file (overrides settings.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backup directory (defaults to a `backups` directory next to the config)
    #[arg(long, global = true, value_name = "PATH")]
    backup_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install an MCP server and add it to the client config
    Install(Box<InstallArgs>),

    /// List known MCP servers
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show configured MCP servers
    Status {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Check configured servers for missing commands and placeholder secrets
    Validate {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Back up the client config file
    Backup,

    /// Remove a server from the client config
    #[command(alias = "rm")]
    Remove {
        /// Server name
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Args)]
struct InstallArgs {
    /// Server to install (see `mcpdesk list`)
    ///
    /// Required unless --interactive is used
    name: Option<String>,
    /// Server parameter (KEY=VALUE), e.g. path=/home/me/Documents or BRAVE_API_KEY=...
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,
    /// Fill missing secrets with `your-*-here` placeholders
    #[arg(long)]
    placeholders: bool,
    /// Only update the config, do not run npm
    #[arg(long)]
    skip_package: bool,
    /// Interactive mode - prompts for missing parameters
    #[arg(short, long)]
    interactive: bool,
    /// Skip all confirmation prompts
    #[arg(short = 'y', long)]
    yes: bool,
    /// Output format
    #[arg(short = 'o', long, default_value = "table")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcpdesk=warn,mcpdesk_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() { 1 } else { 0 };
            std::process::exit(code);
        }
    };

    let mut settings = Settings::load_default()?;
    if let Some(config) = cli.config {
        settings.config_path = Some(config);
    }
    if let Some(backup_dir) = cli.backup_dir {
        settings.backup_dir = Some(backup_dir);
    }
    tracing::debug!(config = ?settings.config_path, backup_dir = ?settings.backup_dir, "resolved settings");

    run_cli(cli.command, &settings)
}

fn run_cli(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Install(args) => run_install(*args, settings)?,
        Commands::List { format } => run_list(format)?,
        Commands::Status { format } => run_status(format, settings)?,
        Commands::Validate { format } => run_validate(format, settings)?,
        Commands::Backup => run_backup(settings)?,
        Commands::Remove { name } => run_remove(&name, settings)?,
    }
    Ok(())
}

fn run_install(args: InstallArgs, settings: &Settings) -> Result<()> {
    let mut options = match &args.name {
        Some(name) => InstallOptions::new(name),
        None if args.interactive => InstallOptions::new(""),
        None => anyhow::bail!("Missing required argument: server name (see 'mcpdesk list')"),
    };
    for pair in &args.params {
        options = options.with_param_pair(pair)?;
    }
    options = options
        .with_placeholders(args.placeholders)
        .with_skip_package(args.skip_package);

    if args.interactive {
        let prefilled = PrefilledOptions {
            name: args.name.clone(),
            params: options.params.clone(),
            yes: args.yes,
        };
        let result = InteractiveFlow::new(prefilled).collect()?;
        if !result.confirmed {
            println!("Installation cancelled.");
            return Ok(());
        }
        options.name = result.name;
        options.params = result.params;
    }

    let cmd = InstallCommand::from_settings(settings)?;
    let report = cmd.execute(&options)?;
    print_install_result(&report, args.format)
}

fn print_install_result(report: &InstallReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if report.package_installed {
                println!("✓ Installed {}", report.package);
            }
            if report.replaced {
                println!("✓ Updated '{}' in {}", report.name, report.config_path.display());
            } else {
                println!("✓ Added '{}' to {}", report.name, report.config_path.display());
            }
            if let Some(backup) = &report.backup {
                println!("  Backup: {}", backup.display());
            }
            for warning in &report.warnings {
                println!("  ⚠ {}", warning);
            }
            println!("  Restart the desktop client to load the new server.");
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": report.name,
                "package": report.package,
                "package_installed": report.package_installed,
                "replaced": report.replaced,
                "backup": report.backup,
                "config_path": report.config_path,
                "warnings": report.warnings,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn run_list(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{:<22} {:<50} Parameters", "Name", "Install command");
            println!("{}", "-".repeat(90));
            for entry in CATALOG {
                let params = entry
                    .params
                    .iter()
                    .map(|p| p.key)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "{:<22} {:<50} {}",
                    entry.id,
                    entry.install_command(),
                    if params.is_empty() { "-" } else { params.as_str() }
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = CATALOG
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "name": entry.id,
                        "description": entry.description,
                        "package": entry.package,
                        "install_command": entry.install_command(),
                        "params": entry.params.iter().map(|p| serde_json::json!({
                            "key": p.key,
                            "kind": match p.kind {
                                ParamKind::Arg => "arg",
                                ParamKind::Env => "env",
                            },
                            "secret": p.secret,
                        })).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn run_status(format: OutputFormat, settings: &Settings) -> Result<()> {
    let registry = ConfigRegistry::from_settings(settings)?;
    let report = StatusCommand::new(registry).execute()?;

    match format {
        OutputFormat::Table => print_status_table(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn print_status_table(report: &StatusReport) {
    println!("Config: {}", report.config_path.display());
    if !report.configured {
        println!();
        println!("No config file yet.");
        println!("Install a server with: mcpdesk install <server>");
        return;
    }

    println!();
    if report.servers.is_empty() {
        println!("No MCP servers configured.");
    } else {
        println!("MCP Servers ({}):", report.servers.len());
        println!("  {:<22} {:<10} {:<40} Env", "Name", "Command", "Args");
        println!("  {}", "-".repeat(84));
        for server in &report.servers {
            let status = if report
                .validation
                .for_server(&server.name)
                .any(|f| f.severity == Severity::Error)
            {
                "✗"
            } else if report.validation.for_server(&server.name).next().is_some() {
                "⚠"
            } else {
                "✓"
            };
            println!(
                "{} {:<22} {:<10} {:<40} {}",
                status,
                server.name,
                server.command,
                truncate(&server.args.join(" "), 40),
                server.env_keys.join(", ")
            );
        }
    }

    println!();
    match &report.latest_backup {
        Some(latest) => println!(
            "Backups: {} (latest: {})",
            report.backup_count,
            latest.display()
        ),
        None => println!("Backups: none"),
    }
    print_validation_summary(&report.validation);
}

fn run_validate(format: OutputFormat, settings: &Settings) -> Result<()> {
    let registry = ConfigRegistry::from_settings(settings)?;
    let report = registry.validate()?;

    match format {
        OutputFormat::Table => {
            println!("Config: {}", registry.config_path().display());
            for finding in &report.findings {
                let marker = match finding.severity {
                    Severity::Error => "✗ error",
                    Severity::Warning => "⚠ warning",
                };
                println!("  {} [{}] {}", marker, finding.server, finding.detail);
            }
            print_validation_summary(&report);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn print_validation_summary(report: &ValidationReport) {
    let warnings = report.warnings().count();
    println!(
        "Summary: {} entries, {} valid, {} warnings",
        report.total, report.valid, warnings
    );
}

fn run_backup(settings: &Settings) -> Result<()> {
    let registry = ConfigRegistry::from_settings(settings)?;
    match registry.backup()? {
        Some(path) => println!("✓ Backed up to {}", path.display()),
        None => println!(
            "• Nothing to back up: {} does not exist",
            registry.config_path().display()
        ),
    }
    Ok(())
}

fn run_remove(name: &str, settings: &Settings) -> Result<()> {
    let registry = ConfigRegistry::from_settings(settings)?;
    if !registry.remove(name)? {
        anyhow::bail!("Server '{}' is not configured", name);
    }
    println!("✓ Removed '{}' from {}", name, registry.config_path().display());
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_install_requires_name_or_interactive() {
        let cli = Cli::try_parse_from(["mcpdesk", "install"]).unwrap();
        let Commands::Install(args) = cli.command else {
            panic!("expected install");
        };
        let err = run_install(*args, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("Missing required argument"));
    }

    #[test]
    fn test_unknown_subcommand_is_error() {
        assert!(Cli::try_parse_from(["mcpdesk", "restore"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["mcpdesk", "status", "--config", "/tmp/c.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
    }

    #[test]
    fn test_install_params() {
        let cli = Cli::try_parse_from([
            "mcpdesk",
            "install",
            "filesystem",
            "-p",
            "path=/tmp",
            "--skip-package",
        ])
        .unwrap();
        let Commands::Install(args) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(args.name.as_deref(), Some("filesystem"));
        assert_eq!(args.params, vec!["path=/tmp".to_string()]);
        assert!(args.skip_package);
    }
}
