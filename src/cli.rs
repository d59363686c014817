//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Provision a coordination service + message broker stack on a single host
#[derive(Parser)]
#[command(
    name = "streamrig",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Config file path (default: ~/.streamrig/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full provisioning sequence
    Up,

    /// Show coordination/broker process state and the listener port
    Status,

    /// Collect broker diagnostics (log tail, socket table, process table)
    Diagnose,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            config,
            command,
        } = self;

        // `version` must work even with a broken config file, so it runs
        // before the context (and with it the config) is loaded.
        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
            command => {
                let app = AppContext::new(&AppFlags {
                    no_color,
                    quiet,
                    json,
                    yes,
                    config,
                })?;
                match command {
                    Command::Up => commands::up::run(&app).await,
                    Command::Status => commands::status::run(&app).await,
                    Command::Diagnose => commands::diagnose::run(&app).await,
                    Command::Config(cmd) => commands::config::run(&app, &cmd),
                    Command::Version => Ok(()),
                }
            }
        }
    }
}
