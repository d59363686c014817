//! `streamrig config` — show the effective configuration.

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as YAML
    Show,
    /// Print the config file location
    Path,
}

/// Run `streamrig config <subcommand>`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized or the
/// default path cannot be determined.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let yaml =
                serde_yaml::to_string(&app.config).context("serializing configuration")?;
            print!("{yaml}");
            Ok(())
        }
        ConfigCommand::Path => {
            let path = crate::infra::config::default_config_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
