//! Application context — unified state passed to every command handler.
//!
//! `AppContext` bundles the output context, the loaded configuration, and
//! the production port implementations so command handlers receive one
//! argument instead of a parameter list that grows with every capability.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::config::StackConfig;
use crate::infra::apt::AptPackageManager;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fetch::UreqArchiveStore;
use crate::infra::fs::LocalFs;
use crate::infra::network::TcpPortProbe;
use crate::infra::process::{PsProcessTable, TokioServiceLauncher};
use crate::infra::swap::SwapManager;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Skip interactive prompts (also set by `CI` / `STREAMRIG_YES` env vars).
    pub yes: bool,
    /// Explicit config file path.
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
    /// Effective stack configuration.
    pub config: StackConfig,
    pub packages: AptPackageManager<TokioCommandRunner>,
    pub archives: UreqArchiveStore,
    pub fs: LocalFs,
    pub processes: PsProcessTable<TokioCommandRunner>,
    pub launcher: TokioServiceLauncher,
    pub network: TcpPortProbe,
    pub swap: SwapManager<TokioCommandRunner>,
    pub runner: TokioCommandRunner,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or fails
    /// validation.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("STREAMRIG_YES").is_ok();
        let non_interactive = flags.yes || ci_env;

        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            mode,
            non_interactive,
            config: crate::infra::config::load_config(flags.config.as_deref())?,
            packages: AptPackageManager::default_runner(),
            archives: UreqArchiveStore,
            fs: LocalFs,
            processes: PsProcessTable::default_runner(),
            launcher: TokioServiceLauncher,
            network: TcpPortProbe,
            swap: SwapManager::default_runner(),
            runner: TokioCommandRunner::default(),
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns a progress reporter bound to this context's output.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or
    /// `STREAMRIG_YES` env), returns `default` immediately without
    /// prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
