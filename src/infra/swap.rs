//! Swap infrastructure — swap-file lifecycle through host commands.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, SwapControl};
use crate::infra::command_runner::TokioCommandRunner;

/// Routes swap operations through the standard host tools (`swapon`,
/// `fallocate`, `mkswap`).
pub struct SwapManager<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> SwapManager<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl SwapManager<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> SwapControl for SwapManager<R> {
    async fn any_active(&self) -> Result<bool> {
        let out = self
            .runner
            .run("swapon", &["--show", "--noheadings"])
            .await
            .context("running swapon --show")?;
        Ok(out.status.success() && !String::from_utf8_lossy(&out.stdout).trim().is_empty())
    }

    async fn allocate(&self, path: &Path, size_mib: u64) -> Result<()> {
        let len = format!("{size_mib}M");
        let path_arg = path.display().to_string();
        let out = self
            .runner
            .run("fallocate", &["-l", &len, &path_arg])
            .await
            .context("running fallocate")?;
        anyhow::ensure!(
            out.status.success(),
            "fallocate {len} {path_arg} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        Ok(())
    }

    async fn format(&self, path: &Path) -> Result<()> {
        let path_arg = path.display().to_string();
        let out = self
            .runner
            .run("mkswap", &[path_arg.as_str()])
            .await
            .context("running mkswap")?;
        anyhow::ensure!(
            out.status.success(),
            "mkswap {path_arg} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        Ok(())
    }

    async fn enable(&self, path: &Path) -> Result<()> {
        let path_arg = path.display().to_string();
        let out = self
            .runner
            .run("swapon", &[path_arg.as_str()])
            .await
            .context("running swapon")?;
        anyhow::ensure!(
            out.status.success(),
            "swapon {path_arg} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        Ok(())
    }
}
