//! Package infrastructure — apt-backed `PackageManager`.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, PackageManager};
use crate::infra::command_runner::TokioCommandRunner;

/// Package operations may pull from the network; give them a long leash.
const APT_TIMEOUT: Duration = Duration::from_secs(600);

/// Routes package operations through `apt-get`. Generic over the runner so
/// tests can inject canned results.
pub struct AptPackageManager<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> AptPackageManager<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl AptPackageManager<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> PackageManager for AptPackageManager<R> {
    async fn update_index(&self) -> Result<()> {
        let out = self
            .runner
            .run_with_timeout("apt-get", &["update", "-q"], APT_TIMEOUT)
            .await
            .context("running apt-get update")?;
        anyhow::ensure!(
            out.status.success(),
            "apt-get update failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        Ok(())
    }

    async fn ensure_installed(&self, package: &str) -> Result<()> {
        let out = self
            .runner
            .run_with_timeout("apt-get", &["install", "-y", "-q", package], APT_TIMEOUT)
            .await
            .with_context(|| format!("running apt-get install {package}"))?;
        anyhow::ensure!(
            out.status.success(),
            "apt-get install {package} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        Ok(())
    }
}
