//! Process infrastructure — `ps`-backed probes, forced termination, and
//! detached service launches.

use std::process::Stdio;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, LaunchSpec, ProcessTable, ServiceLauncher};
use crate::domain::process::{self, ProcessProbe};
use crate::infra::command_runner::TokioCommandRunner;

/// Reads the process table via `ps -eo pid,args` and parses it into typed
/// probes. Generic over the runner so tests can feed canned tables.
pub struct PsProcessTable<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> PsProcessTable<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl PsProcessTable<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> ProcessTable for PsProcessTable<R> {
    async fn probe(&self, pattern: &str) -> Result<ProcessProbe> {
        let out = self
            .runner
            .run("ps", &["-eo", "pid,args"])
            .await
            .context("running ps")?;
        anyhow::ensure!(
            out.status.success(),
            "ps failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        Ok(process::parse_process_table(
            &String::from_utf8_lossy(&out.stdout),
            pattern,
        ))
    }

    async fn terminate(&self, pid: i32) -> Result<()> {
        let pid_arg = pid.to_string();
        let out = self
            .runner
            .run("kill", &["-9", &pid_arg])
            .await
            .with_context(|| format!("running kill -9 {pid}"))?;
        anyhow::ensure!(
            out.status.success(),
            "kill -9 {pid} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        Ok(())
    }
}

/// Spawns service start scripts detached. The child is deliberately not
/// killed on drop — it must outlive this process; readiness is confirmed by
/// the bounded poll, not here.
pub struct TokioServiceLauncher;

impl ServiceLauncher for TokioServiceLauncher {
    fn launch(&self, spec: &LaunchSpec) -> Result<()> {
        let mut cmd = tokio::process::Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn {}", spec.program.display()))?;
        drop(child);
        Ok(())
    }
}
