//! Port trait definitions for the application layer.
//!
//! Ports are the host capabilities the provisioner consumes — package
//! manager, filesystem, process table, service launches, network, swap.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`. Production implementations live in
//! `crate::infra`; tests inject in-memory fakes.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::config::InstallTarget;
use crate::domain::process::ProcessProbe;

// ── Value types ───────────────────────────────────────────────────────────────

/// Launch parameters for a detached service process. The provisioner owns the
/// full command line and environment; no shipped file is mutated to configure
/// a launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

// ── Command runner port ───────────────────────────────────────────────────────

/// Generic command execution with timeout and guaranteed process kill.
/// The production implementation uses tokio; test doubles return canned
/// results without spawning processes.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a command with the default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a command with a custom timeout (overrides default).
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds
    /// `timeout`. On timeout, the child must be killed, not left orphaned.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Package manager port ──────────────────────────────────────────────────────

/// Host package installation. Installing an already-present package is a
/// no-op.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    /// Refresh the host package index.
    async fn update_index(&self) -> Result<()>;

    /// Ensure a package is installed.
    async fn ensure_installed(&self, package: &str) -> Result<()>;
}

// ── Host filesystem port ──────────────────────────────────────────────────────

/// Local filesystem operations the provisioner performs. All writes are
/// idempotent overwrites except `append_line`.
pub trait HostFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn append_line(&self, path: &Path, line: &str) -> Result<()>;
    fn set_mode(&self, path: &Path, mode: u32) -> Result<()>;
}

// ── Process table port ────────────────────────────────────────────────────────

/// Typed process queries and termination. Probe results go stale as soon as
/// the table changes; take them immediately before any action they gate.
#[allow(async_fn_in_trait)]
pub trait ProcessTable {
    /// Probe for processes whose command line contains `pattern`.
    async fn probe(&self, pattern: &str) -> Result<ProcessProbe>;

    /// Forcibly terminate one process.
    async fn terminate(&self, pid: i32) -> Result<()>;
}

// ── Service launcher port ─────────────────────────────────────────────────────

/// Detached (non-blocking) service startup. `launch` returns once the child
/// is spawned; readiness is confirmed separately by the bounded poll.
pub trait ServiceLauncher {
    /// Spawn the service and let it outlive this process.
    ///
    /// # Errors
    ///
    /// Returns an error if the process fails to spawn.
    fn launch(&self, spec: &LaunchSpec) -> Result<()>;
}

// ── Network probe port ────────────────────────────────────────────────────────

/// Network connectivity checks, injectable so readiness polling can be
/// tested without real sockets.
#[allow(async_fn_in_trait)]
pub trait NetworkProbe {
    /// Check TCP connectivity to the given host and port.
    async fn check_tcp_connectivity(&self, host: &str, port: u16) -> Result<bool>;
}

// ── Archive store port ────────────────────────────────────────────────────────

/// Release-archive acquisition: staged download, digest check when the
/// target carries one, unpack under the install directory.
#[allow(async_fn_in_trait)]
pub trait ArchiveStore {
    async fn fetch_unpack(&self, target: &InstallTarget) -> Result<()>;
}

// ── Swap control port ─────────────────────────────────────────────────────────

/// Swap-file lifecycle. Each operation stands alone so the provision step
/// can re-check state between them and converge after a partial run.
#[allow(async_fn_in_trait)]
pub trait SwapControl {
    /// Whether any swap is currently active on the host.
    async fn any_active(&self) -> Result<bool>;

    /// Allocate the swap file at its fixed size.
    async fn allocate(&self, path: &Path, size_mib: u64) -> Result<()>;

    /// Format the file as swap.
    async fn format(&self, path: &Path) -> Result<()>;

    /// Activate the swap file.
    async fn enable(&self, path: &Path) -> Result<()>;
}

// ── Progress reporting port ───────────────────────────────────────────────────

/// Progress events emitted by services without depending on the
/// presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
