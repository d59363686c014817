//! Application service — the ordered provisioning run.
//!
//! One forward-only pass: runtime, tooling, coordination service, broker,
//! swap, launch, readiness, diagnostics. Imports only from `crate::domain`
//! and `crate::application::ports`; all host access is routed through
//! injected port traits so the whole run can be exercised against fakes.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::application::ports::{
    ArchiveStore, CommandRunner, HostFs, LaunchSpec, NetworkProbe, PackageManager, ProcessTable,
    ProgressReporter, ServiceLauncher, SwapControl,
};
use crate::application::services::diagnostics::collect_diagnostics;
use crate::application::services::readiness::{Readiness, await_ready};
use crate::domain::artifacts;
use crate::domain::config::{InstallTarget, StackConfig};
use crate::domain::error::ProvisionError;
use crate::domain::health::DiagnosticsReport;

/// System mount table the swap entry is persisted to.
const FSTAB: &str = "/etc/fstab";

/// Options for a provisioning run.
pub struct ProvisionOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    pub started_at: DateTime<Utc>,
}

/// What a completed run did. The booleans record the data-dependent skips;
/// everything else always happens.
#[derive(Debug)]
pub struct ProvisionSummary {
    pub started_at: DateTime<Utc>,
    /// Whether step 4 actually invoked the coordination start script.
    pub coordination_started: bool,
    /// Broker PIDs terminated by the reconciliation step, in kill order.
    pub broker_pids_terminated: Vec<i32>,
    /// Whether the swap file was created this run.
    pub swap_file_created: bool,
    pub diagnostics: DiagnosticsReport,
}

/// Run the full provisioning sequence against one host.
///
/// Steps are strictly sequential and individually idempotent; the only
/// branch points are the two process probes and the swap checks. Config
/// files are written before the owning service starts, and every probe is
/// taken immediately before the action it gates.
///
/// # Errors
///
/// Aborts on a runtime install failure (nothing downstream can run), on
/// filesystem/archive errors, and on the step-11 readiness timeout. Probe
/// and start-script failures are advisory and only produce warnings.
#[allow(clippy::too_many_arguments)] // one parameter per injected capability
pub async fn provision_stack(
    packages: &impl PackageManager,
    archives: &impl ArchiveStore,
    fs: &impl HostFs,
    processes: &impl ProcessTable,
    launcher: &impl ServiceLauncher,
    network: &impl NetworkProbe,
    swap: &impl SwapControl,
    runner: &impl CommandRunner,
    cfg: &StackConfig,
    opts: ProvisionOptions<'_, impl ProgressReporter>,
) -> Result<ProvisionSummary> {
    let reporter = opts.reporter;

    // Step 1: Java runtime. The one unrecoverable install.
    reporter.step(&format!("installing runtime ({})...", cfg.packages.runtime));
    packages
        .update_index()
        .await
        .map_err(|e| ProvisionError::RuntimeInstall(format!("{e:#}")))?;
    packages
        .ensure_installed(&cfg.packages.runtime)
        .await
        .map_err(|e| ProvisionError::RuntimeInstall(format!("{e:#}")))?;

    // Step 2: port-listing utility for the diagnostics pass. Advisory.
    if let Err(e) = packages.ensure_installed(&cfg.packages.diagnostics).await {
        reporter.warn(&format!(
            "could not install {}: {e:#}",
            cfg.packages.diagnostics
        ));
    }

    // Step 3: coordination service files. Config is on disk before any start.
    reporter.step(&format!(
        "provisioning {} {}...",
        cfg.coordination.release.name, cfg.coordination.release.version
    ));
    install_release(archives, fs, &cfg.coordination.release).await?;
    fs.create_dir_all(&cfg.coordination.data_dir)?;
    let coord_conf = cfg.coordination.config_path();
    if let Some(dir) = coord_conf.parent() {
        fs.create_dir_all(dir)?;
    }
    fs.write(&coord_conf, &artifacts::coordination_config(&cfg.coordination))?;

    // Step 4: start the coordination service only when absent.
    let coordination_started = start_coordination_if_absent(processes, launcher, reporter, cfg)
        .await;

    // Step 5: broker files.
    reporter.step(&format!(
        "provisioning {} {}...",
        cfg.broker.release.name, cfg.broker.release.version
    ));
    install_release(archives, fs, &cfg.broker.release).await?;
    fs.create_dir_all(&cfg.broker.log_dir)?;
    fs.set_mode(&cfg.broker.log_dir, 0o755)?;
    let broker_conf = cfg.broker.config_path();
    fs.write(
        &broker_conf,
        &artifacts::broker_properties(&cfg.host, cfg.coordination.client_port, &cfg.broker),
    )?;

    // Step 6: clear any running broker so the freshly written properties are
    // the ones in effect. Always-restart, by design.
    let broker_probe = processes
        .probe(&cfg.broker.process_pattern)
        .await
        .unwrap_or_default();
    let mut broker_pids_terminated = Vec::new();
    for pid in &broker_probe.pids {
        reporter.step(&format!("stopping broker pid {pid}..."));
        processes
            .terminate(*pid)
            .await
            .with_context(|| format!("terminating broker pid {pid}"))?;
        broker_pids_terminated.push(*pid);
    }

    // Step 7: broker log directory ownership and mode.
    fix_log_dir_permissions(fs, runner, cfg).await?;

    // Step 8: swap. Each check stands alone so a partially completed earlier
    // run converges here.
    let swap_file_created = ensure_swap(fs, swap, reporter, cfg).await?;

    // Steps 9 and 10: launch the broker detached, heap bounds in its
    // environment. Spawn failure is not fatal here — a dead broker surfaces
    // as a step-11 timeout.
    reporter.step(&format!(
        "starting broker on port {}...",
        cfg.broker.listener_port
    ));
    let (heap_key, heap_value) = artifacts::heap_env(&cfg.broker.heap);
    let spec = LaunchSpec {
        program: cfg.broker.start_script_path(),
        args: vec![broker_conf.display().to_string()],
        envs: vec![(heap_key, heap_value)],
    };
    if let Err(e) = launcher.launch(&spec) {
        reporter.warn(&format!("broker start invocation failed: {e:#}"));
    }

    // Step 11: bounded readiness poll — the one downstream failure that
    // fails the run.
    reporter.step(&format!(
        "waiting for {}:{} (up to {}s)...",
        cfg.host,
        cfg.broker.listener_port,
        cfg.readiness.initial_delay_secs + cfg.readiness.timeout_secs
    ));
    let readiness = await_ready(
        network,
        &cfg.host,
        cfg.broker.listener_port,
        cfg.readiness.initial_delay(),
        cfg.readiness.timeout(),
        cfg.readiness.poll_interval(),
    )
    .await;
    if readiness == Readiness::TimedOut {
        return Err(ProvisionError::ReadinessTimeout {
            port: cfg.broker.listener_port,
            waited_secs: cfg.readiness.initial_delay_secs + cfg.readiness.timeout_secs,
        }
        .into());
    }
    reporter.success("broker is accepting connections");

    // Step 12: observational diagnostics for the operator.
    let diagnostics = collect_diagnostics(fs, processes, runner, cfg).await;

    Ok(ProvisionSummary {
        started_at: opts.started_at,
        coordination_started,
        broker_pids_terminated,
        swap_file_created,
        diagnostics,
    })
}

/// Fetch and unpack a release archive unless its unpacked tree already
/// exists. Directory creation tolerates existing targets.
async fn install_release(
    archives: &impl ArchiveStore,
    fs: &impl HostFs,
    target: &InstallTarget,
) -> Result<()> {
    fs.create_dir_all(&target.install_dir)?;
    if fs.exists(&target.home()) {
        return Ok(());
    }
    archives
        .fetch_unpack(target)
        .await
        .with_context(|| format!("installing {} {}", target.name, target.version))
}

/// Fresh probe, then start the coordination service when no instance is
/// running. Probe and launch failures are both advisory.
async fn start_coordination_if_absent(
    processes: &impl ProcessTable,
    launcher: &impl ServiceLauncher,
    reporter: &impl ProgressReporter,
    cfg: &StackConfig,
) -> bool {
    let probe = processes
        .probe(&cfg.coordination.process_pattern)
        .await
        .unwrap_or_default();
    if probe.found {
        return false;
    }

    reporter.step(&format!("starting {}...", cfg.coordination.release.name));
    let spec = LaunchSpec {
        program: cfg.coordination.start_script_path(),
        args: vec![
            "start".to_string(),
            cfg.coordination.config_path().display().to_string(),
        ],
        envs: Vec::new(),
    };
    match launcher.launch(&spec) {
        Ok(()) => true,
        Err(e) => {
            reporter.warn(&format!(
                "{} start invocation failed: {e:#}",
                cfg.coordination.release.name
            ));
            false
        }
    }
}

/// Owner/group via `chown` through the command runner, mode via the
/// filesystem port.
async fn fix_log_dir_permissions(
    fs: &impl HostFs,
    runner: &impl CommandRunner,
    cfg: &StackConfig,
) -> Result<()> {
    let owner = format!("{}:{}", cfg.broker.log_dir_owner, cfg.broker.log_dir_group);
    let log_dir = cfg.broker.log_dir.display().to_string();
    let out = runner
        .run("chown", &["-R", &owner, &log_dir])
        .await
        .context("running chown on broker log dir")?;
    anyhow::ensure!(
        out.status.success(),
        "chown {owner} {log_dir} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    fs.set_mode(&cfg.broker.log_dir, 0o755)
}

/// Self-healing swap step: file existence, swap-active state, and the
/// mount-table entry are checked independently.
async fn ensure_swap(
    fs: &impl HostFs,
    swap: &impl SwapControl,
    reporter: &impl ProgressReporter,
    cfg: &StackConfig,
) -> Result<bool> {
    let mut created = false;
    if !fs.exists(&cfg.swap.file) {
        reporter.step(&format!(
            "allocating {} MiB swap file...",
            cfg.swap.size_mib
        ));
        swap.allocate(&cfg.swap.file, cfg.swap.size_mib).await?;
        fs.set_mode(&cfg.swap.file, 0o600)?;
        swap.format(&cfg.swap.file).await?;
        created = true;
    }

    if !swap.any_active().await? {
        swap.enable(&cfg.swap.file).await?;
    }

    let entry = artifacts::fstab_entry(&cfg.swap.file);
    let fstab = fs.read_to_string(Path::new(FSTAB)).unwrap_or_default();
    if !fstab.lines().any(|l| l.trim() == entry) {
        fs.append_line(Path::new(FSTAB), &entry)?;
    }
    Ok(created)
}
