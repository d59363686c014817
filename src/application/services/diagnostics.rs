//! Application service — diagnostics and status snapshots.
//!
//! Everything here is observational: probes that fail are reported as
//! "nothing found" rather than failing the command.

use anyhow::Result;

use crate::application::ports::{CommandRunner, HostFs, NetworkProbe, ProcessTable};
use crate::domain::config::StackConfig;
use crate::domain::health::{self, DiagnosticsReport, StackStatus};

/// How much of the broker server log the diagnostics pass surfaces.
pub const LOG_TAIL_LINES: usize = 50;

/// Collect the post-run diagnostics: broker log tail, listening-socket
/// check, process-table snapshot.
pub async fn collect_diagnostics(
    fs: &impl HostFs,
    processes: &impl ProcessTable,
    runner: &impl CommandRunner,
    cfg: &StackConfig,
) -> DiagnosticsReport {
    let log_tail = fs
        .read_to_string(&cfg.broker.server_log_path())
        .map(|contents| health::tail_lines(&contents, LOG_TAIL_LINES))
        .unwrap_or_default();

    let port_bound = listener_bound(runner, cfg.broker.listener_port).await;

    let broker = processes
        .probe(&cfg.broker.process_pattern)
        .await
        .unwrap_or_default();

    DiagnosticsReport {
        log_tail,
        port_bound,
        listener_port: cfg.broker.listener_port,
        broker,
    }
}

/// Snapshot both services and the broker listener for `status`.
pub async fn stack_status(
    processes: &impl ProcessTable,
    network: &impl NetworkProbe,
    cfg: &StackConfig,
) -> Result<StackStatus> {
    let coordination = processes
        .probe(&cfg.coordination.process_pattern)
        .await
        .unwrap_or_default();
    let broker = processes
        .probe(&cfg.broker.process_pattern)
        .await
        .unwrap_or_default();
    let port_reachable = network
        .check_tcp_connectivity(&cfg.host, cfg.broker.listener_port)
        .await
        .unwrap_or(false);

    Ok(StackStatus {
        coordination,
        broker,
        port_reachable,
        listener_port: cfg.broker.listener_port,
    })
}

/// Whether the host's listening-socket table shows the port. Relies on the
/// port-listing utility installed in step 2 of the provisioning run.
async fn listener_bound(runner: &impl CommandRunner, port: u16) -> bool {
    match runner.run("netstat", &["-tln"]).await {
        Ok(out) if out.status.success() => {
            health::port_listening(&String::from_utf8_lossy(&out.stdout), port)
        }
        _ => false,
    }
}
