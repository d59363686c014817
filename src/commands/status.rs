//! `streamrig status` — snapshot of both services and the broker listener.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::diagnostics;
use crate::domain::process::ProcessProbe;

/// Run `streamrig status`.
///
/// # Errors
///
/// Returns an error only if output serialization fails; unreachable probes
/// are reported as "not running".
pub async fn run(app: &AppContext) -> Result<()> {
    let status = diagnostics::stack_status(&app.processes, &app.network, &app.config).await?;

    if app.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&status).context("serializing status")?
        );
        return Ok(());
    }

    let ctx = &app.output;
    ctx.header("Stack status");
    ctx.kv("Coordination", &describe(&status.coordination));
    ctx.kv("Broker", &describe(&status.broker));
    ctx.kv(
        &format!("Port {}", status.listener_port),
        if status.port_reachable {
            "reachable"
        } else {
            "not reachable"
        },
    );
    Ok(())
}

fn describe(probe: &ProcessProbe) -> String {
    if probe.found {
        let pids = probe
            .pids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("running (pid {pids})")
    } else {
        "not running".to_string()
    }
}
