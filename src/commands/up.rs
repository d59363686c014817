//! `streamrig up` — run the full provisioning sequence.

use anyhow::Result;
use chrono::Utc;

use crate::app::AppContext;
use crate::application::ports::ProcessTable;
use crate::application::services::provision::{self, ProvisionOptions, ProvisionSummary};

/// Run `streamrig up`.
///
/// # Errors
///
/// Returns an error if the run aborts (runtime install) or fails (readiness
/// timeout), or if the user declines the broker restart.
pub async fn run(app: &AppContext) -> Result<()> {
    // Advisory pre-probe for the confirmation prompt only; the service takes
    // its own fresh probe before acting.
    let existing = app
        .processes
        .probe(&app.config.broker.process_pattern)
        .await
        .unwrap_or_default();
    if existing.found {
        let prompt = format!(
            "A broker instance is already running (pid {}). It will be stopped and restarted with the freshly written configuration. Continue?",
            join_pids(&existing.pids)
        );
        if !app.confirm(&prompt, true)? {
            anyhow::bail!("aborted: broker restart declined. Re-run with --yes to proceed.");
        }
    }

    let reporter = app.terminal_reporter();
    let summary = provision::provision_stack(
        &app.packages,
        &app.archives,
        &app.fs,
        &app.processes,
        &app.launcher,
        &app.network,
        &app.swap,
        &app.runner,
        &app.config,
        ProvisionOptions {
            reporter: &reporter,
            started_at: Utc::now(),
        },
    )
    .await?;

    print_summary(&summary, app);
    Ok(())
}

fn print_summary(summary: &ProvisionSummary, app: &AppContext) {
    let ctx = &app.output;
    if ctx.quiet {
        return;
    }
    ctx.success("stack is up");
    ctx.kv(
        "Broker",
        &format!(
            "{}:{} ({})",
            app.config.host,
            summary.diagnostics.listener_port,
            if summary.diagnostics.port_bound {
                "port bound"
            } else {
                "port not visible in socket table"
            }
        ),
    );
    ctx.kv("Broker PIDs", &join_pids(&summary.diagnostics.broker.pids));
    if summary.coordination_started {
        ctx.kv("Coordination", "started this run");
    } else {
        ctx.kv("Coordination", "already running");
    }
    if !summary.broker_pids_terminated.is_empty() {
        ctx.kv(
            "Restarted",
            &format!(
                "previous broker pid {}",
                join_pids(&summary.broker_pids_terminated)
            ),
        );
    }
    if summary.swap_file_created {
        ctx.kv("Swap", &app.config.swap.file.display().to_string());
    }
    ctx.kv("Diagnostics", "streamrig diagnose");
}

fn join_pids(pids: &[i32]) -> String {
    if pids.is_empty() {
        return "none".to_string();
    }
    pids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
