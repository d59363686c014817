//! `streamrig diagnose` — the post-run diagnostics pass, standalone.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::diagnostics::{self, LOG_TAIL_LINES};
use crate::domain::health;

/// Run `streamrig diagnose`.
///
/// Diagnostics are observational: the command succeeds even when the stack
/// is down, and surfaces what it found.
///
/// # Errors
///
/// Returns an error only if output serialization fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let report =
        diagnostics::collect_diagnostics(&app.fs, &app.processes, &app.runner, &app.config).await;

    if app.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing diagnostics")?
        );
        return Ok(());
    }

    let ctx = &app.output;
    ctx.header("Broker diagnostics");
    ctx.kv(
        &format!("Port {}", report.listener_port),
        if report.port_bound {
            "bound"
        } else {
            "not bound"
        },
    );
    ctx.kv(
        "Process",
        &if report.broker.found {
            format!("{} matching", report.broker.pids.len())
        } else {
            "none".to_string()
        },
    );

    for issue in health::collect_issues(&report) {
        ctx.warn(&issue);
    }

    if !report.log_tail.is_empty() && !ctx.quiet {
        ctx.header(&format!("Server log (last {LOG_TAIL_LINES} lines)"));
        for line in &report.log_tail {
            println!("  {line}");
        }
    }
    Ok(())
}
