//! Diagnostics domain types and pure helpers.
//!
//! This module is intentionally free of I/O, async, and external layer
//! imports. All functions take data in and return data out.

use serde::Serialize;

use crate::domain::process::ProcessProbe;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Observational diagnostics collected after a run (or via `diagnose`).
/// Never gates success/failure — this is for a human operator.
#[derive(Debug, Serialize)]
pub struct DiagnosticsReport {
    /// Last lines of the broker server log.
    pub log_tail: Vec<String>,
    /// Whether the listening-socket table shows the broker listener port.
    pub port_bound: bool,
    pub listener_port: u16,
    /// Broker process-table snapshot.
    pub broker: ProcessProbe,
}

/// Snapshot of both services, returned by `status`.
#[derive(Debug, Serialize)]
pub struct StackStatus {
    pub coordination: ProcessProbe,
    pub broker: ProcessProbe,
    /// Whether the broker listener accepts TCP connections.
    pub port_reachable: bool,
    pub listener_port: u16,
}

// ── Pure functions ────────────────────────────────────────────────────────────

/// Last `n` lines of a log file's contents.
#[must_use]
pub fn tail_lines(contents: &str, n: usize) -> Vec<String> {
    let lines: Vec<&str> = contents.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].iter().map(|l| (*l).to_string()).collect()
}

/// Whether a `netstat -tln` / `ss -tln` listing shows a listener on `port`.
///
/// Matches an address column ending in `:<port>` on a `LISTEN` line, so
/// `0.0.0.0:9092` and `:::9092` both count while `:19092` does not.
#[must_use]
pub fn port_listening(listing: &str, port: u16) -> bool {
    let needle = format!(":{port}");
    listing
        .lines()
        .filter(|l| l.contains("LISTEN"))
        .any(|l| l.split_whitespace().any(|col| col.ends_with(&needle)))
}

/// Collect actionable issues from a diagnostics report.
#[must_use]
pub fn collect_issues(report: &DiagnosticsReport) -> Vec<String> {
    let mut issues = Vec::new();
    if !report.broker.found {
        issues.push("no broker process found".to_string());
    }
    if !report.port_bound {
        issues.push(format!(
            "broker port {} is not bound",
            report.listener_port
        ));
    }
    if report.log_tail.is_empty() {
        issues.push("broker log is empty or unreadable".to_string());
    }
    issues
}

// ── Unit tests ────────────────────────────────────────────────────────────────
