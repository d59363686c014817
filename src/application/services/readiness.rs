//! Bounded readiness polling for a freshly launched service.
//!
//! Launching is non-blocking; this is the second half of the fire-and-poll
//! split. Probe errors are treated as "not reachable yet" — the only way to
//! fail is to exhaust the time budget.

use std::time::Duration;

use crate::application::ports::NetworkProbe;

/// Outcome of a bounded readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    TimedOut,
}

/// Wait for `host:port` to accept TCP connections.
///
/// Sleeps `initial_delay` before the first check, then polls every
/// `interval` until `timeout` (counted after the initial delay) elapses.
/// At least one check is made even with a zero timeout.
pub async fn await_ready(
    probe: &impl NetworkProbe,
    host: &str,
    port: u16,
    initial_delay: Duration,
    timeout: Duration,
    interval: Duration,
) -> Readiness {
    tokio::time::sleep(initial_delay).await;
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if probe
            .check_tcp_connectivity(host, port)
            .await
            .unwrap_or(false)
        {
            return Readiness::Ready;
        }
        if tokio::time::Instant::now() >= deadline {
            return Readiness::TimedOut;
        }
        tokio::time::sleep(interval).await;
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
