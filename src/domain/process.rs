//! Typed process-table probes.
//!
//! A probe is the structured answer to "is a process matching this pattern
//! running, and under which PIDs" — replacing raw shell output matching.
//! Probe results go stale the moment the process table changes; callers must
//! re-probe immediately before any action gated on one.

use serde::Serialize;

/// Result of probing the process table for a command-line match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessProbe {
    pub found: bool,
    pub pids: Vec<i32>,
}

/// Parse `ps -eo pid,args` output, collecting PIDs whose command line
/// contains `pattern`. The header line is skipped; unparseable lines are
/// ignored.
#[must_use]
pub fn parse_process_table(output: &str, pattern: &str) -> ProcessProbe {
    let mut pids = Vec::new();
    for line in output.lines().skip(1) {
        let line = line.trim_start();
        let Some((pid, args)) = line.split_once(char::is_whitespace) else {
            continue;
        };
        if !args.contains(pattern) {
            continue;
        }
        if let Ok(pid) = pid.parse::<i32>() {
            pids.push(pid);
        }
    }
    ProcessProbe {
        found: !pids.is_empty(),
        pids,
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
