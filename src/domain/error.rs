//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`, or
//! `crate::application`. All error types implement `thiserror::Error` and
//! convert to `anyhow::Error` via the `?` operator.

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors that fail a provisioning run.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Java runtime install failed: {0}\n\nNothing downstream can run without the runtime.")]
    RuntimeInstall(String),

    #[error(
        "Broker did not open port {port} within {waited_secs}s.\n\nInspect the broker log: streamrig diagnose"
    )]
    ReadinessTimeout { port: u16, waited_secs: u64 },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
