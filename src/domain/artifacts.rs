//! Rendered host artifacts: service config files, the broker launch
//! environment, and the swap mount-table entry.
//!
//! Pure string generation. The provision service writes these to disk before
//! the owning service starts; files are unconditional overwrites.

use std::path::Path;

use crate::domain::config::{BrokerConfig, CoordinationConfig, HeapBounds};

/// Environment variable carrying the broker JVM heap bounds.
pub const HEAP_ENV_KEY: &str = "KAFKA_HEAP_OPTS";

/// Coordination service config file.
///
/// Exactly five keys: `tickTime`, `dataDir`, `clientPort`, `initLimit`,
/// `syncLimit`.
#[must_use]
pub fn coordination_config(cfg: &CoordinationConfig) -> String {
    format!(
        "tickTime={}\ndataDir={}\nclientPort={}\ninitLimit={}\nsyncLimit={}\n",
        cfg.tick_time_ms,
        cfg.data_dir.display(),
        cfg.client_port,
        cfg.init_limit,
        cfg.sync_limit,
    )
}

/// Broker properties file.
#[must_use]
pub fn broker_properties(host: &str, coordination_port: u16, cfg: &BrokerConfig) -> String {
    format!(
        "broker.id={}\nlog.dirs={}\nzookeeper.connect={host}:{coordination_port}\nlisteners=PLAINTEXT://:{}\nnum.partitions={}\n",
        cfg.broker_id,
        cfg.log_dir.display(),
        cfg.listener_port,
        cfg.partitions,
    )
}

/// Heap bounds as a launch-environment entry. The broker start script exports
/// nothing itself; the provisioner owns the whole launch environment.
#[must_use]
pub fn heap_env(heap: &HeapBounds) -> (String, String) {
    (
        HEAP_ENV_KEY.to_string(),
        format!("-Xmx{}M -Xms{}M", heap.max_mb, heap.min_mb),
    )
}

/// Mount-table line persisting the swap file across reboots.
#[must_use]
pub fn fstab_entry(swap_file: &Path) -> String {
    format!("{} none swap sw 0 0", swap_file.display())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
