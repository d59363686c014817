//! Domain types and validators for streamrig configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access. Every value
//! here has a working default; a config file only needs to name the fields it
//! overrides.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ─────────────────────────────────────────────────────────────

/// Top-level configuration, optionally loaded from `~/.streamrig/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Host identifier used in connection strings and readiness polling.
    #[serde(default = "default_host")]
    pub host: String,
    /// Host packages installed before anything else.
    pub packages: PackagesConfig,
    /// Coordination service (cluster metadata/membership agreement).
    pub coordination: CoordinationConfig,
    /// Message broker.
    pub broker: BrokerConfig,
    /// Swap file provisioning.
    pub swap: SwapSpec,
    /// Broker readiness polling bounds.
    pub readiness: ReadinessSpec,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            packages: PackagesConfig::default(),
            coordination: CoordinationConfig::default(),
            broker: BrokerConfig::default(),
            swap: SwapSpec::default(),
            readiness: ReadinessSpec::default(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

/// Packages installed via the host package manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// Java runtime package. Install failure aborts the run.
    pub runtime: String,
    /// Network diagnostics package providing the port-listing utility.
    pub diagnostics: String,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            runtime: "openjdk-11-jdk".to_string(),
            diagnostics: "net-tools".to_string(),
        }
    }
}

/// A versioned release archive and where it lands on the host.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InstallTarget {
    /// Display name used in progress and error messages.
    pub name: String,
    pub version: String,
    /// Download URL of the release archive (`.tar.gz`).
    pub url: String,
    /// Expected SHA-256 of the archive. Verified before unpacking when set.
    pub sha256: Option<String>,
    /// Directory the archive is unpacked under.
    pub install_dir: PathBuf,
    /// Name of the top-level directory inside the archive. Its presence under
    /// `install_dir` marks the release as already installed.
    pub unpacked_dir: String,
}

impl InstallTarget {
    /// Root of the unpacked release tree.
    #[must_use]
    pub fn home(&self) -> PathBuf {
        self.install_dir.join(&self.unpacked_dir)
    }
}

/// Coordination service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    pub release: InstallTarget,
    /// Directory the service keeps its state in (`dataDir`).
    pub data_dir: PathBuf,
    /// Client port written to the config file and used in the broker's
    /// connection string.
    pub client_port: u16,
    pub tick_time_ms: u32,
    pub init_limit: u32,
    pub sync_limit: u32,
    /// Substring matched against process-table command lines.
    pub process_pattern: String,
    /// Start script, relative to the unpacked release root.
    pub start_script: String,
    /// Config file path, relative to the unpacked release root.
    pub config_rel: String,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            release: InstallTarget {
                name: "zookeeper".to_string(),
                version: "3.8.4".to_string(),
                url: "https://archive.apache.org/dist/zookeeper/zookeeper-3.8.4/apache-zookeeper-3.8.4-bin.tar.gz".to_string(),
                sha256: None,
                install_dir: PathBuf::from("/opt/zookeeper"),
                unpacked_dir: "apache-zookeeper-3.8.4-bin".to_string(),
            },
            data_dir: PathBuf::from("/var/lib/zookeeper"),
            client_port: 2181,
            tick_time_ms: 2000,
            init_limit: 5,
            sync_limit: 2,
            process_pattern: "zookeeper".to_string(),
            start_script: "bin/zkServer.sh".to_string(),
            config_rel: "conf/zoo.cfg".to_string(),
        }
    }
}

impl CoordinationConfig {
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.release.home().join(&self.config_rel)
    }

    #[must_use]
    pub fn start_script_path(&self) -> PathBuf {
        self.release.home().join(&self.start_script)
    }
}

/// Message broker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub release: InstallTarget,
    pub broker_id: u32,
    /// Message log directory (`log.dirs`), created with `log_dir_mode`.
    pub log_dir: PathBuf,
    pub log_dir_owner: String,
    pub log_dir_group: String,
    /// Listener port (`PLAINTEXT://:<port>`), also the readiness poll target.
    pub listener_port: u16,
    pub partitions: u32,
    /// Substring matched against process-table command lines.
    pub process_pattern: String,
    /// Start script, relative to the unpacked release root.
    pub start_script: String,
    /// Properties file path, relative to the unpacked release root.
    pub config_rel: String,
    /// Server log path, relative to the unpacked release root. Read by the
    /// diagnostics pass.
    pub server_log_rel: String,
    pub heap: HeapBounds,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            release: InstallTarget {
                name: "kafka".to_string(),
                version: "3.7.2".to_string(),
                url: "https://archive.apache.org/dist/kafka/3.7.2/kafka_2.13-3.7.2.tgz".to_string(),
                sha256: None,
                install_dir: PathBuf::from("/opt/kafka"),
                unpacked_dir: "kafka_2.13-3.7.2".to_string(),
            },
            broker_id: 0,
            log_dir: PathBuf::from("/var/log/kafka-logs"),
            log_dir_owner: "root".to_string(),
            log_dir_group: "root".to_string(),
            listener_port: 9092,
            partitions: 1,
            process_pattern: "kafka.Kafka".to_string(),
            start_script: "bin/kafka-server-start.sh".to_string(),
            config_rel: "config/server.properties".to_string(),
            server_log_rel: "logs/server.log".to_string(),
            heap: HeapBounds::default(),
        }
    }
}

impl BrokerConfig {
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.release.home().join(&self.config_rel)
    }

    #[must_use]
    pub fn start_script_path(&self) -> PathBuf {
        self.release.home().join(&self.start_script)
    }

    #[must_use]
    pub fn server_log_path(&self) -> PathBuf {
        self.release.home().join(&self.server_log_rel)
    }
}

/// JVM heap bounds passed to the broker through its launch environment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapBounds {
    pub max_mb: u32,
    pub min_mb: u32,
}

impl Default for HeapBounds {
    fn default() -> Self {
        Self {
            max_mb: 512,
            min_mb: 256,
        }
    }
}

/// Swap file location and size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapSpec {
    pub file: PathBuf,
    pub size_mib: u64,
}

impl Default for SwapSpec {
    fn default() -> Self {
        Self {
            file: PathBuf::from("/swapfile"),
            size_mib: 1024,
        }
    }
}

/// Bounds for the broker readiness poll.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessSpec {
    /// Delay before the first connectivity check.
    pub initial_delay_secs: u64,
    /// Total polling budget after the initial delay.
    pub timeout_secs: u64,
    pub poll_interval_secs: u64,
}

impl Default for ReadinessSpec {
    fn default() -> Self {
        Self {
            initial_delay_secs: 30,
            timeout_secs: 120,
            poll_interval_secs: 5,
        }
    }
}

impl ReadinessSpec {
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

// ── Validators ────────────────────────────────────────────────────────────────

/// Validate a loaded configuration.
///
/// # Errors
///
/// Returns an error naming the first offending key.
pub fn validate(cfg: &StackConfig) -> Result<()> {
    if cfg.host.trim().is_empty() {
        return Err(invalid("host", &cfg.host, "host must not be empty"));
    }
    if cfg.coordination.client_port == 0 {
        return Err(invalid(
            "coordination.client_port",
            "0",
            "port must be in 1..=65535",
        ));
    }
    if cfg.broker.listener_port == 0 {
        return Err(invalid(
            "broker.listener_port",
            "0",
            "port must be in 1..=65535",
        ));
    }
    if cfg.broker.heap.min_mb > cfg.broker.heap.max_mb {
        return Err(invalid(
            "broker.heap.min_mb",
            &cfg.broker.heap.min_mb.to_string(),
            "heap minimum must not exceed the maximum",
        ));
    }
    if cfg.coordination.process_pattern.trim().is_empty() {
        return Err(invalid(
            "coordination.process_pattern",
            "",
            "process pattern must not be empty",
        ));
    }
    if cfg.broker.process_pattern.trim().is_empty() {
        return Err(invalid(
            "broker.process_pattern",
            "",
            "process pattern must not be empty",
        ));
    }
    if cfg.swap.size_mib == 0 {
        return Err(invalid(
            "swap.size_mib",
            "0",
            "swap size must be at least 1 MiB",
        ));
    }
    Ok(())
}

fn invalid(key: &str, value: &str, hint: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
    .into()
}

// ── Unit tests ────────────────────────────────────────────────────────────────
