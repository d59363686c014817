//! Shared fake ports for service-level tests.
//!
//! The fakes record what was asked of them into a shared [`EventLog`] so
//! tests can assert ordering (kill before launch, config write before
//! start) as well as counts.

#![allow(clippy::expect_used)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use streamrig::application::ports::{
    ArchiveStore, CommandRunner, HostFs, LaunchSpec, NetworkProbe, PackageManager, ProcessTable,
    ProgressReporter, ServiceLauncher, SwapControl,
};
use streamrig::domain::config::InstallTarget;
use streamrig::domain::process::ProcessProbe;

// ── Output helpers ────────────────────────────────────────────────────────────

pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

// ── Event log ─────────────────────────────────────────────────────────────────

/// Shared, ordered record of side effects across fakes.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().expect("lock").push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().expect("lock").clone()
    }

    /// Index of the first event containing `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.events().iter().position(|e| e.contains(needle))
    }
}

// ── Fake: in-memory filesystem ────────────────────────────────────────────────

/// In-memory `HostFs`. Cheap to clone — all clones share state.
#[derive(Clone, Default)]
pub struct MemFs {
    inner: Arc<MemFsInner>,
}

#[derive(Default)]
struct MemFsInner {
    files: Mutex<HashMap<PathBuf, String>>,
    dirs: Mutex<HashSet<PathBuf>>,
    modes: Mutex<HashMap<PathBuf, u32>>,
    log: EventLog,
}

impl MemFs {
    pub fn with_log(log: EventLog) -> Self {
        Self {
            inner: Arc::new(MemFsInner {
                log,
                ..MemFsInner::default()
            }),
        }
    }

    pub fn file(&self, path: &Path) -> Option<String> {
        self.inner.files.lock().expect("lock").get(path).cloned()
    }

    pub fn mode(&self, path: &Path) -> Option<u32> {
        self.inner.modes.lock().expect("lock").get(path).copied()
    }

    pub fn add_dir(&self, path: &Path) {
        self.inner.dirs.lock().expect("lock").insert(path.to_path_buf());
    }

    pub fn add_file(&self, path: &Path, content: &str) {
        self.inner
            .files
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), content.to_string());
    }
}

impl HostFs for MemFs {
    fn exists(&self, path: &Path) -> bool {
        self.inner.files.lock().expect("lock").contains_key(path)
            || self.inner.dirs.lock().expect("lock").contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(path);
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.inner.log.push(format!("write:{}", path.display()));
        self.add_file(path, content);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.file(path)
            .ok_or_else(|| anyhow::anyhow!("no such file: {}", path.display()))
    }

    fn append_line(&self, path: &Path, line: &str) -> Result<()> {
        let mut files = self.inner.files.lock().expect("lock");
        let entry = files.entry(path.to_path_buf()).or_default();
        entry.push_str(line);
        entry.push('\n');
        Ok(())
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()> {
        self.inner
            .modes
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), mode);
        Ok(())
    }
}

// ── Fake: package manager ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakePackages {
    /// Packages whose install should fail.
    pub fail: HashSet<String>,
    pub installed: Mutex<Vec<String>>,
    pub index_updates: Mutex<u32>,
}

impl PackageManager for FakePackages {
    async fn update_index(&self) -> Result<()> {
        *self.index_updates.lock().expect("lock") += 1;
        Ok(())
    }

    async fn ensure_installed(&self, package: &str) -> Result<()> {
        if self.fail.contains(package) {
            anyhow::bail!("E: Unable to locate package {package}");
        }
        self.installed.lock().expect("lock").push(package.to_string());
        Ok(())
    }
}

// ── Fake: archive store ───────────────────────────────────────────────────────

/// Records fetches and marks the unpacked tree as present in the shared
/// `MemFs`, like a real unpack would.
pub struct FakeArchives {
    pub fs: MemFs,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeArchives {
    pub fn new(fs: MemFs) -> Self {
        Self {
            fs,
            fetched: Mutex::new(Vec::new()),
        }
    }
}

impl ArchiveStore for FakeArchives {
    async fn fetch_unpack(&self, target: &InstallTarget) -> Result<()> {
        self.fetched.lock().expect("lock").push(target.url.clone());
        self.fs.add_dir(&target.home());
        Ok(())
    }
}

// ── Fake: process table ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeProcesses {
    probes: Mutex<HashMap<String, ProcessProbe>>,
    pub terminated: Mutex<Vec<i32>>,
    pub log: EventLog,
}

impl FakeProcesses {
    pub fn with_log(log: EventLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Make `pattern` match `pids` on subsequent probes.
    pub fn set_running(&self, pattern: &str, pids: &[i32]) {
        self.probes.lock().expect("lock").insert(
            pattern.to_string(),
            ProcessProbe {
                found: !pids.is_empty(),
                pids: pids.to_vec(),
            },
        );
    }
}

impl ProcessTable for FakeProcesses {
    async fn probe(&self, pattern: &str) -> Result<ProcessProbe> {
        Ok(self
            .probes
            .lock()
            .expect("lock")
            .get(pattern)
            .cloned()
            .unwrap_or_default())
    }

    async fn terminate(&self, pid: i32) -> Result<()> {
        self.log.push(format!("terminate:{pid}"));
        self.terminated.lock().expect("lock").push(pid);
        // keep later probes fresh: the pid is gone now
        for probe in self.probes.lock().expect("lock").values_mut() {
            probe.pids.retain(|p| *p != pid);
            probe.found = !probe.pids.is_empty();
        }
        Ok(())
    }
}

// ── Fake: service launcher ────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeLauncher {
    pub launches: Mutex<Vec<LaunchSpec>>,
    pub fail: bool,
    pub log: EventLog,
}

impl FakeLauncher {
    pub fn with_log(log: EventLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }
}

impl ServiceLauncher for FakeLauncher {
    fn launch(&self, spec: &LaunchSpec) -> Result<()> {
        if self.fail {
            anyhow::bail!("no such file or directory: {}", spec.program.display());
        }
        self.log.push(format!("launch:{}", spec.program.display()));
        self.launches.lock().expect("lock").push(spec.clone());
        Ok(())
    }
}

// ── Fake: network probe ───────────────────────────────────────────────────────

pub struct PortStub {
    pub open: bool,
}

impl NetworkProbe for PortStub {
    async fn check_tcp_connectivity(&self, _: &str, _: u16) -> Result<bool> {
        Ok(self.open)
    }
}

// ── Fake: swap control ────────────────────────────────────────────────────────

/// Records swap operations and marks the allocated file as present in the
/// shared `MemFs`, like a real `fallocate` would.
pub struct FakeSwap {
    pub fs: MemFs,
    pub active: Mutex<bool>,
    pub allocated: Mutex<Vec<(PathBuf, u64)>>,
    pub formatted: Mutex<Vec<PathBuf>>,
    pub enabled: Mutex<Vec<PathBuf>>,
}

impl FakeSwap {
    pub fn new(fs: MemFs) -> Self {
        Self {
            fs,
            active: Mutex::new(false),
            allocated: Mutex::new(Vec::new()),
            formatted: Mutex::new(Vec::new()),
            enabled: Mutex::new(Vec::new()),
        }
    }

    pub fn active_from_start(fs: MemFs) -> Self {
        let swap = Self::new(fs);
        *swap.active.lock().expect("lock") = true;
        swap
    }
}

impl SwapControl for FakeSwap {
    async fn any_active(&self) -> Result<bool> {
        Ok(*self.active.lock().expect("lock"))
    }

    async fn allocate(&self, path: &Path, size_mib: u64) -> Result<()> {
        self.allocated
            .lock()
            .expect("lock")
            .push((path.to_path_buf(), size_mib));
        self.fs.add_file(path, "");
        Ok(())
    }

    async fn format(&self, path: &Path) -> Result<()> {
        self.formatted.lock().expect("lock").push(path.to_path_buf());
        Ok(())
    }

    async fn enable(&self, path: &Path) -> Result<()> {
        self.enabled.lock().expect("lock").push(path.to_path_buf());
        *self.active.lock().expect("lock") = true;
        Ok(())
    }
}

// ── Fake: command runner ──────────────────────────────────────────────────────

/// Canned runner: `netstat` returns the configured listing, everything else
/// succeeds with empty output.
pub struct FakeRunner {
    pub netstat_stdout: String,
    pub log: EventLog,
}

impl FakeRunner {
    pub fn with_log(log: EventLog) -> Self {
        Self {
            netstat_stdout: String::new(),
            log,
        }
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, _args: &[&str]) -> Result<Output> {
        self.log.push(format!("run:{program}"));
        if program == "netstat" {
            return Ok(ok_output(self.netstat_stdout.as_bytes()));
        }
        Ok(ok_output(b""))
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        self.run(program, args).await
    }
}

// ── Fake: progress reporter ───────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
