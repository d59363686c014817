//! Archive infrastructure — staged release downloads and unpacking.
//!
//! Downloads go to a temp file first so a failed transfer never leaves a
//! truncated archive under the install directory, and the digest (when the
//! target carries one) is verified before anything is unpacked.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::application::ports::ArchiveStore;
use crate::domain::config::InstallTarget;

/// Production implementation: HTTP download via ureq, `.tar.gz` unpack via
/// tar + flate2. The blocking work runs on the tokio blocking pool.
pub struct UreqArchiveStore;

impl ArchiveStore for UreqArchiveStore {
    async fn fetch_unpack(&self, target: &InstallTarget) -> Result<()> {
        let target = target.clone();
        tokio::task::spawn_blocking(move || fetch_unpack_blocking(&target))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
    }
}

fn fetch_unpack_blocking(target: &InstallTarget) -> Result<()> {
    let resp = match ureq::get(&target.url).call() {
        Ok(resp) => resp,
        Err(ureq::Error::Status(code, _)) => {
            anyhow::bail!("download failed: HTTP {code} for {}", target.url)
        }
        Err(_) => anyhow::bail!("download failed: no network connection to {}", target.url),
    };

    let mut staged = tempfile::NamedTempFile::new().context("creating staging file")?;
    std::io::copy(&mut resp.into_reader(), &mut staged).context("writing staged archive")?;

    if let Some(expected) = target.sha256.as_deref() {
        let actual = sha256_file(staged.path())?;
        anyhow::ensure!(
            actual.eq_ignore_ascii_case(expected),
            "archive digest mismatch for {}: expected {expected}, got {actual}",
            target.url
        );
    }

    let file = staged.reopen().context("reopening staged archive")?;
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    archive
        .unpack(&target.install_dir)
        .with_context(|| format!("unpacking archive into {}", target.install_dir.display()))?;
    Ok(())
}

/// SHA-256 hex digest of a file, read in 64 KB chunks.
fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 65536];
    loop {
        let n = file.read(&mut buf).context("reading file")?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex_encode(&hasher.finalize()))
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::new(), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

// ── Unit tests ────────────────────────────────────────────────────────────────
