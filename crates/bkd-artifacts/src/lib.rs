//! bkd-artifacts: validated, durable export of generated baskets.
//!
//! Write protocol, in order:
//! 1. Serialize the full basket collection to pretty-printed JSON.
//! 2. Refuse output under [`MIN_EXPORT_CHARS`] — an undersized document
//!    means the generation step lost data, and the previous artifact must
//!    survive untouched.
//! 3. If the destination exists, rename it to `<name>.bak` (replacing any
//!    older backup) BEFORE writing.
//! 4. Write, flush, and fsync the new file.
//!
//! Because the rename precedes the write, a failed write never destroys
//! the prior good artifact: it survives as the backup.

use anyhow::{bail, Context, Result};
use bkd_basket::Basket;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serialized output at or under this length is treated as data loss.
pub const MIN_EXPORT_CHARS: usize = 100;

/// What one export run produced.
#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub bytes: usize,
    pub baskets: usize,
    pub stocks: usize,
    /// Path of the backup made for a pre-existing artifact, if any.
    pub backup: Option<PathBuf>,
}

/// Export `baskets` to `path`, backing up any prior artifact first.
pub fn export_baskets(baskets: &[Basket], path: &Path) -> Result<ExportReport> {
    let json = serde_json::to_string_pretty(baskets).context("serialize baskets failed")?;

    if json.len() < MIN_EXPORT_CHARS {
        bail!(
            "EXPORT_UNDERSIZED: serialized output is {} chars (minimum {}); refusing to touch {}",
            json.len(),
            MIN_EXPORT_CHARS,
            path.display()
        );
    }

    let backup = if path.exists() {
        let bak = backup_path(path);
        fs::rename(path, &bak).with_context(|| {
            format!(
                "backup rename failed: {} -> {}",
                path.display(),
                bak.display()
            )
        })?;
        debug!(backup = %bak.display(), "previous artifact moved aside");
        Some(bak)
    } else {
        None
    };

    let mut file = fs::File::create(path)
        .with_context(|| format!("create artifact failed: {}", path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("write artifact failed: {}", path.display()))?;
    file.flush()
        .with_context(|| format!("flush artifact failed: {}", path.display()))?;
    // Force to stable storage before reporting success.
    file.sync_all()
        .with_context(|| format!("sync artifact failed: {}", path.display()))?;

    let report = ExportReport {
        path: path.to_path_buf(),
        bytes: json.len(),
        baskets: baskets.len(),
        stocks: baskets.iter().map(|b| b.stocks.len()).sum(),
        backup,
    };
    info!(
        path = %report.path.display(),
        bytes = report.bytes,
        baskets = report.baskets,
        stocks = report.stocks,
        "baskets exported"
    );
    Ok(report)
}

/// Sibling backup path: the artifact name with ".bak" appended.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".bak");
    PathBuf::from(os)
}
