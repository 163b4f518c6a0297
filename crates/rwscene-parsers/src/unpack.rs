//! Archive extraction
//!
//! Batch unpacking of IMG and TXD archives to a directory tree. Each item
//! produces an explicit outcome instead of throwing: malformed or
//! unwritable entries are skipped and counted, and a batch over many
//! archives never aborts because one of them is broken. The output root
//! must already exist; subdirectories named by container entries are
//! created on demand.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};

use rwscene_core::Result;

use crate::entry::ArchiveEntry;
use crate::img::ImgArchive;
use crate::txd::TxdArchive;
use crate::version::GameVersion;

/// Staging directory for nested TXD containers found inside an IMG
const TXD_STAGING_DIR: &str = "___txds";

/// Outcome of extracting one archive item
#[derive(Debug)]
pub enum ItemOutcome {
    /// Written to the given destination
    Extracted(PathBuf),
    /// Left out, with the reason
    Skipped { name: String, reason: String },
}

/// Aggregated results of an unpack operation
#[derive(Debug, Default, Clone, Serialize)]
pub struct UnpackReport {
    /// Items written to disk
    pub extracted: usize,
    /// Items skipped (malformed, truncated, unwritable)
    pub skipped: usize,
    /// Whole archives that failed to parse during a batch
    pub failed_archives: usize,
}

impl UnpackReport {
    fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Extracted(_) => self.extracted += 1,
            ItemOutcome::Skipped { name, reason } => {
                warn!(name, reason, "Skipped archive item");
                self.skipped += 1;
            }
        }
    }

    fn merge(&mut self, other: UnpackReport) {
        self.extracted += other.extracted;
        self.skipped += other.skipped;
        self.failed_archives += other.failed_archives;
    }
}

/// Unpack every texture alias of a TXD archive into `out_dir`
pub fn unpack_txd(txd_path: &Path, out_dir: &Path) -> Result<UnpackReport> {
    let archive = TxdArchive::open(txd_path)?;
    let data = fs::read(txd_path)?;

    let mut report = UnpackReport::default();
    for entry in archive.entries() {
        report.record(extract_from_buffer(&data, &entry, out_dir));
    }

    info!(
        archive = %txd_path.display(),
        extracted = report.extracted,
        skipped = report.skipped,
        "Unpacked TXD"
    );
    Ok(report)
}

/// Unpack a flat IMG archive into `out_dir`.
///
/// Nested TXD containers are staged under `<out_dir>/___txds/` and then
/// unpacked into `out_dir` themselves; all other payloads are written
/// directly.
pub fn unpack_img(img_path: &Path, version: GameVersion, out_dir: &Path) -> Result<UnpackReport> {
    let archive = ImgArchive::open(img_path, version)?;

    let mut report = UnpackReport::default();
    for entry in archive.entries() {
        let data = match archive.read_entry(entry) {
            Ok(data) => data,
            Err(e) => {
                report.record(ItemOutcome::Skipped {
                    name: entry.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if entry
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txd"))
        {
            report.merge(stage_and_unpack_txd(&entry.name, &data, out_dir));
        } else {
            report.record(write_item(&entry.name, &data, out_dir));
        }
    }

    info!(
        archive = %img_path.display(),
        extracted = report.extracted,
        skipped = report.skipped,
        "Unpacked IMG"
    );
    Ok(report)
}

/// Unpack every `.img` and `.txd` found under `dir`, recursively.
///
/// A broken archive is logged and counted; the batch continues.
pub fn unpack_directory(dir: &Path, version: GameVersion, out_dir: &Path) -> Result<UnpackReport> {
    let mut report = UnpackReport::default();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            report.merge(unpack_directory(&path, version, out_dir)?);
            continue;
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        let result = match ext.as_deref() {
            Some("img") => unpack_img(&path, version, out_dir),
            Some("txd") => unpack_txd(&path, out_dir),
            _ => continue,
        };

        match result {
            Ok(inner) => report.merge(inner),
            Err(e) => {
                error!(archive = %path.display(), error = %e, "Failed to unpack archive");
                report.failed_archives += 1;
            }
        }
    }

    Ok(report)
}

/// Write a staged TXD payload and unpack its contents
fn stage_and_unpack_txd(name: &str, data: &[u8], out_dir: &Path) -> UnpackReport {
    let staging = out_dir.join(TXD_STAGING_DIR);
    let mut report = UnpackReport::default();

    let staged = match fs::create_dir_all(&staging)
        .map(|_| unique_destination(staging.join(name)))
        .and_then(|path| fs::write(&path, data).map(|_| path))
    {
        Ok(path) => path,
        Err(e) => {
            report.record(ItemOutcome::Skipped {
                name: name.to_string(),
                reason: format!("staging failed: {}", e),
            });
            return report;
        }
    };

    match unpack_txd(&staged, out_dir) {
        Ok(inner) => report.merge(inner),
        Err(e) => report.record(ItemOutcome::Skipped {
            name: name.to_string(),
            reason: format!("nested container: {}", e),
        }),
    }
    report
}

/// Extract one entry out of an in-memory archive image
fn extract_from_buffer(data: &[u8], entry: &ArchiveEntry, out_dir: &Path) -> ItemOutcome {
    let end = entry.end() as usize;
    if end > data.len() {
        return ItemOutcome::Skipped {
            name: entry.name.clone(),
            reason: format!("range {}..{} exceeds archive length {}", entry.offset, end, data.len()),
        };
    }
    write_item(&entry.name, &data[entry.offset as usize..end], out_dir)
}

/// Write a payload under its entry name, resolving collisions
fn write_item(name: &str, data: &[u8], out_dir: &Path) -> ItemOutcome {
    if let Some(dir) = name.rfind('/').map(|idx| &name[..idx]) {
        if let Err(e) = fs::create_dir_all(out_dir.join(dir)) {
            return ItemOutcome::Skipped {
                name: name.to_string(),
                reason: format!("cannot create {}: {}", dir, e),
            };
        }
    }

    let dest = unique_destination(out_dir.join(name));
    match fs::write(&dest, data) {
        Ok(()) => ItemOutcome::Extracted(dest),
        Err(e) => ItemOutcome::Skipped {
            name: name.to_string(),
            reason: e.to_string(),
        },
    }
}

/// Find a free destination by inserting `_` before the extension until the
/// name no longer collides
fn unique_destination(mut path: PathBuf) -> PathBuf {
    while path.exists() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let renamed = match name.rfind('.') {
            Some(dot) => format!("{}_{}", &name[..dot], &name[dot..]),
            None => format!("{}_", name),
        };
        path.set_file_name(renamed);
    }
    path
}
