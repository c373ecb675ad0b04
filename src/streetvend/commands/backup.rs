use crate::error::{Result, VendorError};
use crate::model::local_now;
use crate::store;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const BACKUP_EXTENSIONS: [&str; 2] = ["txt", "csv"];

/// A file that could not be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFailure {
    pub source: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
    pub backup_dir: PathBuf,
    pub copied: Vec<PathBuf>,
    pub failures: Vec<BackupFailure>,
}

impl BackupReport {
    /// Number of files successfully copied.
    pub fn count(&self) -> usize {
        self.copied.len()
    }
}

pub fn backup_data_files(source_dir: &Path, backup_dir: &Path) -> Result<BackupReport> {
    backup_data_files_at(source_dir, backup_dir, local_now())
}

pub(crate) fn backup_data_files_at(
    source_dir: &Path,
    backup_dir: &Path,
    now: NaiveDateTime,
) -> Result<BackupReport> {
    if !source_dir.is_dir() {
        return Err(VendorError::NotFound(source_dir.to_path_buf()));
    }
    store::ensure_dir(backup_dir)?;

    let stamp = now.format(BACKUP_STAMP_FORMAT).to_string();
    let mut report = BackupReport {
        backup_dir: backup_dir.to_path_buf(),
        ..BackupReport::default()
    };

    let mut sources: Vec<PathBuf> = fs::read_dir(source_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_data_file(path))
        .collect();
    sources.sort();

    for source in sources {
        let target = backup_dir.join(backup_name(&source, &stamp));
        match fs::copy(&source, &target) {
            Ok(_) => {
                tracing::debug!(
                    source = %source.display(),
                    target = %target.display(),
                    "backed up"
                );
                report.copied.push(target);
            }
            Err(e) => {
                tracing::warn!(source = %source.display(), error = %e, "backup copy failed");
                report.failures.push(BackupFailure {
                    source,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        copied = report.count(),
        failed = report.failures.len(),
        backup_dir = %backup_dir.display(),
        "backup finished"
    );
    Ok(report)
}

fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| BACKUP_EXTENSIONS.contains(&ext))
}

/// `<stem>_<stamp><.ext>`
fn backup_name(source: &Path, stamp: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!("{}_{}{}", stem, stamp, ext)
}
