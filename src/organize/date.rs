//! Date extraction and destination layout.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{DateBasis, FolderFormat, Settings};

/// Read the relevant timestamp for an entry. Filesystems without a birth
/// time report creation as Unsupported; modified time stands in then.
pub fn extract_date(path: &Path, basis: DateBasis) -> Result<DateTime<Local>> {
    let meta = fs::metadata(path).with_context(|| format!("stat '{}'", path.display()))?;
    let system_time = match basis {
        DateBasis::CreationTime => match meta.created() {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::Unsupported => {
                debug!(
                    path = %path.display(),
                    "creation time unsupported here, using modified time"
                );
                meta.modified()
                    .with_context(|| format!("modified time of '{}'", path.display()))?
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("creation time of '{}'", path.display()));
            }
        },
        DateBasis::ModifiedTime => meta
            .modified()
            .with_context(|| format!("modified time of '{}'", path.display()))?,
    };
    Ok(system_time.into())
}

/// Render a date as the folder fragment for the chosen layout.
pub fn format_folder(date: &DateTime<Local>, format: FolderFormat) -> String {
    match format {
        FolderFormat::FlatDay => date.format("%Y-%m-%d").to_string(),
        FolderFormat::NestedDay => date.format("%Y/%m/%d").to_string(),
    }
}

/// Destination for one entry: target / date folder / original name.
pub fn date_bucket_target(
    path: &Path,
    date: &DateTime<Local>,
    settings: &Settings,
) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("'{}' has no file name", path.display()))?;
    let folder = format_folder(date, settings.folder_format);
    Ok(settings.target_path.join(folder).join(name))
}
