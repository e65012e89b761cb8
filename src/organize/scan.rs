//! Source tree scanning and candidate selection.
//!
//! Walks the source directory (one level or recursively), applies the
//! hidden/protected/file filters, and reduces the survivors to a
//! non-overlapping candidate set according to the item mode:
//! - files only (or any file filter active): files alone
//! - folders only: top-most directories, never a directory whose ancestor
//!   was already selected
//! - both: top-most directories plus files that are not inside a selected
//!   directory
//!
//! Ordering is deterministic: directories shallow-to-deep, then files, each
//! group in walk order.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{ItemMode, Settings};
use crate::errors::OrganizeError;

use super::classify::{
    allowed_by_hidden_filter, allowed_by_protected_paths, canonical_or_same,
    file_allowed_by_filters,
};

/// True if `child` resolves to a path inside `parent` (not equal to it).
pub fn is_subdirectory(parent: &Path, child: &Path) -> bool {
    let parent = canonical_or_same(parent);
    let child = canonical_or_same(child);
    child != parent && child.starts_with(&parent)
}

/// Collect the entries to organize from the source tree.
pub fn scan(settings: &Settings) -> Result<Vec<PathBuf>> {
    settings.validate()?;

    let source = &settings.source_path;
    if !source.is_dir() {
        return Err(OrganizeError::InvalidSource(source.clone()).into());
    }
    // A target nested inside the source would be rescanned and refilled
    // endlessly on repeat runs; refuse it outright. The target being equal
    // to the source (organize in place) is allowed.
    if is_subdirectory(source, &settings.target_path) {
        return Err(OrganizeError::InvalidTarget(settings.target_path.clone()).into());
    }

    let mut walker = WalkDir::new(source).min_depth(1);
    if !settings.recursive {
        walker = walker.max_depth(1);
    }

    let mut dirs: Vec<PathBuf> = Vec::new();
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("walk source '{}'", source.display()))?;
        let path = entry.path();
        // Hidden directories are themselves excluded but their children stay
        // in play, so filtering happens per entry rather than by pruning.
        if !allowed_by_hidden_filter(path, settings)
            || !allowed_by_protected_paths(path, settings)
        {
            continue;
        }
        if entry.file_type().is_dir() {
            dirs.push(path.to_path_buf());
        } else if entry.file_type().is_file() {
            files.push(path.to_path_buf());
        }
        // Symlinks and other special entries are left alone.
    }

    let files_mode =
        settings.item_mode == ItemMode::FilesOnly || settings.file_filter_active();

    let selected = if files_mode {
        let mut out = Vec::new();
        for f in files {
            if file_allowed_by_filters(&f, settings)? {
                out.push(f);
            }
        }
        out
    } else if settings.item_mode == ItemMode::FoldersOnly {
        dedup_nested_directories(dirs)
    } else {
        let top_dirs = dedup_nested_directories(dirs);
        let mut out = top_dirs.clone();
        for f in files {
            if top_dirs.iter().any(|d| f.starts_with(d)) {
                continue;
            }
            if file_allowed_by_filters(&f, settings)? {
                out.push(f);
            }
        }
        out
    };

    info!(
        count = selected.len(),
        source = %source.display(),
        "scan complete"
    );
    debug!(?selected, "scan selection");
    Ok(selected)
}

/// Keep only directories whose ancestors were not already kept. Input may be
/// in any order; output is shallow-to-deep.
fn dedup_nested_directories(mut dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    dirs.sort_by_key(|d| d.components().count());
    let mut kept: Vec<PathBuf> = Vec::new();
    for dir in dirs {
        if !kept.iter().any(|k| dir.starts_with(k)) {
            kept.push(dir);
        }
    }
    kept
}
