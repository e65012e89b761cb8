//! Destination conflict resolution.
//!
//! When the computed destination already exists, the conflict policy picks
//! the outcome: keep the path and let the executor replace it, drop the
//! item, or probe for a free " (n)" suffixed name starting at 1.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::ConflictPolicy;

/// Resolve a planned destination against what is already on disk.
/// None means the item is skipped.
pub fn resolve_conflict(candidate: &Path, policy: ConflictPolicy) -> Option<PathBuf> {
    if !candidate.exists() {
        return Some(candidate.to_path_buf());
    }
    match policy {
        ConflictPolicy::Overwrite => Some(candidate.to_path_buf()),
        ConflictPolicy::Skip => None,
        ConflictPolicy::AutoRename => Some(next_free_name(candidate)),
    }
}

/// First non-existing sibling of the form "stem (n).ext", counting from 1.
/// Works for directories too, where the whole name is the stem.
pub fn next_free_name(candidate: &Path) -> PathBuf {
    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
    let stem = candidate.file_stem().unwrap_or_default();
    let extension = candidate.extension();

    let mut index: u32 = 1;
    loop {
        let mut name = OsString::from(stem);
        name.push(format!(" ({index})"));
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }
        let probe = parent.join(&name);
        if !probe.exists() {
            return probe;
        }
        index += 1;
    }
}
