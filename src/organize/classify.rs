//! Path eligibility rules.
//!
//! Four orthogonal checks decide whether a filesystem entry may be
//! organized:
//! - hidden rule: dotfiles and platform-hidden entries are out unless
//!   `include_hidden` is set
//! - protected rule: entries inside (or equal to) a protected path are
//!   always out; callers list the app data directory and their own
//!   executable here
//! - extension rule (files only): lowercase suffix must be in the filter set
//! - size rule (files only): byte size within [min, max], either bound open
//!
//! All checks are read-only; the only I/O is stat calls.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;

/// Canonicalize with a lossless fallback for paths that cannot be resolved.
pub(crate) fn canonical_or_same(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn has_hidden_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(windows)]
fn has_hidden_attribute(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;
    use windows_sys::Win32::Storage::FileSystem::FILE_ATTRIBUTE_HIDDEN;

    fs::symlink_metadata(path)
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn has_hidden_attribute(_path: &Path) -> bool {
    false
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    has_hidden_name(path) || has_hidden_attribute(path)
}

/// Hidden-file rule: excluded unless the settings opt in.
pub fn allowed_by_hidden_filter(path: &Path, settings: &Settings) -> bool {
    settings.include_hidden || !is_hidden(path)
}

/// Protected-path rule: never select the engine's own data files or the
/// running program, no matter what the other filters say.
pub fn allowed_by_protected_paths(path: &Path, settings: &Settings) -> bool {
    if settings.protected_paths.is_empty() {
        return true;
    }
    let resolved = canonical_or_same(path);
    !settings.protected_paths.iter().any(|protected| {
        let protected = canonical_or_same(protected);
        resolved == protected || resolved.starts_with(&protected)
    })
}

/// Normalize a comma-separated extension filter into a lowercase,
/// leading-dot set: "JPG, .png" -> {".jpg", ".png"}.
pub fn normalized_extensions(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let lower = s.to_ascii_lowercase();
            if lower.starts_with('.') {
                lower
            } else {
                format!(".{lower}")
            }
        })
        .collect()
}

/// Lowercase suffix of a file in leading-dot form, or None for files
/// without an extension (including bare dotfiles like `.env`).
fn dot_suffix(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}

/// File-level rules: extension membership and size window.
pub fn file_allowed_by_filters(path: &Path, settings: &Settings) -> Result<bool> {
    if !settings.extension_filter.trim().is_empty() {
        let allowed = normalized_extensions(&settings.extension_filter);
        match dot_suffix(path) {
            Some(suffix) if allowed.contains(&suffix) => {}
            _ => return Ok(false),
        }
    }

    if settings.min_size_bytes.is_some() || settings.max_size_bytes.is_some() {
        let size = fs::metadata(path)
            .with_context(|| format!("stat '{}'", path.display()))?
            .len();
        if let Some(min) = settings.min_size_bytes
            && size < min
        {
            return Ok(false);
        }
        if let Some(max) = settings.max_size_bytes
            && size > max
        {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn extension_set_normalizes_case_and_dots() {
        let set = normalized_extensions("JPG, .png , ,gif");
        assert_eq!(set.len(), 3);
        assert!(set.contains(".jpg"));
        assert!(set.contains(".png"));
        assert!(set.contains(".gif"));
    }

    #[test]
    fn dotfiles_are_hidden() {
        assert!(is_hidden(Path::new("/tmp/.secret")));
        assert!(!is_hidden(Path::new("/tmp/visible.txt")));
    }

    #[test]
    fn hidden_filter_honors_include_hidden() {
        let mut settings = Settings::new("/src", "/dst");
        assert!(!allowed_by_hidden_filter(Path::new("/src/.cache"), &settings));
        settings.include_hidden = true;
        assert!(allowed_by_hidden_filter(Path::new("/src/.cache"), &settings));
    }

    #[test]
    fn protected_paths_exclude_self_and_descendants() {
        let td = tempdir().unwrap();
        let data = td.path().join("datesort_data");
        fs::create_dir_all(&data).unwrap();
        let inner = data.join("operation.log");
        fs::write(&inner, b"log").unwrap();
        let other = td.path().join("photo.jpg");
        fs::write(&other, b"jpg").unwrap();

        let mut settings = Settings::new(td.path(), td.path());
        settings.protected_paths = vec![data.clone()];

        assert!(!allowed_by_protected_paths(&data, &settings));
        assert!(!allowed_by_protected_paths(&inner, &settings));
        assert!(allowed_by_protected_paths(&other, &settings));
    }

    #[test]
    fn size_window_is_inclusive() {
        let td = tempdir().unwrap();
        let f = td.path().join("exact.bin");
        fs::write(&f, vec![0u8; 100]).unwrap();

        let mut settings = Settings::new(td.path(), td.path());
        settings.min_size_bytes = Some(100);
        settings.max_size_bytes = Some(100);
        assert!(file_allowed_by_filters(&f, &settings).unwrap());

        settings.min_size_bytes = Some(101);
        assert!(!file_allowed_by_filters(&f, &settings).unwrap());
    }

    #[test]
    fn extensionless_file_fails_extension_filter() {
        let mut settings = Settings::new("/src", "/dst");
        settings.extension_filter = ".txt".into();
        assert!(!file_allowed_by_filters(Path::new("/src/README"), &settings).unwrap());
    }
}
