//! Filesystem primitives for the executor and undo.
//!
//! Moves fall back to copy+delete when rename fails (cross-device moves),
//! and file copies carry timestamps over so date classification stays
//! stable if the copy is organized again later.

use anyhow::{Result, anyhow};
use filetime::{FileTime, set_file_times};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

#[cfg(unix)]
use libc;

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" (permission denied; check ownership and write permissions)");
                }
                libc::EXDEV => {
                    msg.push_str(" (cross-filesystem; atomic rename not possible)");
                }
                libc::EBUSY => {
                    msg.push_str(" (resource busy; ensure no other process is writing)");
                }
                libc::ENOENT => {
                    msg.push_str(" (path not found; verify it exists)");
                }
                libc::EEXIST => {
                    msg.push_str(" (already exists; pick a unique name or remove the target)");
                }
                libc::ENOSPC => {
                    msg.push_str(" (insufficient space on device)");
                }
                libc::EROFS => {
                    msg.push_str(" (read-only filesystem; cannot write here)");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" (filename or path too long; shorten path segments)");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" (access denied; check permissions)"),
                17 => msg.push_str(" (not same device; cross-filesystem move)"),
                32 => msg.push_str(" (sharing violation; file is in use)"),
                2 | 3 => msg.push_str(" (path not found; verify it exists)"),
                80 => msg.push_str(" (already exists; pick a unique name)"),
                112 => msg.push_str(" (insufficient disk space)"),
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {code}]"));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" (permission denied; check ownership and write permissions)");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" (path not found; verify it exists)");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" (already exists; remove or choose a unique name)");
            }
            _ => {}
        }
    }

    msg
}

/// Adapter converting io::Error into anyhow::Error with op/path context
/// and a platform hint. Suitable for `.map_err(...)`.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// Copy file contents, then carry access/modified times over best-effort.
pub fn copy_file_with_times(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest).map_err(io_error_with_help("copy file", src))?;
    if let Ok(meta) = fs::metadata(src) {
        let atime = FileTime::from_last_access_time(&meta);
        let mtime = FileTime::from_last_modification_time(&meta);
        let _ = set_file_times(dest, atime, mtime);
    }
    Ok(())
}

/// Copy a directory tree. The top-level create uses `create_dir`, so an
/// already-existing destination directory is an error instead of a silent
/// merge.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir(dest).map_err(io_error_with_help("create dir", dest))?;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| anyhow!("walk '{}': {}", src.display(), e))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| anyhow!("strip prefix under '{}': {}", src.display(), e))?;
        let out = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&out).map_err(io_error_with_help("create dir", &out))?;
        } else {
            copy_file_with_times(entry.path(), &out)?;
        }
    }
    Ok(())
}

/// Move a file or directory. Tries an atomic rename first; on failure
/// (usually a cross-device move) falls back to copy then delete.
pub fn move_entry(src: &Path, dest: &Path) -> Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(
                src = %src.display(),
                dest = %dest.display(),
                error = %e,
                "rename failed, copying instead"
            );
            if src.is_dir() {
                copy_dir_recursive(src, dest)?;
                fs::remove_dir_all(src).map_err(io_error_with_help("remove dir", src))?;
            } else {
                copy_file_with_times(src, dest)?;
                fs::remove_file(src).map_err(io_error_with_help("remove file", src))?;
            }
            Ok(())
        }
    }
}

/// Remove a file or a whole directory tree.
pub fn remove_entry(path: &Path) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path).map_err(io_error_with_help("remove dir", path))
    } else {
        fs::remove_file(path).map_err(io_error_with_help("remove file", path))
    }
}
