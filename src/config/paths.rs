//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/data paths and detects symlinked
//! ancestors so file logging never follows an attacker-controlled link.

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dirs::{config_dir, data_dir as os_data_dir};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "DATESORT_CONFIG";

/// Config path: $DATESORT_CONFIG if set, else OS config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(p));
    }
    let base = config_dir().context("could not determine an OS config directory")?;
    Ok(base.join("datesort").join("config.xml"))
}

/// Application data directory: holds the audit log and state snapshot.
/// Always excluded from scanning via Settings::protected_paths.
pub fn data_dir() -> Result<PathBuf> {
    let base = os_data_dir().context("could not determine an OS data directory")?;
    Ok(base.join("datesort"))
}

/// Default audit log path (the journal's append-only text log).
/// The state snapshot lives next to it with a `.state.json` extension.
pub fn default_audit_log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("operation.log"))
}

/// Default diagnostic (tracing) log file path.
pub fn default_log_path() -> Result<PathBuf> {
    let dir = data_dir()?;
    // ensure dir exists (best-effort)
    let _ = fs::create_dir_all(&dir);
    Ok(dir.join("datesort.log"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
