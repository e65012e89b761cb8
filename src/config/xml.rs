//! XML configuration support.
//! - Loads optional defaults from config.xml (quick_xml).
//! - Creates a template if missing (unless DATESORT_CONFIG is set).
//!
//! Notes:
//! - This module only reads/writes the config file; Settings validation
//!   happens elsewhere. CLI flags always win over file values.
//! - Unknown XML fields cause a hard failure to surface misconfigurations
//!   early instead of silently ignoring a typo.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{CONFIG_ENV, default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::LogLevel;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    default_source: Option<String>,
    default_target: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

/// Defaults read from the config file. All fields optional; CLI overrides.
#[derive(Debug, Default)]
pub struct FileDefaults {
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
}

fn non_empty_path(raw: Option<&str>) -> Option<PathBuf> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Read defaults from XML. DATESORT_CONFIG wins over the platform default
/// path. Returns None when the file is missing or holds nothing useful.
pub fn load_file_defaults() -> Option<FileDefaults> {
    let cfg_path = default_config_path().ok()?;
    if !cfg_path.exists() {
        return None;
    }

    let content = fs::read_to_string(&cfg_path).ok()?;
    let parsed: XmlConfig = match from_xml_str(&content) {
        Ok(x) => x,
        Err(e) => {
            // Fail hard on unknown field (serde deny_unknown_fields); else, log and return None.
            let msg = e.to_string();
            if msg.contains("unknown field") {
                panic!(
                    "Unknown field in datesort config {}: {}. Refusing to start.",
                    cfg_path.display(),
                    msg
                );
            }
            debug!(
                "Failed to parse config.xml at {}: {}",
                cfg_path.display(),
                msg
            );
            return None;
        }
    };

    let defaults = FileDefaults {
        source: non_empty_path(parsed.default_source.as_deref()),
        target: non_empty_path(parsed.default_target.as_deref()),
        log_level: parsed
            .log_level
            .as_deref()
            .and_then(|s| LogLevel::parse(s.trim())),
        log_file: non_empty_path(parsed.log_file.as_deref()),
    };

    if defaults.source.is_none()
        && defaults.target.is_none()
        && defaults.log_level.is_none()
        && defaults.log_file.is_none()
    {
        return None;
    }
    Some(defaults)
}

/// Load defaults from a specific XML file path.
pub fn load_file_defaults_from(path: &Path) -> Result<FileDefaults> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(FileDefaults {
        source: non_empty_path(parsed.default_source.as_deref()),
        target: non_empty_path(parsed.default_target.as_deref()),
        log_level: parsed
            .log_level
            .as_deref()
            .and_then(|s| LogLevel::parse(s.trim())),
        log_file: non_empty_path(parsed.log_file.as_deref()),
    })
}

/// Create the default template config file and parent directory.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        return Err(anyhow::anyhow!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/datesort.log".into());

    let content = format!(
        "<!--\n  datesort configuration (XML)\n\n  Fields (all optional):\n    default_source -> directory organized when no SOURCE argument is given\n    default_target -> directory receiving date folders when no TARGET argument is given\n    log_level      -> quiet | normal | info | debug\n    log_file       -> path to a diagnostic log file (stdout is still used)\n\n  Notes:\n    - CLI flags override XML values.\n    - The audit log and undo state are kept in the application data directory,\n      independent of this file.\n-->\n<config>\n  <default_source></default_source>\n  <default_target></default_target>\n  <log_level>normal</log_level>\n  <log_file>{suggested_log}</log_file>\n</config>\n"
    );

    fs::write(path, content)
        .with_context(|| format!("write template config '{}'", path.display()))?;
    info!("Created template config at {}", path.display());
    Ok(())
}

/// Create the default config if DATESORT_CONFIG is not set; return the
/// created path so the CLI can inform the user.
pub fn ensure_default_config_exists() -> Option<PathBuf> {
    if env::var_os(CONFIG_ENV).is_some() {
        return None;
    }

    let cfg_path = default_config_path().ok()?;
    if cfg_path.exists() {
        return None;
    }

    if let Ok(true) = path_has_symlink_ancestor(&cfg_path) {
        eprintln!(
            "Refusing to create template config because an existing ancestor is a symlink: {}",
            cfg_path.display()
        );
        return None;
    }

    match create_template_config(&cfg_path) {
        Ok(()) => Some(cfg_path),
        Err(e) => {
            eprintln!(
                "Failed to create template config at {}: {}",
                cfg_path.display(),
                e
            );
            None
        }
    }
}
