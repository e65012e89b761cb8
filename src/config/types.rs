//! Core configuration types.
//! - Settings holds one run's parameters with safe defaults (dry-run on).
//! - Policy enums are closed variants; unknown spellings only exist at the
//!   CLI/config/state boundary, where parsing fails with UnsupportedValue.
//! - LogLevel represents console verbosity with simple parsing helpers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::OrganizeError;

/// What to do with each selected entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    #[default]
    Move,
    Copy,
}

impl OperationMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "move" => Some(OperationMode::Move),
            "copy" => Some(OperationMode::Copy),
            _ => None,
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationMode::Move => "move",
            OperationMode::Copy => "copy",
        })
    }
}

impl FromStr for OperationMode {
    type Err = OrganizeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| OrganizeError::UnsupportedValue {
            field: "operation mode",
            value: s.to_string(),
        })
    }
}

/// Which filesystem timestamp drives the destination bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateBasis {
    #[default]
    CreationTime,
    ModifiedTime,
}

impl DateBasis {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "creation" | "creation_time" | "created" | "ctime" => Some(DateBasis::CreationTime),
            "modified" | "modified_time" | "mtime" => Some(DateBasis::ModifiedTime),
            _ => None,
        }
    }
}

impl fmt::Display for DateBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateBasis::CreationTime => "creation_time",
            DateBasis::ModifiedTime => "modified_time",
        })
    }
}

impl FromStr for DateBasis {
    type Err = OrganizeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| OrganizeError::UnsupportedValue {
            field: "date basis",
            value: s.to_string(),
        })
    }
}

/// Shape of the date folder created under the target root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderFormat {
    /// One flat segment: `2026-08-27`
    #[default]
    FlatDay,
    /// Nested year/month/day: `2026/08/27`
    NestedDay,
}

impl FolderFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "flat" | "yyyy-mm-dd" => Some(FolderFormat::FlatDay),
            "nested" | "yyyy/mm/dd" => Some(FolderFormat::NestedDay),
            _ => None,
        }
    }
}

impl fmt::Display for FolderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FolderFormat::FlatDay => "YYYY-MM-DD",
            FolderFormat::NestedDay => "YYYY/MM/DD",
        })
    }
}

impl FromStr for FolderFormat {
    type Err = OrganizeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| OrganizeError::UnsupportedValue {
            field: "folder format",
            value: s.to_string(),
        })
    }
}

/// Rule for a destination path that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    Overwrite,
    Skip,
    #[default]
    AutoRename,
}

impl ConflictPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Some(ConflictPolicy::Overwrite),
            "skip" => Some(ConflictPolicy::Skip),
            "rename" | "auto_rename" | "auto-rename" => Some(ConflictPolicy::AutoRename),
            _ => None,
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictPolicy::Overwrite => "overwrite",
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::AutoRename => "auto_rename",
        })
    }
}

impl FromStr for ConflictPolicy {
    type Err = OrganizeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| OrganizeError::UnsupportedValue {
            field: "conflict policy",
            value: s.to_string(),
        })
    }
}

/// What kinds of entries the scanner may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemMode {
    #[default]
    Both,
    FilesOnly,
    FoldersOnly,
}

impl ItemMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "both" => Some(ItemMode::Both),
            "files" | "files_only" => Some(ItemMode::FilesOnly),
            "folders" | "folders_only" | "dirs" => Some(ItemMode::FoldersOnly),
            _ => None,
        }
    }
}

impl fmt::Display for ItemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemMode::Both => "both",
            ItemMode::FilesOnly => "files_only",
            ItemMode::FoldersOnly => "folders_only",
        })
    }
}

impl FromStr for ItemMode {
    type Err = OrganizeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| OrganizeError::UnsupportedValue {
            field: "item mode",
            value: s.to_string(),
        })
    }
}

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Parameters for one scan/plan/execute cycle. Immutable once handed to the engine.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory tree to organize
    pub source_path: PathBuf,
    /// Root under which date folders are created (may equal source)
    pub target_path: PathBuf,
    /// Walk the whole tree instead of immediate children only
    pub recursive: bool,
    pub operation_mode: OperationMode,
    pub date_basis: DateBasis,
    pub folder_format: FolderFormat,
    pub conflict_policy: ConflictPolicy,
    /// If true, confirm the plan without modifying the filesystem
    pub dry_run: bool,
    /// Comma-separated extension list, case-insensitive, dot optional ("jpg,.png")
    pub extension_filter: String,
    pub item_mode: ItemMode,
    /// Include dotfiles / platform-hidden entries
    pub include_hidden: bool,
    pub min_size_bytes: Option<u64>,
    pub max_size_bytes: Option<u64>,
    /// Paths the scanner must never select: the app's own data directory,
    /// the running executable, anything the caller wants shielded.
    pub protected_paths: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_path: PathBuf::new(),
            target_path: PathBuf::new(),
            recursive: false,
            operation_mode: OperationMode::Move,
            date_basis: DateBasis::CreationTime,
            folder_format: FolderFormat::FlatDay,
            conflict_policy: ConflictPolicy::AutoRename,
            // Safe by default; the CLI sets this explicitly from --dry-run.
            dry_run: true,
            extension_filter: String::new(),
            item_mode: ItemMode::Both,
            include_hidden: false,
            min_size_bytes: None,
            max_size_bytes: None,
            protected_paths: Vec::new(),
        }
    }
}

impl Settings {
    /// Construct settings with explicit source/target; other fields use defaults.
    pub fn new(source_path: impl Into<PathBuf>, target_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            ..Default::default()
        }
    }

    /// True when a file-level filter (extension or size) is active; directory
    /// selection is disabled in that case because moving a whole directory
    /// would bypass per-file filtering.
    pub fn file_filter_active(&self) -> bool {
        !self.extension_filter.trim().is_empty()
            || self.min_size_bytes.is_some()
            || self.max_size_bytes.is_some()
    }
}
