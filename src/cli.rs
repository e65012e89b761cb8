//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Policy flags are free-form strings here; parsing into the typed policy
//!   enums happens in app::run so one place reports bad values.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use datesort::LogLevel;

/// CLI wrapper for the datesort library.
/// CLI flags override config.xml defaults when both are present.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Organize files and folders into date-named directories"
)]
pub struct Args {
    /// Directory to organize. Falls back to default_source from config.xml.
    #[arg(value_name = "SOURCE", value_hint = ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Directory receiving the date folders. Falls back to default_target
    /// from config.xml.
    #[arg(value_name = "TARGET", value_hint = ValueHint::DirPath)]
    pub target: Option<PathBuf>,

    /// Descend into subdirectories instead of scanning one level.
    #[arg(short = 'r', long, help = "Scan the source tree recursively")]
    pub recursive: bool,

    /// Operation mode. One of: move, copy.
    #[arg(long, value_name = "MODE", help = "Operation: move or copy (default move)")]
    pub mode: Option<String>,

    /// Timestamp used for bucketing. One of: creation, modified.
    #[arg(
        long,
        value_name = "BASIS",
        help = "Date basis: creation or modified (default creation)"
    )]
    pub date_basis: Option<String>,

    /// Destination layout. One of: flat (YYYY-MM-DD), nested (YYYY/MM/DD).
    #[arg(
        long,
        value_name = "FORMAT",
        help = "Folder layout: flat or nested (default flat)"
    )]
    pub folder_format: Option<String>,

    /// What to do when the destination name is taken. One of: overwrite,
    /// skip, rename.
    #[arg(
        long,
        value_name = "POLICY",
        help = "Conflict policy: overwrite, skip, or rename (default rename)"
    )]
    pub on_conflict: Option<String>,

    /// Which entries to organize. One of: both, files, folders.
    #[arg(
        long,
        value_name = "ITEMS",
        help = "Item selection: both, files, or folders (default both)"
    )]
    pub items: Option<String>,

    /// Comma-separated extension filter, e.g. "jpg,png". Implies files-only.
    #[arg(long, value_name = "LIST", help = "Only organize files with these extensions")]
    pub extensions: Option<String>,

    /// Include dotfiles and platform-hidden entries.
    #[arg(long, help = "Include hidden files and directories")]
    pub include_hidden: bool,

    /// Minimum file size in bytes (files below are left alone).
    #[arg(long, value_name = "BYTES", help = "Skip files smaller than this")]
    pub min_size: Option<u64>,

    /// Maximum file size in bytes (files above are left alone).
    #[arg(long, value_name = "BYTES", help = "Skip files larger than this")]
    pub max_size: Option<u64>,

    /// Plan and report without touching the filesystem.
    #[arg(
        long,
        help = "Show what would be done, but do not modify files/directories"
    )]
    pub dry_run: bool,

    /// Skip the confirmation prompt before a live run.
    #[arg(short = 'y', long, help = "Do not ask for confirmation")]
    pub yes: bool,

    /// Revert the last recorded run, then exit.
    #[arg(long, help = "Undo the last run using the saved state snapshot")]
    pub undo: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where datesort will look for the config file (or DATESORT_CONFIG if set), then exit.
    #[arg(
        long,
        help = "Print the config file location used by datesort and exit"
    )]
    pub print_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }
}

pub fn parse() -> Args {
    Args::parse()
}
