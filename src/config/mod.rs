//! Config module (modularized).
//! Provides the Settings type, policy enums, default paths, XML loading,
//! and validation. Re-exports keep the public API flat for callers.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{
    CONFIG_ENV, data_dir, default_audit_log_path, default_config_path, default_log_path,
    path_has_symlink_ancestor,
};
pub use types::{
    ConflictPolicy, DateBasis, FolderFormat, ItemMode, LogLevel, OperationMode, Settings,
};
pub use xml::{FileDefaults, create_template_config, ensure_default_config_exists,
    load_file_defaults};
