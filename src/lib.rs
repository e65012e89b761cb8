//! datesort: organize files and folders into date-named buckets.
//!
//! Pipeline: scan the source tree, classify entries against the configured
//! filters, plan one action per entry (destination bucket plus conflict
//! resolution), execute the actions sequentially, then journal the run so
//! the last one can be undone.

pub mod config;
pub mod errors;
pub mod journal;
pub mod organize;
pub mod output;

pub use config::{
    ConflictPolicy, DateBasis, FolderFormat, ItemMode, LogLevel, OperationMode, Settings,
};
pub use errors::OrganizeError;
pub use journal::{undo_last_run, write_run_log};
pub use organize::{ActionStatus, PlannedAction, execute_actions, plan_actions, scan};
