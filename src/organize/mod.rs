//! Organizing pipeline: scan, date, conflict, plan, execute.

pub mod classify;
pub mod conflict;
pub mod date;
pub mod execute;
pub mod fs_util;
pub mod plan;
pub mod scan;

pub use execute::execute_actions;
pub use plan::{ActionStatus, PlannedAction, SKIP_MESSAGE, plan_actions};
pub use scan::scan;
