//! Action planning.
//!
//! Turns the scanned candidate list into a sequence of planned actions,
//! each carrying its resolved destination and a lifecycle status. Items
//! dropped by the skip policy stay in the plan as Skipped so the journal
//! records them.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::config::Settings;

use super::conflict::resolve_conflict;
use super::date::{date_bucket_target, extract_date};

/// Journal message attached to actions dropped by the skip policy.
pub const SKIP_MESSAGE: &str = "Skipped due to conflict policy.";

/// Lifecycle of one action, from planning through execution and undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Planned,
    Executed,
    Skipped,
    Failed,
    Undone,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionStatus::Planned => "planned",
            ActionStatus::Executed => "executed",
            ActionStatus::Skipped => "skipped",
            ActionStatus::Failed => "failed",
            ActionStatus::Undone => "undone",
        };
        f.write_str(s)
    }
}

/// One source entry and where it goes. Serialized field names match the
/// on-disk state snapshot format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedAction {
    #[serde(rename = "source_file")]
    pub source: PathBuf,
    #[serde(rename = "target_file")]
    pub target: PathBuf,
    pub status: ActionStatus,
    #[serde(rename = "error_message", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlannedAction {
    /// One-line progress form: "status: source -> target".
    pub fn progress_message(&self) -> String {
        format!(
            "{}: {} -> {}",
            self.status,
            self.source.display(),
            self.target.display()
        )
    }
}

/// Map each candidate to its date bucket and resolve naming conflicts.
/// Date extraction failures abort planning; nothing has touched the disk
/// yet, so the whole run can still be called off cleanly.
pub fn plan_actions(candidates: &[PathBuf], settings: &Settings) -> Result<Vec<PlannedAction>> {
    let mut actions = Vec::with_capacity(candidates.len());
    for source in candidates {
        let date = extract_date(source, settings.date_basis)?;
        let wanted = date_bucket_target(source, &date, settings)?;
        let action = match resolve_conflict(&wanted, settings.conflict_policy) {
            Some(target) => PlannedAction {
                source: source.clone(),
                target,
                status: ActionStatus::Planned,
                error: None,
            },
            None => PlannedAction {
                source: source.clone(),
                target: wanted,
                status: ActionStatus::Skipped,
                error: Some(SKIP_MESSAGE.to_string()),
            },
        };
        debug!(
            source = %action.source.display(),
            target = %action.target.display(),
            status = %action.status,
            "planned"
        );
        actions.push(action);
    }
    Ok(actions)
}
