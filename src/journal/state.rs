//! Run state snapshot.
//!
//! After every run a JSON snapshot of what happened is written next to the
//! audit log. Undo reads it back, replays it in reverse, then rewrites it
//! with the undo outcome so a second undo has nothing executed to revert.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OperationMode;
use crate::organize::PlannedAction;

/// Everything undo needs to know about the last run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunState {
    pub created_at: String,
    pub operation_mode: OperationMode,
    pub dry_run: bool,
    pub actions: Vec<PlannedAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undone_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undo_actions: Option<Vec<PlannedAction>>,
}

/// The snapshot lives next to the audit log: operation.log -> operation.state.json.
pub fn state_file_for(audit_log: &Path) -> PathBuf {
    audit_log.with_extension("state.json")
}

/// Local wall-clock timestamp at second precision, as stored in snapshots
/// and audit lines.
pub fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn write_state(state: &RunState, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create state directory '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(state).context("serialize run state")?;
    fs::write(path, json).with_context(|| format!("write state '{}'", path.display()))?;
    Ok(())
}

pub fn read_state(path: &Path) -> Result<RunState> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read state '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse state '{}'", path.display()))
}
