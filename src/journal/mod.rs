//! Run journal: append-only audit log plus the undo state snapshot.
//!
//! Audit lines are plain text, one per event:
//!   2024-03-07T12:00:00 | INFO | executed: /in/a.txt -> /out/2024-03-07/a.txt
//! Failed actions log at ERROR with the error appended. The snapshot format
//! lives in `state`.

pub mod state;
pub mod undo;

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::config::Settings;
use crate::organize::{ActionStatus, PlannedAction};

pub use state::{RunState, state_file_for, timestamp_now};
pub use undo::undo_last_run;

fn log_line(level: &str, msg: &str) -> String {
    format!("{} | {} | {}", timestamp_now(), level, msg)
}

fn append_lines(path: &Path, lines: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log directory '{}'", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("open audit log '{}'", path.display()))?;
    let mut block = lines.join("\n");
    block.push('\n');
    file.write_all(block.as_bytes())
        .with_context(|| format!("append to audit log '{}'", path.display()))?;
    Ok(())
}

/// Record a finished run: rewrite the state snapshot and append the audit
/// block for every action.
pub fn write_run_log(
    actions: &[PlannedAction],
    audit_log: &Path,
    settings: &Settings,
) -> Result<()> {
    let snapshot = RunState {
        created_at: timestamp_now(),
        operation_mode: settings.operation_mode,
        dry_run: settings.dry_run,
        actions: actions.to_vec(),
        undone_at: None,
        undo_actions: None,
    };
    state::write_state(&snapshot, &state_file_for(audit_log))?;

    let mut lines = vec![
        log_line("INFO", "Operation run started"),
        log_line(
            "INFO",
            &format!(
                "Mode={} DryRun={} Total={}",
                settings.operation_mode,
                settings.dry_run,
                actions.len()
            ),
        ),
    ];
    for action in actions {
        let mut msg = action.progress_message();
        let level = if action.status == ActionStatus::Failed {
            if let Some(err) = &action.error {
                msg.push_str(&format!(" | error={err}"));
            }
            "ERROR"
        } else {
            if action.status == ActionStatus::Skipped
                && let Some(err) = &action.error
            {
                msg.push_str(&format!(" | {err}"));
            }
            "INFO"
        };
        lines.push(log_line(level, &msg));
    }
    lines.push(log_line("INFO", "Operation run finished"));
    append_lines(audit_log, &lines)
}
