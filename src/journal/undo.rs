//! Single-depth undo of the last run.
//!
//! Replays the state snapshot in reverse order. Moves go back to their
//! original location; copies are deleted. Date folders left empty by the
//! reversal are pruned, but only folders whose names look like date
//! buckets, so user directories are never removed. The snapshot is
//! rewritten with the undo outcome afterwards, which makes undo
//! single-depth: a second invocation is refused.

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

use regex::Regex;

use crate::errors::OrganizeError;
use crate::organize::fs_util::{io_error_with_help, move_entry, remove_entry};
use crate::organize::{ActionStatus, PlannedAction};

use super::state::{self, RunState, state_file_for, timestamp_now};
use super::{append_lines, log_line};
use crate::config::OperationMode;

static FULL_DATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static PART_DATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}$|^\d{4}$").unwrap());

fn is_date_like_dir_name(name: &str) -> bool {
    FULL_DATE_NAME.is_match(name) || PART_DATE_NAME.is_match(name)
}

/// Remove `dir` and its ancestors while they are empty date-bucket folders.
/// Stops at the first non-empty or non-date-named directory.
pub(crate) fn cleanup_empty_date_dirs(mut dir: &Path) {
    loop {
        if !dir.is_dir() {
            return;
        }
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        if !is_date_like_dir_name(name) {
            return;
        }
        match fs::read_dir(dir) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    return;
                }
            }
            Err(_) => return,
        }
        if fs::remove_dir(dir).is_err() {
            return;
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return,
        }
    }
}

/// Revert one executed action. Ok means the entry is back where it was
/// (or gone, for copies).
fn revert_one(action: &PlannedAction, mode: OperationMode) -> Result<()> {
    match mode {
        OperationMode::Move => {
            if action.target.exists() {
                if let Some(parent) = action.source.parent() {
                    fs::create_dir_all(parent)
                        .map_err(io_error_with_help("create dir", parent))?;
                }
                move_entry(&action.target, &action.source)?;
            } else {
                // Target already gone; nothing to move back, but the empty
                // bucket may still need pruning.
                warn!(
                    target = %action.target.display(),
                    "undo target missing, treating as already reverted"
                );
            }
        }
        OperationMode::Copy => {
            if action.target.exists() {
                remove_entry(&action.target)?;
            }
        }
    }
    Ok(())
}

/// Undo the run recorded in the snapshot next to `audit_log`. Returns the
/// per-action undo outcomes. Errors only when no snapshot exists or it
/// cannot be parsed; individual revert failures are captured per action.
pub fn undo_last_run(audit_log: &Path) -> Result<Vec<PlannedAction>> {
    let snapshot_path = state_file_for(audit_log);
    if !snapshot_path.exists() {
        return Err(OrganizeError::StateNotFound(snapshot_path).into());
    }
    let mut run = state::read_state(&snapshot_path)?;
    // Undo is single-depth. The snapshot keeps the original actions for the
    // record, so the marker is what prevents replaying them.
    if let Some(when) = &run.undone_at {
        return Err(OrganizeError::AlreadyUndone(when.clone()).into());
    }

    let mut undo_actions: Vec<PlannedAction> = Vec::with_capacity(run.actions.len());
    for action in run.actions.iter().rev() {
        let mut undone = action.clone();
        if action.status != ActionStatus::Executed {
            undo_actions.push(undone);
            continue;
        }

        match revert_one(action, run.operation_mode) {
            Ok(()) => {
                undone.status = ActionStatus::Undone;
                undone.error = None;
                if let Some(bucket) = action.target.parent() {
                    cleanup_empty_date_dirs(bucket);
                }
                info!(
                    source = %undone.source.display(),
                    target = %undone.target.display(),
                    "reverted"
                );
            }
            Err(e) => {
                // A failed revert leaves the target in place; do not prune
                // around an entry that is still there.
                undone.status = ActionStatus::Failed;
                undone.error = Some(format!("{e:#}"));
                warn!(
                    target = %action.target.display(),
                    error = %e,
                    "undo failed"
                );
            }
        }
        undo_actions.push(undone);
    }

    // Rewrite the snapshot even after partial failures so a repeat undo
    // does not replay actions that were already reverted.
    run.undone_at = Some(timestamp_now());
    run.undo_actions = Some(undo_actions.clone());
    state::write_state(&run, &snapshot_path)?;

    let mut lines = vec![
        log_line("INFO", "Undo run started"),
        log_line(
            "INFO",
            &format!("Mode={} Total={}", run.operation_mode, undo_actions.len()),
        ),
    ];
    for action in &undo_actions {
        let mut msg = format!(
            "{}: {} <- {}",
            action.status,
            action.source.display(),
            action.target.display()
        );
        let level = if action.status == ActionStatus::Failed {
            if let Some(err) = &action.error {
                msg.push_str(&format!(" | error={err}"));
            }
            "ERROR"
        } else {
            "INFO"
        };
        lines.push(log_line(level, &msg));
    }
    lines.push(log_line("INFO", "Undo run finished"));
    append_lines(audit_log, &lines)?;

    Ok(undo_actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn date_like_names_are_recognized() {
        assert!(is_date_like_dir_name("2024-03-07"));
        assert!(is_date_like_dir_name("2024"));
        assert!(is_date_like_dir_name("03"));
        assert!(!is_date_like_dir_name("photos"));
        assert!(!is_date_like_dir_name("202"));
        assert!(!is_date_like_dir_name("2024-3-7"));
    }

    #[test]
    fn cleanup_prunes_nested_empty_buckets() {
        let td = tempdir().unwrap();
        let target = td.path().join("sorted");
        let day = target.join("2024").join("03").join("07");
        fs::create_dir_all(&day).unwrap();

        cleanup_empty_date_dirs(&day);
        assert!(!target.join("2024").exists());
        assert!(target.exists());
    }

    #[test]
    fn cleanup_stops_at_occupied_bucket() {
        let td = tempdir().unwrap();
        let target = td.path().join("sorted");
        let month = target.join("2024").join("03");
        fs::create_dir_all(month.join("07")).unwrap();
        fs::write(month.join("keep.txt"), b"x").unwrap();

        cleanup_empty_date_dirs(&month.join("07"));
        assert!(!month.join("07").exists());
        assert!(month.exists());
    }

    #[test]
    fn missing_snapshot_is_a_typed_error() {
        let td = tempdir().unwrap();
        let audit = td.path().join("operation.log");
        let err = undo_last_run(&audit).unwrap_err();
        let typed = err.downcast_ref::<OrganizeError>().expect("typed error");
        assert_eq!(typed.kind(), "state_not_found");
    }

    #[test]
    fn move_undo_returns_entries_and_prunes_buckets() {
        let td = tempdir().unwrap();
        let src_dir = td.path().join("in");
        let bucket = td.path().join("out").join("2024-03-07");
        fs::create_dir_all(&src_dir).unwrap();
        fs::create_dir_all(&bucket).unwrap();
        let moved = bucket.join("a.txt");
        fs::write(&moved, b"data").unwrap();

        let audit = td.path().join("operation.log");
        let run = RunState {
            created_at: timestamp_now(),
            operation_mode: OperationMode::Move,
            dry_run: false,
            actions: vec![PlannedAction {
                source: src_dir.join("a.txt"),
                target: moved.clone(),
                status: ActionStatus::Executed,
                error: None,
            }],
            undone_at: None,
            undo_actions: None,
        };
        state::write_state(&run, &state_file_for(&audit)).unwrap();

        let outcome = undo_last_run(&audit).unwrap();
        assert_eq!(outcome[0].status, ActionStatus::Undone);
        assert_eq!(fs::read(src_dir.join("a.txt")).unwrap(), b"data");
        assert!(!bucket.exists());

        let rewritten = state::read_state(&state_file_for(&audit)).unwrap();
        assert!(rewritten.undone_at.is_some());
        assert_eq!(
            rewritten.undo_actions.unwrap()[0].status,
            ActionStatus::Undone
        );
    }

    #[test]
    fn failed_revert_leaves_the_target_and_its_bucket() {
        let td = tempdir().unwrap();
        let bucket = td.path().join("out").join("2024-03-07");
        fs::create_dir_all(&bucket).unwrap();
        let moved = bucket.join("a.txt");
        fs::write(&moved, b"data").unwrap();
        // a file where the source's parent directory should go blocks the
        // revert
        fs::write(td.path().join("blocker"), b"in the way").unwrap();

        let audit = td.path().join("operation.log");
        let run = RunState {
            created_at: timestamp_now(),
            operation_mode: OperationMode::Move,
            dry_run: false,
            actions: vec![PlannedAction {
                source: td.path().join("blocker").join("a.txt"),
                target: moved.clone(),
                status: ActionStatus::Executed,
                error: None,
            }],
            undone_at: None,
            undo_actions: None,
        };
        state::write_state(&run, &state_file_for(&audit)).unwrap();

        let outcome = undo_last_run(&audit).unwrap();
        assert_eq!(outcome[0].status, ActionStatus::Failed);
        assert!(outcome[0].error.is_some());
        assert!(moved.exists(), "target stays after a failed revert");
        assert!(bucket.exists(), "no pruning around a failed revert");
    }

    #[test]
    fn copy_undo_deletes_the_copy() {
        let td = tempdir().unwrap();
        let bucket = td.path().join("out").join("2024-03-07");
        fs::create_dir_all(&bucket).unwrap();
        let copied = bucket.join("a.txt");
        fs::write(&copied, b"data").unwrap();

        let audit = td.path().join("operation.log");
        let run = RunState {
            created_at: timestamp_now(),
            operation_mode: OperationMode::Copy,
            dry_run: false,
            actions: vec![PlannedAction {
                source: PathBuf::from("/in/a.txt"),
                target: copied.clone(),
                status: ActionStatus::Executed,
                error: None,
            }],
            undone_at: None,
            undo_actions: None,
        };
        state::write_state(&run, &state_file_for(&audit)).unwrap();

        let outcome = undo_last_run(&audit).unwrap();
        assert_eq!(outcome[0].status, ActionStatus::Undone);
        assert!(!copied.exists());
        assert!(!bucket.exists());
    }

    #[test]
    fn non_executed_actions_pass_through_unchanged() {
        let td = tempdir().unwrap();
        let audit = td.path().join("operation.log");
        let run = RunState {
            created_at: timestamp_now(),
            operation_mode: OperationMode::Move,
            dry_run: true,
            actions: vec![PlannedAction {
                source: PathBuf::from("/in/a.txt"),
                target: PathBuf::from("/out/2024-03-07/a.txt"),
                status: ActionStatus::Planned,
                error: None,
            }],
            undone_at: None,
            undo_actions: None,
        };
        state::write_state(&run, &state_file_for(&audit)).unwrap();

        let outcome = undo_last_run(&audit).unwrap();
        assert_eq!(outcome[0].status, ActionStatus::Planned);
    }
}
