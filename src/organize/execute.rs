//! Sequential action execution.
//!
//! Runs planned actions one at a time, in order, reporting progress after
//! each item through a caller-supplied callback. A failing item marks its
//! action Failed and execution continues with the next one; the run as a
//! whole never aborts over a single item.

use anyhow::Result;
use std::fs;
use tracing::{info, warn};

use crate::config::{ConflictPolicy, OperationMode, Settings};

use super::fs_util::{
    copy_dir_recursive, copy_file_with_times, io_error_with_help, move_entry, remove_entry,
};
use super::plan::{ActionStatus, PlannedAction};

/// Execute the plan. The progress callback receives (done, total, message)
/// after every item, including skipped ones.
pub fn execute_actions<F>(
    mut actions: Vec<PlannedAction>,
    settings: &Settings,
    mut progress: F,
) -> Vec<PlannedAction>
where
    F: FnMut(usize, usize, &str),
{
    let total = actions.len();
    for (i, action) in actions.iter_mut().enumerate() {
        if action.status == ActionStatus::Skipped {
            progress(i + 1, total, &action.progress_message());
            continue;
        }

        match run_one(action, settings) {
            Ok(status) => {
                action.status = status;
                info!(
                    source = %action.source.display(),
                    target = %action.target.display(),
                    status = %action.status,
                    "action done"
                );
            }
            Err(e) => {
                action.status = ActionStatus::Failed;
                action.error = Some(format!("{e:#}"));
                warn!(
                    source = %action.source.display(),
                    error = %e,
                    "action failed"
                );
            }
        }
        progress(i + 1, total, &action.progress_message());
    }
    actions
}

/// Perform one action and report the status it should end up in.
/// Dry runs do no I/O and leave the action Planned.
fn run_one(action: &PlannedAction, settings: &Settings) -> Result<ActionStatus> {
    if settings.dry_run {
        return Ok(ActionStatus::Planned);
    }

    if let Some(parent) = action.target.parent() {
        fs::create_dir_all(parent).map_err(io_error_with_help("create dir", parent))?;
    }

    // Only the overwrite policy may clear an occupied destination. Under
    // skip/auto-rename a target that appeared after planning stays; the
    // move or copy below then fails the item instead of destroying it.
    if settings.conflict_policy == ConflictPolicy::Overwrite && action.target.exists() {
        remove_entry(&action.target)?;
    }

    match settings.operation_mode {
        OperationMode::Move => move_entry(&action.source, &action.target)?,
        OperationMode::Copy => {
            if action.source.is_dir() {
                copy_dir_recursive(&action.source, &action.target)?;
            } else {
                copy_file_with_times(&action.source, &action.target)?;
            }
        }
    }
    Ok(ActionStatus::Executed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConflictPolicy;
    use crate::organize::plan::plan_actions;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn setup(dry_run: bool, mode: OperationMode) -> (tempfile::TempDir, Settings, PathBuf) {
        let td = tempdir().unwrap();
        let src = td.path().join("in");
        let dst = td.path().join("out");
        fs::create_dir_all(&src).unwrap();
        let file = src.join("a.txt");
        fs::write(&file, b"payload").unwrap();
        let mut settings = Settings::new(&src, &dst);
        settings.dry_run = dry_run;
        settings.operation_mode = mode;
        (td, settings, file)
    }

    #[test]
    fn dry_run_touches_nothing() {
        let (_td, settings, file) = setup(true, OperationMode::Move);
        let plan = plan_actions(&[file.clone()], &settings).unwrap();
        let done = execute_actions(plan, &settings, |_, _, _| {});
        assert_eq!(done[0].status, ActionStatus::Planned);
        assert!(file.exists());
        assert!(!done[0].target.exists());
    }

    #[test]
    fn move_transfers_the_file() {
        let (_td, settings, file) = setup(false, OperationMode::Move);
        let plan = plan_actions(&[file.clone()], &settings).unwrap();
        let done = execute_actions(plan, &settings, |_, _, _| {});
        assert_eq!(done[0].status, ActionStatus::Executed);
        assert!(!file.exists());
        assert_eq!(fs::read(&done[0].target).unwrap(), b"payload");
    }

    #[test]
    fn copy_leaves_the_source() {
        let (_td, settings, file) = setup(false, OperationMode::Copy);
        let plan = plan_actions(&[file.clone()], &settings).unwrap();
        let done = execute_actions(plan, &settings, |_, _, _| {});
        assert_eq!(done[0].status, ActionStatus::Executed);
        assert!(file.exists());
        assert_eq!(fs::read(&done[0].target).unwrap(), b"payload");
    }

    #[test]
    fn overwrite_replaces_existing_destination() {
        let (_td, mut settings, file) = setup(false, OperationMode::Move);
        settings.conflict_policy = ConflictPolicy::Overwrite;
        let probe = plan_actions(&[file.clone()], &settings).unwrap();
        fs::create_dir_all(probe[0].target.parent().unwrap()).unwrap();
        fs::write(&probe[0].target, b"stale").unwrap();

        let plan = plan_actions(&[file], &settings).unwrap();
        let done = execute_actions(plan, &settings, |_, _, _| {});
        assert_eq!(done[0].status, ActionStatus::Executed);
        assert_eq!(fs::read(&done[0].target).unwrap(), b"payload");
    }

    #[test]
    fn non_overwrite_policies_never_remove_an_occupied_destination() {
        let (_td, mut settings, file) = setup(false, OperationMode::Move);
        settings.conflict_policy = ConflictPolicy::Skip;
        let plan = plan_actions(&[file.clone()], &settings).unwrap();
        assert_eq!(plan[0].status, ActionStatus::Planned);

        // a directory with content appears at the target between planning
        // and execution
        let occupied = plan[0].target.clone();
        fs::create_dir_all(occupied.join("keep")).unwrap();
        fs::write(occupied.join("keep").join("precious.txt"), b"keep me").unwrap();

        let done = execute_actions(plan, &settings, |_, _, _| {});
        assert_eq!(done[0].status, ActionStatus::Failed);
        assert!(file.exists(), "source must survive the failed move");
        assert_eq!(
            fs::read(occupied.join("keep").join("precious.txt")).unwrap(),
            b"keep me"
        );
    }

    #[test]
    fn failure_is_isolated_to_its_item() {
        let (_td, settings, file) = setup(false, OperationMode::Move);
        let mut plan = plan_actions(&[file.clone()], &settings).unwrap();
        // a second action whose source vanished before execution
        let mut ghost = plan[0].clone();
        ghost.source = file.parent().unwrap().join("ghost.txt");
        ghost.target = plan[0].target.parent().unwrap().join("ghost.txt");
        plan.insert(0, ghost);

        let done = execute_actions(plan, &settings, |_, _, _| {});
        assert_eq!(done[0].status, ActionStatus::Failed);
        assert!(done[0].error.is_some());
        assert_eq!(done[1].status, ActionStatus::Executed);
    }

    #[test]
    fn progress_counts_every_item() {
        let (_td, settings, file) = setup(true, OperationMode::Move);
        let plan = plan_actions(&[file], &settings).unwrap();
        let mut seen = Vec::new();
        execute_actions(plan, &settings, |done, total, msg| {
            seen.push((done, total, msg.to_string()));
        });
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, 1);
        assert_eq!(seen[0].1, 1);
        assert!(seen[0].2.starts_with("planned: "));
    }
}
