//! Application orchestration for the binary.
//!
//! Wires CLI arguments and config.xml defaults into Settings, runs the
//! scan/plan/execute pipeline on a worker thread, and relays progress
//! events back to the console on the main thread. Undo runs in-line since
//! it reads a snapshot rather than walking a tree.

use anyhow::{Context, Result, anyhow};
use crossbeam_channel::unbounded;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use tracing::{error, info};

use datesort::config::{
    data_dir, default_audit_log_path, default_config_path, ensure_default_config_exists,
    load_file_defaults,
};
use datesort::output as out;
use datesort::{
    ActionStatus, ConflictPolicy, DateBasis, FolderFormat, ItemMode, LogLevel, OperationMode,
    OrganizeError, PlannedAction, Settings, execute_actions, plan_actions, scan, undo_last_run,
    write_run_log,
};

use crate::cli::Args;
use crate::logging;

/// Messages from the executor thread to the console loop.
enum Event {
    Progress {
        done: usize,
        total: usize,
        message: String,
    },
    Done(Result<Vec<PlannedAction>>),
}

pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        return print_config_location();
    }

    if let Some(created) = ensure_default_config_exists() {
        out::print_info(&format!(
            "Created a template config at {}",
            created.display()
        ));
    }
    let defaults = load_file_defaults().unwrap_or_default();

    let level = args
        .effective_log_level()
        .or(defaults.log_level)
        .unwrap_or(LogLevel::Normal);
    // Guard must live for the whole run so the file appender flushes.
    let _guard = logging::init_tracing(&level, defaults.log_file.as_deref(), args.json)?;

    let result = if args.undo {
        run_undo()
    } else {
        run_organize(&args, defaults.source, defaults.target)
    };
    if let Err(e) = &result {
        report_failure(e);
    }
    result
}

fn print_config_location() -> Result<()> {
    let path = default_config_path()?;
    let state = if path.exists() { "exists" } else { "missing" };
    out::print_user(&format!("{} ({state})", path.display()));
    Ok(())
}

fn run_undo() -> Result<()> {
    let audit_log = default_audit_log_path()?;
    let outcomes = undo_last_run(&audit_log)?;

    let mut undone = 0usize;
    let mut failed = 0usize;
    for action in &outcomes {
        match action.status {
            ActionStatus::Undone => {
                undone += 1;
                out::print_user(&format!(
                    "undone: {} <- {}",
                    action.source.display(),
                    action.target.display()
                ));
            }
            ActionStatus::Failed => {
                failed += 1;
                out::print_error(&format!(
                    "failed to undo {}: {}",
                    action.target.display(),
                    action.error.as_deref().unwrap_or("unknown error")
                ));
            }
            _ => {}
        }
    }
    if failed > 0 {
        out::print_warn(&format!("Undo finished: {undone} reverted, {failed} failed"));
    } else {
        out::print_success(&format!("Undo finished: {undone} reverted"));
    }
    Ok(())
}

/// Parse an optional policy flag, falling back to the policy's default.
fn policy_or_default<T>(raw: Option<&str>) -> Result<T>
where
    T: FromStr<Err = OrganizeError> + Default,
{
    match raw {
        Some(s) => Ok(s.parse::<T>()?),
        None => Ok(T::default()),
    }
}

fn build_settings(
    args: &Args,
    default_source: Option<PathBuf>,
    default_target: Option<PathBuf>,
) -> Result<Settings> {
    let source = args
        .source
        .clone()
        .or(default_source)
        .ok_or_else(|| anyhow!("no source directory given (argument or config.xml)"))?;
    let target = args
        .target
        .clone()
        .or(default_target)
        .ok_or_else(|| anyhow!("no target directory given (argument or config.xml)"))?;

    let mut settings = Settings::new(source, target);
    settings.recursive = args.recursive;
    settings.operation_mode = policy_or_default::<OperationMode>(args.mode.as_deref())?;
    settings.date_basis = policy_or_default::<DateBasis>(args.date_basis.as_deref())?;
    settings.folder_format = policy_or_default::<FolderFormat>(args.folder_format.as_deref())?;
    settings.conflict_policy = policy_or_default::<ConflictPolicy>(args.on_conflict.as_deref())?;
    settings.item_mode = policy_or_default::<ItemMode>(args.items.as_deref())?;
    settings.dry_run = args.dry_run;
    settings.extension_filter = args.extensions.clone().unwrap_or_default();
    settings.include_hidden = args.include_hidden;
    settings.min_size_bytes = args.min_size;
    settings.max_size_bytes = args.max_size;

    // The journal and the running binary must never be organized away.
    if let Ok(dir) = data_dir() {
        settings.protected_paths.push(dir);
    }
    if let Ok(exe) = std::env::current_exe() {
        settings.protected_paths.push(exe);
    }

    settings.validate()?;
    Ok(settings)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().context("flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read confirmation")?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn run_organize(
    args: &Args,
    default_source: Option<PathBuf>,
    default_target: Option<PathBuf>,
) -> Result<()> {
    let settings = build_settings(args, default_source, default_target)?;

    let candidates = scan(&settings)?;
    let plan = plan_actions(&candidates, &settings)?;
    if plan.is_empty() {
        out::print_info("Nothing to organize.");
        return Ok(());
    }

    let to_execute = plan
        .iter()
        .filter(|a| a.status == ActionStatus::Planned)
        .count();
    let skipped = plan.len() - to_execute;
    out::print_info(&format!(
        "Planned {} actions ({} to {}, {} skipped){}",
        plan.len(),
        to_execute,
        settings.operation_mode,
        skipped,
        if settings.dry_run { " [dry run]" } else { "" }
    ));

    if !settings.dry_run
        && !args.yes
        && atty::is(atty::Stream::Stdin)
        && !confirm(&format!(
            "Proceed with {} of {} items?",
            settings.operation_mode, to_execute
        ))?
    {
        out::print_info("Aborted.");
        return Ok(());
    }

    let audit_log = default_audit_log_path()?;
    let started = std::time::Instant::now();
    let (tx, rx) = unbounded::<Event>();
    let worker_settings = settings.clone();
    let worker_log = audit_log.clone();
    let worker = thread::spawn(move || {
        let done = execute_actions(plan, &worker_settings, |done, total, message| {
            let _ = tx.send(Event::Progress {
                done,
                total,
                message: message.to_string(),
            });
        });
        let result = write_run_log(&done, &worker_log, &worker_settings).map(|()| done);
        let _ = tx.send(Event::Done(result));
    });

    let mut outcome: Option<Vec<PlannedAction>> = None;
    for event in rx {
        match event {
            Event::Progress {
                done,
                total,
                message,
            } => out::print_progress(done, total, &message),
            Event::Done(result) => {
                outcome = Some(result?);
                break;
            }
        }
    }
    worker
        .join()
        .map_err(|_| anyhow!("executor thread panicked"))?;
    let outcome = outcome.ok_or_else(|| anyhow!("executor finished without a result"))?;

    let executed = count(&outcome, ActionStatus::Executed);
    let failed = count(&outcome, ActionStatus::Failed);
    let skipped = count(&outcome, ActionStatus::Skipped);
    let elapsed = started.elapsed();
    info!(executed, skipped, failed, ?elapsed, dry_run = settings.dry_run, "run complete");
    if settings.dry_run {
        out::print_success(&format!(
            "Dry run complete: {} actions planned, {skipped} skipped",
            count(&outcome, ActionStatus::Planned)
        ));
    } else if failed > 0 {
        out::print_warn(&format!(
            "Run complete in {elapsed:.1?}: {executed} done, {skipped} skipped, {failed} failed (see {})",
            audit_log.display()
        ));
    } else {
        out::print_success(&format!(
            "Run complete in {elapsed:.1?}: {executed} done, {skipped} skipped"
        ));
    }
    Ok(())
}

fn count(actions: &[PlannedAction], status: ActionStatus) -> usize {
    actions.iter().filter(|a| a.status == status).count()
}

/// Log the failure with a stable kind when it is one of ours, then print a
/// user-facing line.
fn report_failure(e: &anyhow::Error) {
    if let Some(typed) = e.downcast_ref::<OrganizeError>() {
        error!(kind = typed.kind(), error = %typed, "run failed");
    } else {
        error!(error = %e, "run failed");
    }
    out::print_error(&format!("{e:#}"));
}
