use chrono::Local;
use std::fs;
use tempfile::tempdir;

use datesort::{
    ActionStatus, DateBasis, FolderFormat, Settings, execute_actions, plan_actions, scan,
};

#[test]
fn move_run_relocates_files_into_date_buckets() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dst = td.path().join("out");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.txt"), b"alpha").unwrap();

    let mut settings = Settings::new(&src, &dst);
    settings.dry_run = false;
    settings.date_basis = DateBasis::ModifiedTime;

    let plan = plan_actions(&scan(&settings).unwrap(), &settings).unwrap();
    let done = execute_actions(plan, &settings, |_, _, _| {});

    assert_eq!(done[0].status, ActionStatus::Executed);
    assert!(!src.join("a.txt").exists());

    let bucket = dst.join(Local::now().format("%Y-%m-%d").to_string());
    assert_eq!(fs::read(bucket.join("a.txt")).unwrap(), b"alpha");
}

#[test]
fn nested_layout_builds_year_month_day_tree() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dst = td.path().join("out");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.txt"), b"alpha").unwrap();

    let mut settings = Settings::new(&src, &dst);
    settings.dry_run = false;
    settings.date_basis = DateBasis::ModifiedTime;
    settings.folder_format = FolderFormat::NestedDay;

    let plan = plan_actions(&scan(&settings).unwrap(), &settings).unwrap();
    let done = execute_actions(plan, &settings, |_, _, _| {});
    assert_eq!(done[0].status, ActionStatus::Executed);

    let now = Local::now();
    let bucket = dst
        .join(now.format("%Y").to_string())
        .join(now.format("%m").to_string())
        .join(now.format("%d").to_string());
    assert!(bucket.join("a.txt").exists());
}

#[test]
fn organizing_in_place_buckets_under_the_source() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.txt"), b"alpha").unwrap();

    // target == source is the organize-in-place case and must be accepted
    let mut settings = Settings::new(&src, &src);
    settings.dry_run = false;
    settings.date_basis = DateBasis::ModifiedTime;

    let plan = plan_actions(&scan(&settings).unwrap(), &settings).unwrap();
    let done = execute_actions(plan, &settings, |_, _, _| {});
    assert_eq!(done[0].status, ActionStatus::Executed);

    let bucket = src.join(Local::now().format("%Y-%m-%d").to_string());
    assert!(bucket.join("a.txt").exists());
    assert!(!src.join("a.txt").exists());
}
