use std::fs;
use tempfile::tempdir;

use datesort::organize::SKIP_MESSAGE;
use datesort::{ActionStatus, ConflictPolicy, Settings, plan_actions};

fn plan_target(settings: &Settings, file: &std::path::Path) -> std::path::PathBuf {
    plan_actions(&[file.to_path_buf()], settings).unwrap()[0]
        .target
        .clone()
}

#[test]
fn rename_policy_numbers_from_one() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dst = td.path().join("out");
    fs::create_dir_all(&src).unwrap();
    let file = src.join("photo.jpg");
    fs::write(&file, b"x").unwrap();

    let settings = Settings::new(&src, &dst);
    let wanted = plan_target(&settings, &file);
    fs::create_dir_all(wanted.parent().unwrap()).unwrap();
    fs::write(&wanted, b"occupied").unwrap();

    let actions = plan_actions(&[file], &settings).unwrap();
    assert_eq!(actions[0].status, ActionStatus::Planned);
    assert_eq!(actions[0].target.file_name().unwrap(), "photo (1).jpg");
}

#[test]
fn skip_policy_records_the_reason() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dst = td.path().join("out");
    fs::create_dir_all(&src).unwrap();
    let file = src.join("photo.jpg");
    fs::write(&file, b"x").unwrap();

    let mut settings = Settings::new(&src, &dst);
    settings.conflict_policy = ConflictPolicy::Skip;
    let wanted = plan_target(&settings, &file);
    fs::create_dir_all(wanted.parent().unwrap()).unwrap();
    fs::write(&wanted, b"occupied").unwrap();

    let actions = plan_actions(&[file], &settings).unwrap();
    assert_eq!(actions[0].status, ActionStatus::Skipped);
    assert_eq!(actions[0].error.as_deref(), Some(SKIP_MESSAGE));
    assert_eq!(actions[0].target, wanted);
}

#[test]
fn overwrite_policy_keeps_the_occupied_destination() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dst = td.path().join("out");
    fs::create_dir_all(&src).unwrap();
    let file = src.join("photo.jpg");
    fs::write(&file, b"x").unwrap();

    let mut settings = Settings::new(&src, &dst);
    settings.conflict_policy = ConflictPolicy::Overwrite;
    let wanted = plan_target(&settings, &file);
    fs::create_dir_all(wanted.parent().unwrap()).unwrap();
    fs::write(&wanted, b"occupied").unwrap();

    let actions = plan_actions(&[file], &settings).unwrap();
    assert_eq!(actions[0].status, ActionStatus::Planned);
    assert_eq!(actions[0].target, wanted);
}
