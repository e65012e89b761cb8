use assert_fs::TempDir;
use serial_test::serial;
use std::fs;

use datesort::LogLevel;
use datesort::config::{CONFIG_ENV, default_config_path, load_file_defaults};

#[test]
#[serial]
fn env_override_wins_over_platform_default() {
    let td = TempDir::new().unwrap();
    let cfg = fs::canonicalize(td.path()).unwrap().join("custom.xml");
    fs::write(
        &cfg,
        "<config>\n  <default_source>/srv/inbox</default_source>\n  <default_target>/srv/sorted</default_target>\n  <log_level>info</log_level>\n</config>\n",
    )
    .unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg);
    }

    let resolved = default_config_path().expect("default_config_path");
    assert_eq!(resolved, cfg, "config path should equal {CONFIG_ENV} value");

    let defaults = load_file_defaults().expect("defaults present");
    assert_eq!(
        defaults.source.as_deref(),
        Some(std::path::Path::new("/srv/inbox"))
    );
    assert_eq!(
        defaults.target.as_deref(),
        Some(std::path::Path::new("/srv/sorted"))
    );
    assert_eq!(defaults.log_level, Some(LogLevel::Info));

    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
}

#[test]
#[serial]
fn missing_override_file_yields_no_defaults() {
    let td = TempDir::new().unwrap();
    let cfg = td.path().join("nope.xml");

    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg);
    }

    assert!(load_file_defaults().is_none());

    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
}
