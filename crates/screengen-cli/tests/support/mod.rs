#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("screengen");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env("USER", "qa");
    (command, temp_home)
}

/// Maven-style project under `home` with an existing screens package.
pub fn init_maven_project(home: &Path) -> (PathBuf, PathBuf) {
    let project = home.join("shop");
    let screens = project.join("src/main/java/com/shop/screens");
    fs::create_dir_all(&screens).expect("create screens dir");
    fs::write(project.join("pom.xml"), "<project/>\n").expect("write pom");
    (project, screens)
}

pub fn write_user_config(home: &Path, contents: &str) {
    let config_dir = home.join(".config").join("screengen");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(config_dir.join("config.toml"), contents).expect("write config");
}

pub fn assert_timestamp_log_names(entries: &[std::fs::DirEntry]) {
    assert!(!entries.is_empty(), "expected at least one diagnostics log");

    for entry in entries {
        let name = entry
            .file_name()
            .into_string()
            .expect("diagnostics filename utf8");
        assert!(
            name.ends_with(".log"),
            "diagnostics file should end with .log: {name}"
        );
        let stem = name
            .strip_suffix(".log")
            .expect("diagnostics filename .log suffix");
        assert!(
            !stem.is_empty() && stem.chars().all(|character| character.is_ascii_digit()),
            "diagnostics filename must be <timestamp>.log, got: {name}"
        );
    }
}
