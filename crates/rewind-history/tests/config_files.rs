#![forbid(unsafe_code)]

//! Loading [`RewindConfig`] from files on disk.
//!
//! Run:
//!   cargo test -p rewind-history --test config_files

use std::io::Write;

use rewind_history::{ConfigError, FnCommand, RewindConfig};
use tempfile::NamedTempFile;

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("rewind")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn toml_file_configures_both_engines() {
    let file = write_temp(
        ".toml",
        "[command]\nmax_depth = 2\n\n[snapshot]\nmax_depth = 5\n",
    );
    let config = RewindConfig::from_toml_file(file.path()).unwrap();

    let mut history = config.command_history();
    for name in ["a", "b", "c"] {
        history.add(Box::new(FnCommand::new(name).with_undo(|| Ok(()))));
    }
    let names: Vec<_> = history.iter().map(|c| c.describe()).collect();
    assert_eq!(names, ["b", "c"]);

    let snapshots = config.snapshot_history::<Level>();
    assert_eq!(snapshots.config().max_depth, 5);
}

#[test]
fn json_file() {
    let file = write_temp(".json", r#"{ "snapshot": { "max_depth": 12 } }"#);
    let config = RewindConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.snapshot.max_depth, 12);
    assert_eq!(config.command.max_depth, usize::MAX);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = RewindConfig::from_toml_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)), "got {err}");
    let err = RewindConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)), "got {err}");
}

#[test]
fn invalid_values_in_file_are_reported_together() {
    let file = write_temp(
        ".toml",
        "[command]\nmax_depth = 0\n\n[snapshot]\nmax_depth = 0\n",
    );
    let err = RewindConfig::from_toml_file(file.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation errors: command.max_depth must be > 0; snapshot.max_depth must be > 0"
    );
}

#[test]
fn saved_config_loads_back() {
    let config = RewindConfig::from_toml_str("[command]\nmax_depth = 300\n[snapshot]\nmax_depth = 40\n")
        .unwrap();
    let file = write_temp(".toml", &config.to_toml_string().unwrap());
    assert_eq!(RewindConfig::from_toml_file(file.path()).unwrap(), config);
}

#[test]
fn partial_file_saves_and_loads_back() {
    let file = write_temp(".toml", "[snapshot]\nmax_depth = 16\n");
    let config = RewindConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.command.max_depth, usize::MAX);

    let saved = write_temp(".toml", &config.to_toml_string().unwrap());
    let reloaded = RewindConfig::from_toml_file(saved.path()).unwrap();
    assert_eq!(reloaded, config);
}

/// Minimal snapshot type for building a typed history.
#[derive(PartialEq)]
struct Level;

impl rewind_history::Restorable for Level {
    type Error = std::convert::Infallible;

    fn restore(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}
