//! Runs in its own process: the global logger can only be installed once.

use std::fs;

use log::info;
use playlist_manager::logging::init_logging;

#[test]
fn one_timestamped_file_per_run() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    assert!(init_logging("loud", &log_dir).is_err());
    assert!(!log_dir.exists());

    let handle = init_logging("info", &log_dir).unwrap();
    info!("menu started for logging check");
    handle.flush();
    drop(handle);

    let files: Vec<String> = fs::read_dir(&log_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1, "{files:?}");
    let name = &files[0];
    assert!(name.starts_with("playlist_manager_"), "{name}");
    assert!(name.ends_with(".log"), "{name}");
    assert!(name.len() > "playlist_manager_.log".len(), "{name}");

    let contents = fs::read_to_string(log_dir.join(name)).unwrap();
    assert!(contents.contains("menu started for logging check"), "{contents}");
    assert!(contents.contains("logging initialized"), "{contents}");
    assert!(contents.contains("INFO"), "{contents}");
}
