//! Runtime Configuration Tests

use crate::common::*;
use tempfile::TempDir;
use vireo_engine::CONFIG_FILE_NAME;

#[test]
fn runtime_from_missing_config_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    let rt = Runtime::from_config_file(&path).unwrap();
    assert!(path.exists());
    assert_eq!(*rt.config(), RuntimeConfig::default());
}

#[test]
fn runtime_reads_worker_count() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "workers = 3\nchecked = false\n").unwrap();

    let rt = Runtime::from_config_file(&path).unwrap();
    assert_eq!(rt.config().workers, 3);
    assert!(!rt.config().checked);
    assert_eq!(rt.stats().worker_count, 3);
    rt.shutdown();
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "workers = \"many\"\n").unwrap();
    assert!(matches!(
        Runtime::from_config_file(&path),
        Err(Error::Config { .. })
    ));
}
