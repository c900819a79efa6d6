//! Test fixtures
//!
//! A Flutter app module manifest plus its `local.properties`.

use std::fs;
use std::path::{Path, PathBuf};

/// Directory of the time table app fixture
pub fn time_table_app_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/time_table_app")
}

/// Path to the fixture manifest
pub fn time_table_manifest() -> PathBuf {
    time_table_app_dir().join("build.toml")
}

/// Path to the fixture properties file
pub fn time_table_properties() -> PathBuf {
    time_table_app_dir().join("local.properties")
}

/// Copy the fixture manifest into `dir` (without its properties file)
pub fn copy_manifest_to(dir: &Path) -> PathBuf {
    let target = dir.join("build.toml");
    fs::copy(time_table_manifest(), &target).unwrap();
    target
}
