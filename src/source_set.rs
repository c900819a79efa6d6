//! Source set directories
//!
//! The mapping is supplied by the toolchain and merged additively over the
//! Android defaults; nothing is discovered here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Source set name -> ordered, duplicate-free directory list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceSetMapping {
    sets: BTreeMap<String, Vec<PathBuf>>,
}

impl SourceSetMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default Java source directories of an Android module
    pub fn android_defaults() -> Self {
        let mut mapping = Self::new();
        mapping.add_dirs("main", ["src/main/java"]);
        mapping.add_dirs("test", ["src/test/java"]);
        mapping.add_dirs("androidTest", ["src/androidTest/java"]);
        mapping
    }

    /// Append directories to a source set, skipping ones already present
    pub fn add_dirs<I, P>(&mut self, name: &str, dirs: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let entry = self.sets.entry(name.to_string()).or_default();
        for dir in dirs {
            let dir = dir.into();
            if !entry.contains(&dir) {
                entry.push(dir);
            }
        }
    }

    /// Union `other` into `self`; existing directories keep their position
    pub fn merge(&mut self, other: &SourceSetMapping) {
        for (name, dirs) in &other.sets {
            self.add_dirs(name, dirs.iter().cloned());
        }
    }

    /// Defaults with `supplied` merged on top
    pub fn with_defaults(supplied: &SourceSetMapping) -> Self {
        let mut mapping = Self::android_defaults();
        mapping.merge(supplied);
        mapping
    }

    /// Directories of a source set (empty if unknown)
    pub fn dirs(&self, name: &str) -> &[PathBuf] {
        self.sets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_dir(&self, name: &str, dir: &Path) -> bool {
        self.dirs(name).iter().any(|d| d == dir)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, Vec<PathBuf>>> for SourceSetMapping {
    fn from(sets: BTreeMap<String, Vec<PathBuf>>) -> Self {
        let mut mapping = Self::new();
        for (name, dirs) in sets {
            mapping.add_dirs(&name, dirs);
        }
        mapping
    }
}
