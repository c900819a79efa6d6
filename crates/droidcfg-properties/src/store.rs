//! Property file parsing and the owning store.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Line prefixes that mark a comment.
const COMMENT_PREFIXES: &[char] = &['#', '!'];

/// Immutable string-to-string mapping parsed from `key=value` lines.
///
/// Ordered so that two loads of the same file compare (and serialize)
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyMap {
    entries: BTreeMap<String, String>,
}

impl PropertyMap {
    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse a single line into a key/value pair.
///
/// Returns `None` for blank lines, comments, lines without `=` and lines
/// with an empty key. The line is split at the first `=`; key and value are
/// trimmed.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIXES) {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key, value.trim()))
}

/// Parse properties text. Later duplicates replace earlier values.
pub fn parse(contents: &str) -> PropertyMap {
    let mut entries = BTreeMap::new();
    let mut skipped = 0usize;

    for line in contents.lines() {
        match parse_line(line) {
            Some((key, value)) => {
                entries.insert(key.to_string(), value.to_string());
            }
            None if line.trim().is_empty() => {}
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "skipped comment or malformed property lines");
    }

    PropertyMap { entries }
}

/// Provenance of a loaded store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySource {
    /// Path the store was loaded from
    pub path: PathBuf,

    /// Whether a readable file existed at `path`
    pub exists: bool,

    /// SHA-256 digest of the raw file bytes (None when nothing was read)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Owner of one run's [`PropertyMap`].
///
/// The map is only exposed through read-only lookups. A store has no
/// internal locking; every resolution run loads its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    map: PropertyMap,
    source: Option<PropertySource>,
}

impl PropertyStore {
    /// Load the properties file at `path`.
    ///
    /// Never fails: a missing or unreadable file yields an empty store.
    pub fn load(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "properties file not found, using empty map");
                return Self::empty_from(path);
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read properties file, using empty map"
                );
                return Self::empty_from(path);
            }
        };

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let map = parse(&String::from_utf8_lossy(&bytes));
        tracing::debug!(path = %path.display(), entries = map.len(), "loaded properties file");

        Self {
            map,
            source: Some(PropertySource {
                path: path.to_path_buf(),
                exists: true,
                digest: Some(digest),
            }),
        }
    }

    /// Build a store from in-memory properties text
    pub fn parse(contents: &str) -> Self {
        Self {
            map: parse(contents),
            source: None,
        }
    }

    fn empty_from(path: &Path) -> Self {
        Self {
            map: PropertyMap::default(),
            source: Some(PropertySource {
                path: path.to_path_buf(),
                exists: false,
                digest: None,
            }),
        }
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key)
    }

    /// Read-only view of the loaded map
    pub fn map(&self) -> &PropertyMap {
        &self.map
    }

    /// Where the properties came from (None for in-memory stores)
    pub fn source(&self) -> Option<&PropertySource> {
        self.source.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_line_basic() {
        assert_eq!(parse_line("flutter.sdk=/opt/flutter"), Some(("flutter.sdk", "/opt/flutter")));
        assert_eq!(parse_line("  key = value  "), Some(("key", "value")));
    }

    #[test]
    fn test_parse_line_splits_on_first_equals() {
        assert_eq!(parse_line("url=https://x?a=b"), Some(("url", "https://x?a=b")));
    }

    #[test]
    fn test_parse_line_skips_malformed() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("# flutter.sdk=/opt"), None);
        assert_eq!(parse_line("! comment=yes"), None);
        assert_eq!(parse_line("no separator here"), None);
        assert_eq!(parse_line("=orphan"), None);
    }

    #[test]
    fn test_parse_line_empty_value() {
        assert_eq!(parse_line("key="), Some(("key", "")));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let map = parse("a=1\nb=2\na=3\n");
        assert_eq!(map.get("a"), Some("3"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_parse_mixed_content() {
        let map = parse(
            "## This file is generated\n\
             sdk.dir=/home/dev/Android/Sdk\n\
             garbage line\n\
             \n\
             flutter.sdk=/home/dev/flutter\n\
             flutter.buildMode=debug\n",
        );

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("sdk.dir"), Some("/home/dev/Android/Sdk"));
        assert_eq!(map.get("flutter.buildMode"), Some("debug"));
        assert!(!map.contains_key("garbage line"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = PropertyStore::load(&dir.path().join("local.properties"));

        assert!(store.map().is_empty());
        let source = store.source().unwrap();
        assert!(!source.exists);
        assert!(source.digest.is_none());
    }

    #[test]
    fn test_load_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = PropertyStore::load(dir.path());

        assert!(store.map().is_empty());
    }

    #[test]
    fn test_load_twice_is_equal() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "flutter.sdk=/opt/flutter").unwrap();
        writeln!(temp, "broken").unwrap();
        writeln!(temp, "sdk.dir=/opt/android").unwrap();

        let first = PropertyStore::load(temp.path());
        let second = PropertyStore::load(temp.path());

        assert_eq!(first, second);
        assert_eq!(first.map().len(), 2);
        assert_eq!(first.source().unwrap().digest.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn test_load_invalid_utf8_is_lossy() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"name=caf\xe9\nok=yes\n").unwrap();

        let store = PropertyStore::load(temp.path());
        assert_eq!(store.get("ok"), Some("yes"));
        assert!(store.get("name").is_some());
    }

    #[test]
    fn test_in_memory_store_has_no_source() {
        let store = PropertyStore::parse("a=b");
        assert_eq!(store.get("a"), Some("b"));
        assert!(store.source().is_none());
    }

    mod prop {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_never_panics_and_keys_are_trimmed(contents in "[ -~\\n\\t]{0,200}") {
                let map = parse(&contents);
                for (key, value) in map.iter() {
                    prop_assert!(!key.is_empty());
                    prop_assert_eq!(key, key.trim());
                    prop_assert_eq!(value, value.trim());
                }
            }

            #[test]
            fn parse_is_deterministic(contents in "[a-z=#! \\n]{0,120}") {
                prop_assert_eq!(parse(&contents), parse(&contents));
            }
        }
    }
}
