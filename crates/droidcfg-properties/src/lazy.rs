//! Deferred, memoized property evaluation.
//!
//! A [`LazyValue`] moves through `Unevaluated -> Present | Absent` exactly
//! once, on first read. Absence is cached like any other outcome.

use std::cell::{Cell, OnceCell};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::store::PropertyStore;

/// Observable state of a lazy value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyState {
    /// Lookup has not run yet
    Unevaluated,
    /// Lookup ran and produced a value
    Present,
    /// Lookup ran and produced nothing
    Absent,
}

/// A required property was never set.
///
/// Only produced by consumers that demand a value (see
/// [`LazyProperty::require`]); reading an absent value is not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("required property '{key}' is not set")]
pub struct AbsentProperty {
    pub key: String,
}

/// Memoizing accessor around a zero-argument lookup.
///
/// Not `Sync`: one value belongs to one resolution run.
pub struct LazyValue<T, F = Box<dyn FnOnce() -> Option<T>>> {
    cell: OnceCell<Option<T>>,
    lookup: Cell<Option<F>>,
}

impl<T, F> LazyValue<T, F>
where
    F: FnOnce() -> Option<T>,
{
    pub fn new(lookup: F) -> Self {
        Self {
            cell: OnceCell::new(),
            lookup: Cell::new(Some(lookup)),
        }
    }

    /// Read the value, running the lookup on first access only.
    pub fn get(&self) -> Option<&T> {
        self.cell
            .get_or_init(|| self.lookup.take().and_then(|lookup| lookup()))
            .as_ref()
    }

    /// Current state, without forcing evaluation
    pub fn state(&self) -> LazyState {
        match self.cell.get() {
            None => LazyState::Unevaluated,
            Some(Some(_)) => LazyState::Present,
            Some(None) => LazyState::Absent,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: fmt::Debug, F> fmt::Debug for LazyValue<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            None => f.write_str("LazyValue(<unevaluated>)"),
            Some(value) => f.debug_tuple("LazyValue").field(value).finish(),
        }
    }
}

/// A lazily read string property, remembering its key.
pub struct LazyProperty {
    key: String,
    value: LazyValue<String>,
}

impl LazyProperty {
    /// Wrap an arbitrary lookup for `key`
    pub fn new(key: impl Into<String>, lookup: impl FnOnce() -> Option<String> + 'static) -> Self {
        let lookup: Box<dyn FnOnce() -> Option<String>> = Box::new(lookup);
        Self {
            key: key.into(),
            value: LazyValue::new(lookup),
        }
    }

    /// Read `key` from an already loaded store on first demand
    pub fn from_store(store: Rc<PropertyStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let lookup_key = key.clone();
        Self::new(key, move || store.get(&lookup_key).map(str::to_owned))
    }

    /// Defer the file read itself until first demand
    pub fn from_file(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        let path = path.into();
        let key = key.into();
        let lookup_key = key.clone();
        Self::new(key, move || {
            PropertyStore::load(&path)
                .get(&lookup_key)
                .map(str::to_owned)
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the value; `None` means the key is absent
    pub fn get(&self) -> Option<&str> {
        self.value.get().map(String::as_str)
    }

    /// Read the value, treating absence as an error
    pub fn require(&self) -> Result<&str, AbsentProperty> {
        self.get().ok_or_else(|| AbsentProperty {
            key: self.key.clone(),
        })
    }

    pub fn state(&self) -> LazyState {
        self.value.state()
    }
}

impl PropertyStore {
    /// Lazy accessor for `key` backed by this shared store
    pub fn lazy(self: &Rc<Self>, key: impl Into<String>) -> LazyProperty {
        LazyProperty::from_store(Rc::clone(self), key)
    }
}

impl fmt::Debug for LazyProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyProperty")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn counting<T: Clone + 'static>(value: Option<T>) -> (Rc<Cell<u32>>, impl FnOnce() -> Option<T>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let lookup = move || {
            counter.set(counter.get() + 1);
            value
        };
        (calls, lookup)
    }

    #[test]
    fn test_lookup_runs_once() {
        let (calls, lookup) = counting(Some("/opt/flutter".to_string()));
        let lazy = LazyValue::new(lookup);

        assert_eq!(calls.get(), 0);
        assert_eq!(lazy.state(), LazyState::Unevaluated);

        for _ in 0..5 {
            assert_eq!(lazy.get().map(String::as_str), Some("/opt/flutter"));
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(lazy.state(), LazyState::Present);
    }

    #[test]
    fn test_absent_is_cached() {
        let (calls, lookup) = counting::<String>(None);
        let lazy = LazyValue::new(lookup);

        assert!(lazy.get().is_none());
        assert!(lazy.get().is_none());
        assert_eq!(calls.get(), 1);
        assert_eq!(lazy.state(), LazyState::Absent);
        assert!(lazy.is_evaluated());
    }

    #[test]
    fn test_never_read_never_runs() {
        let (calls, lookup) = counting(Some(1u32));
        let lazy = LazyValue::new(lookup);
        drop(lazy);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_debug_does_not_force() {
        let (calls, lookup) = counting(Some(7u32));
        let lazy = LazyValue::new(lookup);

        assert_eq!(format!("{:?}", lazy), "LazyValue(<unevaluated>)");
        assert_eq!(calls.get(), 0);
        lazy.get();
        assert_eq!(format!("{:?}", lazy), "LazyValue(Some(7))");
    }

    #[test]
    fn test_property_from_store() {
        let store = Rc::new(PropertyStore::parse("flutter.sdk=/opt/flutter"));
        let sdk = LazyProperty::from_store(Rc::clone(&store), "flutter.sdk");
        let missing = LazyProperty::from_store(store, "sdk.dir");

        assert_eq!(sdk.get(), Some("/opt/flutter"));
        assert_eq!(sdk.require(), Ok("/opt/flutter"));
        assert_eq!(missing.get(), None);
        assert_eq!(
            missing.require(),
            Err(AbsentProperty {
                key: "sdk.dir".to_string()
            })
        );
        assert_eq!(missing.state(), LazyState::Absent);
    }

    #[test]
    fn test_store_lazy_shares_store() {
        let store = Rc::new(PropertyStore::parse("flutter.sdk=/opt/flutter\nsdk.dir=/opt/android"));
        let flutter = store.lazy("flutter.sdk");
        let android = store.lazy("sdk.dir");

        assert_eq!(Rc::strong_count(&store), 3);
        assert_eq!(flutter.key(), "flutter.sdk");
        assert_eq!(flutter.get(), Some("/opt/flutter"));
        assert_eq!(android.get(), Some("/opt/android"));
    }

    #[test]
    fn test_property_from_file_defers_read() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "flutter.sdk=/before").unwrap();

        let sdk = LazyProperty::from_file(temp.path(), "flutter.sdk");
        assert_eq!(sdk.state(), LazyState::Unevaluated);

        // The file is first read here, so the rewrite is visible.
        std::fs::write(temp.path(), "flutter.sdk=/after\n").unwrap();
        assert_eq!(sdk.get(), Some("/after"));

        // Cached from now on.
        std::fs::write(temp.path(), "flutter.sdk=/later\n").unwrap();
        assert_eq!(sdk.get(), Some("/after"));
    }

    #[test]
    fn test_absent_error_message() {
        let err = AbsentProperty {
            key: "flutter.sdk".to_string(),
        };
        assert_eq!(err.to_string(), "required property 'flutter.sdk' is not set");
    }
}
