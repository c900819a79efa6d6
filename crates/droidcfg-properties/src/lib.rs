//! Tolerant `local.properties` loading and memoized property lookup.
//!
//! The properties file is an optional, machine-local input (SDK paths and
//! similar). Loading it never fails: a missing file is an empty map and
//! malformed lines are skipped. Individual values are read through
//! [`LazyValue`] so the store is consulted at most once per value.

mod lazy;
mod store;

pub use lazy::{AbsentProperty, LazyProperty, LazyState, LazyValue};
pub use store::{parse, parse_line, PropertyMap, PropertySource, PropertyStore};

/// Key written by the Flutter tool pointing at the SDK checkout.
pub const FLUTTER_SDK_KEY: &str = "flutter.sdk";
