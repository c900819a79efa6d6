//! Resolution errors
//!
//! Property lookups never fail; absence only becomes an error when a
//! consumer demands the value (`droidcfg_properties::AbsentProperty`).
//! Everything here aborts the whole resolution pass.

use std::fmt;

use serde::Serialize;

/// Kind of named resource a variant can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    SigningConfig,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SigningConfig => write!(f, "signing config"),
        }
    }
}

/// Errors that abort resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// A variant references a named configuration that does not exist
    #[error("variant '{variant}': {kind} '{name}' does not exist (known: {})", .known.join(", "))]
    MissingResource {
        variant: String,
        kind: ResourceKind,
        name: String,
        known: Vec<String>,
    },

    /// The compatibility shim is declared at a version other than the pinned one
    #[error("dependency '{dependency}': declared version {declared} conflicts with pinned version {pinned}")]
    VersionConflict {
        dependency: String,
        declared: String,
        pinned: String,
    },

    /// Two variants share a name
    #[error("variant '{0}' is declared more than once")]
    DuplicateVariant(String),

    /// A variant resolved to a version code of zero
    #[error("variant '{0}': version_code must be a positive integer")]
    InvalidVersionCode(String),
}
