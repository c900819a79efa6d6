//! droidcfg - Android build configuration resolver
//!
//! Resolves an app module's build configuration from a TOML build manifest,
//! an optional `local.properties` file and command-line overrides into a
//! single resolved configuration: per-variant build configs with signing
//! fallback, the final dependency list with the pinned desugaring shim, and
//! merged source sets.

pub mod config;
pub mod dependency;
pub mod error;
pub mod manifest;
pub mod resolve;
pub mod source_set;
pub mod variant;

pub use droidcfg_properties as properties;

pub use config::{BuildConfig, BuildConfigOverride, BuiltinDefaults, CliOverrides};
pub use dependency::{Dependency, DependencyScope, DependencySetBuilder};
pub use error::{ResolutionError, ResourceKind};
pub use manifest::{BuildManifest, ManifestError};
pub use resolve::{resolve, Resolution, ResolutionInput, ResolutionReport};
pub use source_set::SourceSetMapping;
pub use variant::{SigningConfig, SigningRegistry, Variant, VariantAssembler, VariantSet};
