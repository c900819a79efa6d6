//! Configuration layering
//!
//! Build config values are merged from three layers, lowest first:
//! 1. Built-in defaults
//! 2. Manifest (`[android]` and `[android.default_config]`)
//! 3. CLI flags (`--build-number`, `--build-name`)
//!
//! Variant overrides are applied on top of the merged result by
//! [`crate::variant::VariantAssembler`].

mod build_config;
mod defaults;
mod merge;
mod options;

pub use build_config::{BuildConfig, BuildConfigOverride, CliOverrides, ConfigError};
pub use defaults::BuiltinDefaults;
pub use merge::{apply_override, merge_layers, merge_overrides};
pub use options::{
    jvm_targets_match, CompileOptions, CompileOptionsDecl, KotlinOptions, KotlinOptionsDecl,
};
