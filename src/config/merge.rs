//! Configuration merge logic
//!
//! Field-wise layering over `BuildConfigOverride`:
//! - Set fields in the upper layer win
//! - Unset fields fall through to the layer below

use super::build_config::{BuildConfig, BuildConfigOverride};

/// Merge two layers; `upper` takes precedence field by field.
pub fn merge_overrides(lower: BuildConfigOverride, upper: BuildConfigOverride) -> BuildConfigOverride {
    BuildConfigOverride {
        namespace: upper.namespace.or(lower.namespace),
        application_id: upper.application_id.or(lower.application_id),
        min_sdk: upper.min_sdk.or(lower.min_sdk),
        target_sdk: upper.target_sdk.or(lower.target_sdk),
        compile_sdk: upper.compile_sdk.or(lower.compile_sdk),
        version_code: upper.version_code.or(lower.version_code),
        version_name: upper.version_name.or(lower.version_name),
        signing_config: upper.signing_config.or(lower.signing_config),
    }
}

/// Merge multiple layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<BuildConfigOverride>) -> BuildConfigOverride {
    layers
        .into_iter()
        .fold(BuildConfigOverride::default(), merge_overrides)
}

/// Apply a variant override on top of a complete config.
///
/// Signing is inherited like any other field here; the debug fallback is
/// applied by the variant assembler.
pub fn apply_override(base: &BuildConfig, overlay: &BuildConfigOverride) -> BuildConfig {
    BuildConfig {
        namespace: overlay.namespace.clone().unwrap_or_else(|| base.namespace.clone()),
        application_id: overlay
            .application_id
            .clone()
            .unwrap_or_else(|| base.application_id.clone()),
        min_sdk: overlay.min_sdk.unwrap_or(base.min_sdk),
        target_sdk: overlay.target_sdk.unwrap_or(base.target_sdk),
        compile_sdk: overlay.compile_sdk.unwrap_or(base.compile_sdk),
        version_code: overlay.version_code.unwrap_or(base.version_code),
        version_name: overlay
            .version_name
            .clone()
            .unwrap_or_else(|| base.version_name.clone()),
        signing_config: overlay
            .signing_config
            .clone()
            .or_else(|| base.signing_config.clone()),
    }
}
