//! Built-in defaults (lowest layer)
//!
//! Hardcoded values for everything a manifest may leave out.

use serde::{Deserialize, Serialize};

use super::build_config::BuildConfigOverride;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Minimum SDK level (default: 21)
    pub min_sdk: u32,

    /// Target SDK level (default: 34)
    pub target_sdk: u32,

    /// Compile SDK level (default: 34)
    pub compile_sdk: u32,

    /// Version code (default: 1)
    pub version_code: u32,

    /// Version name (default: "1.0.0")
    pub version_name: String,

    /// Java source/target compatibility (default: "1.8")
    pub java_version: String,

    /// Kotlin JVM target (default: "1.8")
    pub jvm_target: String,

    /// Core library desugaring toggle (default: true)
    pub core_library_desugaring: bool,

    /// Coordinate of the desugaring shim
    pub desugar_shim: String,

    /// Exact pinned shim version
    pub desugar_shim_version: String,

    /// Path to the Flutter project, relative to the manifest (default: "../..")
    pub flutter_source: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            min_sdk: 21,
            target_sdk: 34,
            compile_sdk: 34,
            version_code: 1,
            version_name: "1.0.0".to_string(),
            java_version: "1.8".to_string(),
            jvm_target: "1.8".to_string(),
            core_library_desugaring: true,
            desugar_shim: "com.android.tools:desugar_jdk_libs".to_string(),
            desugar_shim_version: "2.0.4".to_string(),
            flutter_source: "../..".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Express the build-config defaults as the bottom merge layer
    pub fn to_override(&self) -> BuildConfigOverride {
        BuildConfigOverride {
            namespace: None,
            application_id: None,
            min_sdk: Some(self.min_sdk),
            target_sdk: Some(self.target_sdk),
            compile_sdk: Some(self.compile_sdk),
            version_code: Some(self.version_code),
            version_name: Some(self.version_name.clone()),
            signing_config: None,
        }
    }
}
