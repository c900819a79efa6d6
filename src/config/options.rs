//! Java/Kotlin compile options

use serde::{Deserialize, Serialize};

use super::defaults::BuiltinDefaults;

/// Resolved `compileOptions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    pub source_compatibility: String,
    pub target_compatibility: String,

    /// Whether the desugaring shim is injected into the dependency set
    pub core_library_desugaring: bool,
}

/// Resolved `kotlinOptions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KotlinOptions {
    pub jvm_target: String,
}

/// `compileOptions` as declared; unset fields take builtin defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileOptionsDecl {
    pub source_compatibility: Option<String>,
    pub target_compatibility: Option<String>,
    pub core_library_desugaring: Option<bool>,
}

/// `kotlinOptions` as declared
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KotlinOptionsDecl {
    pub jvm_target: Option<String>,
}

impl CompileOptionsDecl {
    pub fn resolve(&self, defaults: &BuiltinDefaults) -> CompileOptions {
        CompileOptions {
            source_compatibility: self
                .source_compatibility
                .clone()
                .unwrap_or_else(|| defaults.java_version.clone()),
            target_compatibility: self
                .target_compatibility
                .clone()
                .unwrap_or_else(|| defaults.java_version.clone()),
            core_library_desugaring: self
                .core_library_desugaring
                .unwrap_or(defaults.core_library_desugaring),
        }
    }
}

impl KotlinOptionsDecl {
    pub fn resolve(&self, defaults: &BuiltinDefaults) -> KotlinOptions {
        KotlinOptions {
            jvm_target: self
                .jvm_target
                .clone()
                .unwrap_or_else(|| defaults.jvm_target.clone()),
        }
    }
}

/// Check that Kotlin and Java target the same JVM.
///
/// Accepts `1.8` and `8` as the same version.
pub fn jvm_targets_match(compile: &CompileOptions, kotlin: &KotlinOptions) -> bool {
    normalize_java_version(&compile.target_compatibility) == normalize_java_version(&kotlin.jvm_target)
}

fn normalize_java_version(version: &str) -> &str {
    let version = version.trim();
    version.strip_prefix("1.").unwrap_or(version)
}
