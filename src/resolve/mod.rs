//! Resolution entry point
//!
//! One linear, synchronous pass: assemble variants, build the dependency
//! set, merge source sets. Any error aborts the whole pass; there is no
//! partial result.

mod report;

pub use report::{InputSource, ReportError, ResolutionReport, SourceOrigin, SCHEMA_ID, SCHEMA_VERSION};

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{jvm_targets_match, BuildConfig, CompileOptions, KotlinOptions};
use crate::dependency::{Dependency, DependencySetBuilder};
use crate::error::ResolutionError;
use crate::source_set::SourceSetMapping;
use crate::variant::{
    SigningConfig, SigningMaterial, SigningProvider, SigningRegistry, Variant, VariantAssembler,
    VariantSet,
};

/// Everything resolution consumes
#[derive(Debug, Clone)]
pub struct ResolutionInput {
    /// Fully merged default config
    pub default_config: BuildConfig,

    /// Variants in declaration order
    pub variants: Vec<Variant>,

    /// Known signing configurations
    pub signing_configs: SigningRegistry,

    /// Declared dependencies in declaration order
    pub dependencies: Vec<Dependency>,

    /// Source directories supplied by the toolchain
    pub source_sets: SourceSetMapping,

    pub compile_options: CompileOptions,

    pub kotlin_options: KotlinOptions,

    /// Pinned compatibility shim
    pub shim: Dependency,

    pub plugins: Vec<String>,

    /// Flutter project directory
    pub flutter_source: PathBuf,
}

/// The resolved configuration handed to the packager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub plugins: Vec<String>,
    pub variants: VariantSet,
    pub signing_configs: SigningRegistry,
    pub dependencies: Vec<Dependency>,
    pub source_sets: SourceSetMapping,
    pub compile_options: CompileOptions,
    pub kotlin_options: KotlinOptions,
    pub flutter_source: PathBuf,
}

/// Resolve variants, dependencies and source sets
pub fn resolve(input: &ResolutionInput) -> Result<Resolution, ResolutionError> {
    let default = &input.default_config;
    if !default.sdk_levels_ordered() {
        tracing::warn!(
            min_sdk = default.min_sdk,
            target_sdk = default.target_sdk,
            compile_sdk = default.compile_sdk,
            "SDK levels are not ordered min <= target <= compile"
        );
    }
    if !jvm_targets_match(&input.compile_options, &input.kotlin_options) {
        tracing::warn!(
            java = %input.compile_options.target_compatibility,
            kotlin = %input.kotlin_options.jvm_target,
            "Java and Kotlin JVM targets differ"
        );
    }

    let variants = VariantAssembler::new(&input.signing_configs)
        .assemble(default, &input.variants)?;
    tracing::debug!(variants = ?variants.names(), "assembled variants");

    let dependencies = DependencySetBuilder::new(
        input.shim.clone(),
        input.compile_options.core_library_desugaring,
    )
    .build(&input.dependencies)?;
    tracing::debug!(count = dependencies.len(), "built dependency set");

    Ok(Resolution {
        plugins: input.plugins.clone(),
        variants,
        signing_configs: input.signing_configs.clone(),
        dependencies,
        source_sets: SourceSetMapping::with_defaults(&input.source_sets),
        compile_options: input.compile_options.clone(),
        kotlin_options: input.kotlin_options.clone(),
        flutter_source: input.flutter_source.clone(),
    })
}

impl Resolution {
    /// Signing configuration a variant resolved to
    pub fn signing_config(&self, variant: &str) -> Option<&SigningConfig> {
        let name = self.variants.get(variant)?.signing_config.as_deref()?;
        self.signing_configs.get(name)
    }

    /// Ask an external provider for the key material of a variant
    pub fn signing_material<P>(&self, variant: &str, provider: &P) -> Option<SigningMaterial>
    where
        P: SigningProvider + ?Sized,
    {
        provider.material(self.signing_config(variant)?)
    }
}
