//! Build variant assembly
//!
//! Each declared variant (build type) is the default config with its
//! override applied. Variants are independent of each other and keep their
//! declaration order.

mod signing;

pub use signing::{
    resolve_signing_ref, SigningConfig, SigningMaterial, SigningProvider, SigningRegistry,
    DEBUG_SIGNING_CONFIG, REDACTED,
};

use std::collections::HashSet;

use serde::Serialize;

use crate::config::{apply_override, BuildConfig, BuildConfigOverride};
use crate::error::{ResolutionError, ResourceKind};

/// Build type Android always defines, even when undeclared
pub const IMPLICIT_BUILD_TYPES: &[&str] = &["debug", "release"];

/// A declared variant: a name plus the fields it overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub overrides: BuildConfigOverride,
}

impl Variant {
    pub fn new(name: impl Into<String>, overrides: BuildConfigOverride) -> Self {
        Self {
            name: name.into(),
            overrides,
        }
    }
}

/// Add the implicit `debug` and `release` build types when not declared.
///
/// Missing implicit types come first (debug before release), followed by
/// every declared variant in declaration order.
pub fn with_implicit_build_types(declared: Vec<Variant>) -> Vec<Variant> {
    let mut variants: Vec<Variant> = IMPLICIT_BUILD_TYPES
        .iter()
        .filter(|name| !declared.iter().any(|v| v.name == **name))
        .map(|name| Variant::new(*name, BuildConfigOverride::default()))
        .collect();
    variants.extend(declared);
    variants
}

/// A variant after merging, with its signing reference always set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVariant {
    pub name: String,
    pub config: BuildConfig,
}

impl ResolvedVariant {
    /// Resolved signing configuration name
    pub fn signing_config(&self) -> &str {
        self.config
            .signing_config
            .as_deref()
            .unwrap_or(DEBUG_SIGNING_CONFIG)
    }
}

/// Resolved variants in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariantSet {
    variants: Vec<ResolvedVariant>,
}

impl VariantSet {
    pub fn get(&self, name: &str) -> Option<&BuildConfig> {
        self.variants
            .iter()
            .find(|v| v.name == name)
            .map(|v| &v.config)
    }

    pub fn names(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedVariant> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Merges the default config with each variant's override
pub struct VariantAssembler<'a> {
    signing: &'a SigningRegistry,
}

impl<'a> VariantAssembler<'a> {
    pub fn new(signing: &'a SigningRegistry) -> Self {
        Self { signing }
    }

    /// Assemble every variant, failing on the first unknown signing
    /// configuration, duplicate name or zero version code.
    pub fn assemble(
        &self,
        default: &BuildConfig,
        variants: &[Variant],
    ) -> Result<VariantSet, ResolutionError> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(variants.len());

        for variant in variants {
            if !seen.insert(variant.name.as_str()) {
                return Err(ResolutionError::DuplicateVariant(variant.name.clone()));
            }
            resolved.push(self.assemble_one(default, variant)?);
        }

        Ok(VariantSet { variants: resolved })
    }

    fn assemble_one(
        &self,
        default: &BuildConfig,
        variant: &Variant,
    ) -> Result<ResolvedVariant, ResolutionError> {
        let mut config = apply_override(default, &variant.overrides);
        if config.version_code == 0 {
            return Err(ResolutionError::InvalidVersionCode(variant.name.clone()));
        }

        let signing = resolve_signing_ref(
            variant.overrides.signing_config.as_deref(),
            default.signing_config.as_deref(),
        );
        if !self.signing.contains(signing) {
            return Err(ResolutionError::MissingResource {
                variant: variant.name.clone(),
                kind: ResourceKind::SigningConfig,
                name: signing.to_string(),
                known: self.signing.names(),
            });
        }
        if config.signing_config.is_none() {
            tracing::debug!(variant = %variant.name, "no signing config set, falling back to debug");
        }
        config.signing_config = Some(signing.to_string());

        Ok(ResolvedVariant {
            name: variant.name.clone(),
            config,
        })
    }
}
