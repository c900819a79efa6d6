//! Build manifest (`build.toml`)
//!
//! Declares what an Android app module's build script declares: plugins,
//! namespace and SDK levels, default config, compile options, source sets,
//! signing configs, build types, the Flutter source path and dependencies.
//! The manifest is static; [`BuildManifest::to_input`] turns it into a
//! [`ResolutionInput`] for [`crate::resolve::resolve`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{
    merge_layers, BuildConfigOverride, BuiltinDefaults, CliOverrides, CompileOptionsDecl,
    ConfigError, KotlinOptionsDecl,
};
use crate::dependency::{kotlin_module, parse_notation, Dependency, DependencyScope, NotationError};
use crate::resolve::ResolutionInput;
use crate::source_set::SourceSetMapping;
use crate::variant::{with_implicit_build_types, SigningConfig, SigningRegistry, Variant};

/// Default properties file name, relative to the manifest directory
pub const DEFAULT_PROPERTIES_FILE: &str = "local.properties";

/// Error types for manifest operations
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// `[android]` block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AndroidBlock {
    pub namespace: Option<String>,

    pub compile_sdk: Option<u32>,

    #[serde(default)]
    pub default_config: BuildConfigOverride,

    #[serde(default)]
    pub compile_options: CompileOptionsDecl,

    #[serde(default)]
    pub kotlin_options: KotlinOptionsDecl,

    /// Extra source directories per source set
    #[serde(default)]
    pub source_sets: BTreeMap<String, Vec<PathBuf>>,

    #[serde(default)]
    pub signing_configs: BTreeMap<String, SigningConfigDecl>,

    /// Build types in declaration order
    #[serde(default)]
    pub build_types: Vec<BuildTypeDecl>,
}

/// `[android.signing_configs.<name>]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigningConfigDecl {
    pub store_file: Option<PathBuf>,
    pub store_password: Option<String>,
    pub key_alias: Option<String>,
    pub key_password: Option<String>,
}

/// `[[android.build_types]]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTypeDecl {
    pub name: String,

    #[serde(flatten)]
    pub overrides: BuildConfigOverride,
}

/// `[flutter]` block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlutterBlock {
    /// Flutter project directory, relative to the manifest
    pub source: Option<PathBuf>,
}

/// `[kotlin]` block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KotlinBlock {
    /// Version used for `kotlin = "..."` module dependencies
    pub version: Option<String>,
}

/// `[[dependencies]]` entry: a scope and exactly one of `notation`/`kotlin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyDecl {
    pub scope: DependencyScope,
    pub notation: Option<String>,
    pub kotlin: Option<String>,
}

/// Parsed `build.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Plugin ids, in application order
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Properties file, relative to the manifest directory
    pub local_properties: Option<PathBuf>,

    #[serde(default)]
    pub android: AndroidBlock,

    #[serde(default)]
    pub flutter: FlutterBlock,

    #[serde(default)]
    pub kotlin: KotlinBlock,

    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,
}

impl BuildManifest {
    /// Load and parse a manifest file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a manifest from a TOML string
    pub fn parse(s: &str) -> Result<Self, ManifestError> {
        let manifest: BuildManifest = toml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<(), ManifestError> {
        // Rule: namespace is required somewhere
        let namespace = self
            .android
            .default_config
            .namespace
            .as_ref()
            .or(self.android.namespace.as_ref());
        if namespace.map_or(true, |ns| ns.trim().is_empty()) {
            return Err(ManifestError::ValidationError(
                "'android.namespace' must be set".to_string(),
            ));
        }

        // Rule: version codes are positive
        let declared_codes = std::iter::once(&self.android.default_config)
            .chain(self.android.build_types.iter().map(|b| &b.overrides))
            .filter_map(|o| o.version_code);
        for code in declared_codes {
            if code == 0 {
                return Err(ManifestError::ValidationError(
                    "version_code must be a positive integer".to_string(),
                ));
            }
        }

        // Rule: build types and signing configs have names
        if self.android.build_types.iter().any(|b| b.name.trim().is_empty()) {
            return Err(ManifestError::ValidationError(
                "build type names must not be empty".to_string(),
            ));
        }
        if self.android.signing_configs.keys().any(|k| k.trim().is_empty()) {
            return Err(ManifestError::ValidationError(
                "signing config names must not be empty".to_string(),
            ));
        }

        // Rule: each dependency names exactly one of notation/kotlin
        for (i, dep) in self.dependencies.iter().enumerate() {
            if dep.notation.is_some() == dep.kotlin.is_some() {
                return Err(ManifestError::ValidationError(format!(
                    "dependencies[{}]: exactly one of 'notation' or 'kotlin' is required",
                    i
                )));
            }
        }

        Ok(())
    }

    /// Resolve the properties file location relative to the manifest
    pub fn properties_path(&self, manifest_path: &Path) -> PathBuf {
        let dir = manifest_path.parent().unwrap_or_else(|| Path::new(""));
        let file = self
            .local_properties
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_PROPERTIES_FILE));
        dir.join(file)
    }

    /// The manifest's own config layer (`[android]` under `default_config`)
    pub fn config_layer(&self) -> BuildConfigOverride {
        let android = BuildConfigOverride {
            namespace: self.android.namespace.clone(),
            compile_sdk: self.android.compile_sdk,
            ..Default::default()
        };
        merge_layers(vec![android, self.android.default_config.clone()])
    }

    /// Build the resolution input from builtin defaults, this manifest and
    /// CLI overrides.
    pub fn to_input(
        &self,
        defaults: &BuiltinDefaults,
        cli: &CliOverrides,
    ) -> Result<ResolutionInput, ManifestError> {
        let default_config =
            merge_layers(vec![defaults.to_override(), self.config_layer(), cli.to_override()])
                .finalize()?;

        let variants = with_implicit_build_types(
            self.android
                .build_types
                .iter()
                .map(|b| Variant::new(b.name.clone(), b.overrides.clone()))
                .collect(),
        );

        let signing_configs: SigningRegistry = self
            .android
            .signing_configs
            .iter()
            .map(|(name, decl)| SigningConfig {
                name: name.clone(),
                store_file: decl.store_file.clone(),
                store_password: decl.store_password.clone(),
                key_alias: decl.key_alias.clone(),
                key_password: decl.key_password.clone(),
            })
            .collect();

        let dependencies = self
            .dependencies
            .iter()
            .map(|decl| self.dependency(decl))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolutionInput {
            default_config,
            variants,
            signing_configs,
            dependencies,
            source_sets: SourceSetMapping::from(self.android.source_sets.clone()),
            compile_options: self.android.compile_options.resolve(defaults),
            kotlin_options: self.android.kotlin_options.resolve(defaults),
            shim: Dependency::new(
                defaults.desugar_shim.clone(),
                defaults.desugar_shim_version.clone(),
                DependencyScope::CoreLibraryDesugaring,
            ),
            plugins: self.plugins.clone(),
            flutter_source: self
                .flutter
                .source
                .clone()
                .unwrap_or_else(|| PathBuf::from(&defaults.flutter_source)),
        })
    }

    fn dependency(&self, decl: &DependencyDecl) -> Result<Dependency, ManifestError> {
        let dependency = match (&decl.notation, &decl.kotlin) {
            (Some(notation), None) => parse_notation(notation, decl.scope)?,
            (None, Some(module)) => kotlin_module(module, self.kotlin.version.as_deref(), decl.scope)?,
            _ => {
                return Err(ManifestError::ValidationError(
                    "exactly one of 'notation' or 'kotlin' is required".to_string(),
                ))
            }
        };
        Ok(dependency)
    }
}
