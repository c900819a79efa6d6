//! Build configuration records
//!
//! `BuildConfig` is the fully-populated record handed to the packager.
//! `BuildConfigOverride` carries the same fields, each optional, and is used
//! for every layer (builtin defaults, manifest, CLI) and for variant
//! overrides.

use serde::{Deserialize, Serialize};

/// A fully-populated build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Namespace used for generated R and BuildConfig classes
    pub namespace: String,

    /// Application identifier (package name on device)
    pub application_id: String,

    /// Minimum supported SDK level
    pub min_sdk: u32,

    /// SDK level the app is tested against
    pub target_sdk: u32,

    /// SDK level used for compilation
    pub compile_sdk: u32,

    /// Monotonically increasing integer version (always > 0)
    pub version_code: u32,

    /// Human-readable version string
    pub version_name: String,

    /// Name of the signing configuration, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_config: Option<String>,
}

impl BuildConfig {
    /// Check `min_sdk <= target_sdk <= compile_sdk`.
    ///
    /// Not enforced anywhere in resolution; callers decide what to do.
    pub fn sdk_levels_ordered(&self) -> bool {
        self.min_sdk <= self.target_sdk && self.target_sdk <= self.compile_sdk
    }
}

/// A partial build configuration; `None` fields inherit from the layer below
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfigOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sdk: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sdk: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_sdk: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_config: Option<String>,
}

impl BuildConfigOverride {
    /// Check if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Turn a fully merged layer stack into a `BuildConfig`.
    ///
    /// `application_id` falls back to `namespace`. Every other field must
    /// be present.
    pub fn finalize(self) -> Result<BuildConfig, ConfigError> {
        let namespace = self.namespace.ok_or(ConfigError::MissingField("namespace"))?;
        let version_code = self
            .version_code
            .ok_or(ConfigError::MissingField("version_code"))?;

        if version_code == 0 {
            return Err(ConfigError::ValidationError(
                "version_code must be a positive integer".to_string(),
            ));
        }
        if namespace.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "namespace must not be empty".to_string(),
            ));
        }

        Ok(BuildConfig {
            application_id: self.application_id.unwrap_or_else(|| namespace.clone()),
            namespace,
            min_sdk: self.min_sdk.ok_or(ConfigError::MissingField("min_sdk"))?,
            target_sdk: self.target_sdk.ok_or(ConfigError::MissingField("target_sdk"))?,
            compile_sdk: self
                .compile_sdk
                .ok_or(ConfigError::MissingField("compile_sdk"))?,
            version_code,
            version_name: self
                .version_name
                .ok_or(ConfigError::MissingField("version_name"))?,
            signing_config: self.signing_config,
        })
    }
}

/// Version overrides passed on the command line.
///
/// Mirrors `flutter build --build-number/--build-name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub build_number: Option<u32>,
    pub build_name: Option<String>,
}

impl CliOverrides {
    /// Check if any override was given
    pub fn is_empty(&self) -> bool {
        self.build_number.is_none() && self.build_name.is_none()
    }

    /// Express as a config layer
    pub fn to_override(&self) -> BuildConfigOverride {
        BuildConfigOverride {
            version_code: self.build_number,
            version_name: self.build_name.clone(),
            ..Default::default()
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
