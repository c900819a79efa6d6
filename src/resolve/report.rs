//! Resolution report with full provenance
//!
//! The report captures the resolved configuration plus where every input
//! came from, with signing passwords redacted and a deterministic key over
//! the redacted result.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use droidcfg_properties::{PropertyStore, FLUTTER_SDK_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{resolve, Resolution};
use crate::config::{BuiltinDefaults, CliOverrides};
use crate::error::ResolutionError;
use crate::manifest::{BuildManifest, ManifestError};

/// Schema version for the report
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "droidcfg/resolution@1";

/// Origin of an input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    Builtin,
    Manifest,
    Properties,
    Cli,
}

/// A contributing input with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSource {
    /// Origin of this input
    pub origin: SourceOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Report errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Canonicalization error: {0}")]
    Canonicalization(String),
}

/// Resolved configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this report was computed
    pub created_at: DateTime<Utc>,

    /// SHA-256 of the canonical (RFC 8785) JSON of `resolution`
    pub resolution_key: String,

    /// Flutter SDK path from the properties file, if set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flutter_sdk: Option<String>,

    /// The resolved configuration (passwords redacted)
    pub resolution: Value,

    /// Contributing inputs in precedence order
    pub sources: Vec<InputSource>,

    /// Redacted key paths
    pub redactions: Vec<String>,
}

impl ResolutionReport {
    /// Run a full resolution from a manifest file.
    ///
    /// `properties_path` overrides the manifest's `local_properties`.
    pub fn build(
        manifest_path: &Path,
        properties_path: Option<&Path>,
        cli: &CliOverrides,
    ) -> Result<Self, ReportError> {
        let defaults = BuiltinDefaults::default();
        let mut sources = vec![InputSource {
            origin: SourceOrigin::Builtin,
            path: None,
            digest: None,
        }];

        // Manifest
        let (manifest, digest) = Self::load_manifest(manifest_path)?;
        sources.push(InputSource {
            origin: SourceOrigin::Manifest,
            path: Some(manifest_path.to_string_lossy().to_string()),
            digest: Some(digest),
        });

        // Properties
        let properties_path: PathBuf = properties_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| manifest.properties_path(manifest_path));
        let store = Rc::new(PropertyStore::load(&properties_path));
        if let Some(source) = store.source().filter(|s| s.exists) {
            sources.push(InputSource {
                origin: SourceOrigin::Properties,
                path: Some(source.path.to_string_lossy().to_string()),
                digest: source.digest.clone(),
            });
        }
        let flutter_sdk = store.lazy(FLUTTER_SDK_KEY);

        // CLI overrides
        if !cli.is_empty() {
            sources.push(InputSource {
                origin: SourceOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let input = manifest.to_input(&defaults, cli)?;
        let resolution = resolve(&input)?;

        Self::from_resolution(&resolution, sources, flutter_sdk.get())
    }

    /// Wrap an existing resolution
    pub fn from_resolution(
        resolution: &Resolution,
        sources: Vec<InputSource>,
        flutter_sdk: Option<&str>,
    ) -> Result<Self, ReportError> {
        let mut redacted = resolution.clone();
        let redactions: Vec<String> = redacted
            .signing_configs
            .redact_passwords()
            .into_iter()
            .map(|field| format!("signing_configs.{}", field))
            .collect();
        let value = serde_json::to_value(&redacted)?;
        let resolution_key = Self::compute_key(&value)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            resolution_key,
            flutter_sdk: flutter_sdk.map(str::to_owned),
            resolution: value,
            sources,
            redactions,
        })
    }

    /// Read and parse a manifest, returning it with the digest of its bytes
    fn load_manifest(path: &Path) -> Result<(BuildManifest, String), ManifestError> {
        let bytes = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ManifestError::ValidationError(format!("Invalid UTF-8: {}", e)))?;

        Ok((BuildManifest::parse(&contents)?, digest))
    }

    /// SHA-256 hex digest of the JCS encoding of `value`
    fn compute_key(value: &Value) -> Result<String, ReportError> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(value)
            .map_err(|e| ReportError::Canonicalization(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Reported config of a variant
    pub fn variant_config(&self, name: &str) -> Option<&Value> {
        Self::named_entry(&self.resolution["variants"], name).map(|v| &v["config"])
    }

    /// Reported (redacted) signing configuration
    pub fn signing_config(&self, name: &str) -> Option<&Value> {
        Self::named_entry(&self.resolution["signing_configs"], name)
    }

    fn named_entry<'a>(list: &'a Value, name: &str) -> Option<&'a Value> {
        list.as_array()?.iter().find(|entry| entry["name"] == name)
    }
}
