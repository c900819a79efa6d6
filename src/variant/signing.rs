//! Signing configuration names and fallback
//!
//! Resolution only decides *which* named signing configuration a variant
//! uses. Key material is looked up by name through a [`SigningProvider`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the implicit debug signing configuration
pub const DEBUG_SIGNING_CONFIG: &str = "debug";

/// Placeholder written over redacted passwords
pub const REDACTED: &str = "[REDACTED]";

/// A named signing configuration.
///
/// Fields are references (paths, aliases, password placeholders), never the
/// key material itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_password: Option<String>,
}

impl SigningConfig {
    /// A configuration with only a name; the provider supplies everything else
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store_file: None,
            store_password: None,
            key_alias: None,
            key_password: None,
        }
    }
}

/// The set of known signing configurations.
///
/// Always contains [`DEBUG_SIGNING_CONFIG`]; declaring `debug` explicitly
/// replaces the implicit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SigningRegistry {
    configs: Vec<SigningConfig>,
}

impl Default for SigningRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningRegistry {
    pub fn new() -> Self {
        Self {
            configs: vec![SigningConfig::named(DEBUG_SIGNING_CONFIG)],
        }
    }

    /// Add a configuration, replacing any existing one with the same name
    pub fn insert(&mut self, config: SigningConfig) {
        match self.configs.iter_mut().find(|c| c.name == config.name) {
            Some(existing) => *existing = config,
            None => self.configs.push(config),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SigningConfig> {
        self.configs.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Known names in registration order
    pub fn names(&self) -> Vec<String> {
        self.configs.iter().map(|c| c.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SigningConfig> {
        self.configs.iter()
    }

    /// Replace every set store and key password with [`REDACTED`].
    ///
    /// Returns the redacted fields as `<config>.<field>` in registry order.
    pub fn redact_passwords(&mut self) -> Vec<String> {
        let mut redacted = Vec::new();
        for config in &mut self.configs {
            for (field, value) in [
                ("store_password", &mut config.store_password),
                ("key_password", &mut config.key_password),
            ] {
                if let Some(password) = value {
                    *password = REDACTED.to_string();
                    redacted.push(format!("{}.{}", config.name, field));
                }
            }
        }
        redacted
    }
}

impl FromIterator<SigningConfig> for SigningRegistry {
    fn from_iter<I: IntoIterator<Item = SigningConfig>>(iter: I) -> Self {
        let mut registry = Self::new();
        for config in iter {
            registry.insert(config);
        }
        registry
    }
}

/// Pick the signing configuration name for a variant.
///
/// Fallback chain: the variant's own reference, then the default config's,
/// then [`DEBUG_SIGNING_CONFIG`].
pub fn resolve_signing_ref<'a>(variant: Option<&'a str>, default: Option<&'a str>) -> &'a str {
    variant.or(default).unwrap_or(DEBUG_SIGNING_CONFIG)
}

/// Signing material returned by an external provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningMaterial {
    pub store_file: PathBuf,
    pub store_password: String,
    pub key_alias: String,
    pub key_password: String,
}

/// External lookup of key material by signing configuration name
pub trait SigningProvider {
    fn material(&self, config: &SigningConfig) -> Option<SigningMaterial>;
}
