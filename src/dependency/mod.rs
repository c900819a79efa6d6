//! Dependency set assembly
//!
//! The declared dependencies are passed through in order (exact duplicates
//! collapsed) and the core library desugaring shim is appended at its
//! pinned version when desugaring is enabled.

mod notation;

pub use notation::{kotlin_module, parse_notation, NotationError};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::BuiltinDefaults;
use crate::error::ResolutionError;

/// Gradle configuration a dependency is added to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyScope {
    Implementation,
    CompileOnly,
    TestImplementation,
    /// Build-time only compatibility shim
    CoreLibraryDesugaring,
}

impl DependencyScope {
    /// Configuration name as the build system spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Implementation => "implementation",
            Self::CompileOnly => "compileOnly",
            Self::TestImplementation => "testImplementation",
            Self::CoreLibraryDesugaring => "coreLibraryDesugaring",
        }
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(name, version, scope)` triple; `name` is `group:artifact`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    pub scope: DependencyScope,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>, scope: DependencyScope) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            scope,
        }
    }

    /// Full `group:artifact:version` coordinate
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.scope, self.coordinate())
    }
}

/// Builds the final dependency list around a pinned shim
#[derive(Debug, Clone)]
pub struct DependencySetBuilder {
    shim: Dependency,
    desugaring: bool,
}

impl DependencySetBuilder {
    pub fn new(shim: Dependency, desugaring_enabled: bool) -> Self {
        Self {
            shim,
            desugaring: desugaring_enabled,
        }
    }

    /// Builder for the builtin desugaring shim
    pub fn from_defaults(defaults: &BuiltinDefaults, desugaring_enabled: bool) -> Self {
        Self::new(
            Dependency::new(
                defaults.desugar_shim.clone(),
                defaults.desugar_shim_version.clone(),
                DependencyScope::CoreLibraryDesugaring,
            ),
            desugaring_enabled,
        )
    }

    pub fn shim(&self) -> &Dependency {
        &self.shim
    }

    /// Produce the final ordered list.
    ///
    /// The shim is recognized by name. Declared at the pinned version it is
    /// kept once, at its first declaration, always in the pinned scope;
    /// declared at any other version it is a `VersionConflict`.
    pub fn build(&self, declared: &[Dependency]) -> Result<Vec<Dependency>, ResolutionError> {
        let mut result: Vec<Dependency> = Vec::with_capacity(declared.len() + 1);
        let mut shim_declared = false;

        for dependency in declared {
            if dependency.name == self.shim.name {
                if dependency.version != self.shim.version {
                    return Err(ResolutionError::VersionConflict {
                        dependency: dependency.name.clone(),
                        declared: dependency.version.clone(),
                        pinned: self.shim.version.clone(),
                    });
                }
                if dependency.scope != self.shim.scope {
                    tracing::warn!(
                        dependency = %dependency,
                        scope = %self.shim.scope,
                        "shim declared in another scope, using the pinned scope"
                    );
                }
                if !shim_declared {
                    result.push(self.shim.clone());
                    shim_declared = true;
                }
                continue;
            }

            if result.contains(dependency) {
                tracing::debug!(dependency = %dependency, "dropping duplicate declaration");
                continue;
            }
            result.push(dependency.clone());
        }

        if self.desugaring && !shim_declared {
            tracing::debug!(shim = %self.shim, "appending desugaring shim");
            result.push(self.shim.clone());
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn shim() -> Dependency {
        Dependency::new("shim", "2.0.4", DependencyScope::CoreLibraryDesugaring)
    }

    fn dep_a() -> Dependency {
        Dependency::new("A", "1.0", DependencyScope::Implementation)
    }

    #[test]
    fn test_appends_shim() {
        let builder = DependencySetBuilder::new(shim(), true);
        let result = builder.build(&[dep_a()]).unwrap();
        assert_eq!(result, vec![dep_a(), shim()]);
    }

    #[test]
    fn test_build_twice_is_equal() {
        let builder = DependencySetBuilder::new(shim(), true);
        let first: HashSet<_> = builder.build(&[dep_a()]).unwrap().into_iter().collect();
        let second: HashSet<_> = builder.build(&[dep_a()]).unwrap().into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_is_idempotent_on_its_output() {
        let builder = DependencySetBuilder::new(shim(), true);
        let once = builder.build(&[dep_a()]).unwrap();
        let twice = builder.build(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.iter().filter(|d| d.name == "shim").count(), 1);
    }

    #[test]
    fn test_declared_shim_at_pinned_version_not_duplicated() {
        let builder = DependencySetBuilder::new(shim(), true);
        let result = builder.build(&[shim(), dep_a()]).unwrap();
        assert_eq!(result, vec![shim(), dep_a()]);
    }

    #[test]
    fn test_declared_shim_at_other_version_conflicts() {
        let builder = DependencySetBuilder::new(shim(), true);
        let stale = Dependency::new("shim", "1.0.0", DependencyScope::CoreLibraryDesugaring);
        let err = builder.build(&[dep_a(), stale]).unwrap_err();

        assert_eq!(
            err,
            ResolutionError::VersionConflict {
                dependency: "shim".to_string(),
                declared: "1.0.0".to_string(),
                pinned: "2.0.4".to_string(),
            }
        );
    }

    #[test]
    fn test_shim_in_two_scopes_kept_once() {
        let builder = DependencySetBuilder::new(shim(), true);
        let as_library = Dependency::new("shim", "2.0.4", DependencyScope::Implementation);
        let result = builder.build(&[as_library, shim()]).unwrap();

        assert_eq!(result.iter().filter(|d| d.name == "shim").count(), 1);
        assert_eq!(result, vec![shim()]);
    }

    #[test]
    fn test_shim_in_wrong_scope_uses_pinned_scope() {
        let builder = DependencySetBuilder::new(shim(), true);
        let as_library = Dependency::new("shim", "2.0.4", DependencyScope::Implementation);
        let result = builder.build(&[dep_a(), as_library.clone()]).unwrap();

        assert_eq!(result, vec![dep_a(), shim()]);
        assert!(!result.contains(&as_library));
    }

    #[test]
    fn test_desugaring_disabled_skips_shim() {
        let builder = DependencySetBuilder::new(shim(), false);
        let result = builder.build(&[dep_a()]).unwrap();
        assert_eq!(result, vec![dep_a()]);
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let builder = DependencySetBuilder::new(shim(), true);
        let test_scoped = Dependency::new("A", "1.0", DependencyScope::TestImplementation);
        let result = builder
            .build(&[dep_a(), test_scoped.clone(), dep_a()])
            .unwrap();
        assert_eq!(result, vec![dep_a(), test_scoped, shim()]);
    }

    #[test]
    fn test_from_defaults_uses_pinned_shim() {
        let builder = DependencySetBuilder::from_defaults(&BuiltinDefaults::default(), true);
        assert_eq!(
            builder.shim().coordinate(),
            "com.android.tools:desugar_jdk_libs:2.0.4"
        );
        assert_eq!(
            builder.shim().to_string(),
            "coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:2.0.4\")"
        );
    }
}
