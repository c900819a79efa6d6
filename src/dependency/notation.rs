//! Dependency notation parsing
//!
//! Supports Maven `group:artifact:version` strings and the Kotlin module
//! shorthand (`kotlin("stdlib-jdk7")`).

use super::{Dependency, DependencyScope};

/// Group of the Kotlin standard modules
const KOTLIN_GROUP: &str = "org.jetbrains.kotlin";

/// Notation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("invalid dependency notation '{0}': expected group:artifact:version")]
    Malformed(String),

    #[error("kotlin module '{0}' needs a Kotlin version ([kotlin].version)")]
    MissingKotlinVersion(String),
}

/// Parse `group:artifact:version`
pub fn parse_notation(notation: &str, scope: DependencyScope) -> Result<Dependency, NotationError> {
    let parts: Vec<&str> = notation.trim().split(':').map(str::trim).collect();
    match parts.as_slice() {
        [group, artifact, version]
            if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
        {
            Ok(Dependency::new(format!("{}:{}", group, artifact), *version, scope))
        }
        _ => Err(NotationError::Malformed(notation.to_string())),
    }
}

/// Expand a Kotlin module shorthand, e.g. `stdlib-jdk7` ->
/// `org.jetbrains.kotlin:kotlin-stdlib-jdk7`
pub fn kotlin_module(
    module: &str,
    version: Option<&str>,
    scope: DependencyScope,
) -> Result<Dependency, NotationError> {
    let module = module.trim();
    if module.is_empty() {
        return Err(NotationError::Malformed(module.to_string()));
    }
    let version = version.ok_or_else(|| NotationError::MissingKotlinVersion(module.to_string()))?;

    Ok(Dependency::new(
        format!("{}:kotlin-{}", KOTLIN_GROUP, module),
        version,
        scope,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notation() {
        let dep = parse_notation(
            "com.android.tools:desugar_jdk_libs:2.0.4",
            DependencyScope::CoreLibraryDesugaring,
        )
        .unwrap();
        assert_eq!(dep.name, "com.android.tools:desugar_jdk_libs");
        assert_eq!(dep.version, "2.0.4");
        assert_eq!(dep.scope, DependencyScope::CoreLibraryDesugaring);
    }

    #[test]
    fn test_parse_notation_rejects_malformed() {
        for bad in ["", "a:b", "a::1.0", ":b:1.0", "a:b:", "a:b:c:d"] {
            assert!(
                parse_notation(bad, DependencyScope::Implementation).is_err(),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_kotlin_module() {
        let dep = kotlin_module("stdlib-jdk7", Some("1.9.22"), DependencyScope::Implementation).unwrap();
        assert_eq!(dep.name, "org.jetbrains.kotlin:kotlin-stdlib-jdk7");
        assert_eq!(dep.version, "1.9.22");
    }

    #[test]
    fn test_kotlin_module_without_version() {
        let err = kotlin_module("stdlib-jdk7", None, DependencyScope::Implementation).unwrap_err();
        assert_eq!(err, NotationError::MissingKotlinVersion("stdlib-jdk7".to_string()));
    }
}
