//! Fixture-based resolution tests
//!
//! Resolves the time table app manifest end to end and checks the report.

mod fixtures;

use droidcfg::config::BuiltinDefaults;
use droidcfg::resolve::SourceOrigin;
use droidcfg::{resolve, BuildManifest, CliOverrides, ResolutionReport};
use tempfile::TempDir;

#[test]
fn test_fixture_manifest_resolves() {
    let manifest = BuildManifest::from_file(&fixtures::time_table_manifest()).unwrap();
    let input = manifest
        .to_input(&BuiltinDefaults::default(), &CliOverrides::default())
        .unwrap();
    let resolution = resolve(&input).unwrap();

    assert_eq!(resolution.variants.names(), vec!["debug", "release"]);
    let release = resolution.variants.get("release").unwrap();
    assert_eq!(release.signing_config.as_deref(), Some("debug"));
    assert_eq!(release.min_sdk, 21);
    assert_eq!(release.compile_sdk, 34);

    // Declared shim at the pinned version is kept once, in declaration order
    let coordinates: Vec<String> = resolution
        .dependencies
        .iter()
        .map(|d| d.coordinate())
        .collect();
    assert_eq!(
        coordinates,
        vec![
            "org.jetbrains.kotlin:kotlin-stdlib-jdk7:1.9.22",
            "com.android.tools:desugar_jdk_libs:2.0.4",
        ]
    );

    let main: Vec<_> = resolution
        .source_sets
        .dirs("main")
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect();
    assert_eq!(main, vec!["src/main/java", "src/main/kotlin"]);
}

#[test]
fn test_fixture_report_reads_flutter_sdk() {
    let report = ResolutionReport::build(
        &fixtures::time_table_manifest(),
        None,
        &CliOverrides::default(),
    )
    .unwrap();

    assert_eq!(report.flutter_sdk.as_deref(), Some("/home/dev/flutter"));
    let properties = report
        .sources
        .iter()
        .find(|s| s.origin == SourceOrigin::Properties)
        .unwrap();
    let expected = fixtures::time_table_properties()
        .to_string_lossy()
        .to_string();
    assert_eq!(properties.path.as_deref(), Some(expected.as_str()));
    assert!(properties.digest.is_some());
}

#[test]
fn test_fixture_without_properties_file() {
    let dir = TempDir::new().unwrap();
    let manifest = fixtures::copy_manifest_to(dir.path());

    let report = ResolutionReport::build(&manifest, None, &CliOverrides::default()).unwrap();

    assert!(report.flutter_sdk.is_none());
    assert!(report
        .sources
        .iter()
        .all(|s| s.origin != SourceOrigin::Properties));
}

#[test]
fn test_fixture_key_independent_of_properties() {
    let dir = TempDir::new().unwrap();
    let copied = fixtures::copy_manifest_to(dir.path());

    let with_props = ResolutionReport::build(
        &fixtures::time_table_manifest(),
        None,
        &CliOverrides::default(),
    )
    .unwrap();
    let without_props = ResolutionReport::build(&copied, None, &CliOverrides::default()).unwrap();

    assert_eq!(with_props.resolution_key, without_props.resolution_key);
}

#[test]
fn test_fixture_build_name_override() {
    let cli = CliOverrides {
        build_number: Some(31),
        build_name: Some("1.3.0".to_string()),
    };
    let report = ResolutionReport::build(&fixtures::time_table_manifest(), None, &cli).unwrap();

    let release = report.variant_config("release").unwrap();
    assert_eq!(release["version_code"], 31);
    assert_eq!(release["version_name"], "1.3.0");
}

#[test]
fn test_desugaring_disabled_manifest() {
    let manifest = BuildManifest::parse(
        r#"
[android]
namespace = "com.example.plain"

[android.compile_options]
core_library_desugaring = false
"#,
    )
    .unwrap();
    let input = manifest
        .to_input(&BuiltinDefaults::default(), &CliOverrides::default())
        .unwrap();

    assert!(resolve(&input).unwrap().dependencies.is_empty());
}

#[test]
fn test_conflicting_shim_in_manifest() {
    let manifest = BuildManifest::parse(
        r#"
[android]
namespace = "com.example.stale"

[[dependencies]]
scope = "core_library_desugaring"
notation = "com.android.tools:desugar_jdk_libs:1.0.0"
"#,
    )
    .unwrap();
    let input = manifest
        .to_input(&BuiltinDefaults::default(), &CliOverrides::default())
        .unwrap();

    let message = resolve(&input).unwrap_err().to_string();
    assert!(message.contains("com.android.tools:desugar_jdk_libs"));
    assert!(message.contains("1.0.0"));
    assert!(message.contains("2.0.4"));
}
