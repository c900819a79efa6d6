//! droidcfg CLI
//!
//! Entry point for the `droidcfg` command-line tool.

use clap::{Parser, Subcommand};
use droidcfg::properties::LazyProperty;
use droidcfg::{resolve, BuildManifest, BuiltinDefaults, CliOverrides, ResolutionReport};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit code for manifest and resolution failures
const EXIT_FAILURE: i32 = 1;

/// Exit code when a required property is not set
const EXIT_ABSENT_PROPERTY: i32 = 2;

#[derive(Parser)]
#[command(name = "droidcfg")]
#[command(about = "Resolve Android build configuration", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve variants, dependencies and source sets
    Resolve {
        /// Path to the build manifest
        #[arg(long, short = 'm', env = "DROIDCFG_MANIFEST", default_value = "build.toml")]
        manifest: PathBuf,

        /// Path to the properties file (default: local.properties next to the manifest)
        #[arg(long, short = 'p', env = "DROIDCFG_PROPERTIES")]
        properties: Option<PathBuf>,

        /// Override the version code
        #[arg(long)]
        build_number: Option<u32>,

        /// Override the version name
        #[arg(long)]
        build_name: Option<String>,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Look up a single property
    Property {
        /// Property key (e.g., flutter.sdk)
        key: String,

        /// Path to the properties file
        #[arg(long, short = 'p', env = "DROIDCFG_PROPERTIES", default_value = "local.properties")]
        properties: PathBuf,

        /// Fail when the property is not set
        #[arg(long)]
        require: bool,
    },

    /// Check that a manifest resolves without errors
    Verify {
        /// Path to the build manifest
        #[arg(long, short = 'm', env = "DROIDCFG_MANIFEST", default_value = "build.toml")]
        manifest: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            manifest,
            properties,
            build_number,
            build_name,
            json,
            output,
        } => {
            let overrides = CliOverrides {
                build_number,
                build_name,
            };
            run_resolve(&manifest, properties.as_deref(), &overrides, json, output.as_deref());
        }
        Commands::Property {
            key,
            properties,
            require,
        } => {
            run_property(&key, properties, require);
        }
        Commands::Verify { manifest } => {
            run_verify(&manifest);
        }
    }
}

fn run_resolve(
    manifest: &Path,
    properties: Option<&Path>,
    overrides: &CliOverrides,
    json: bool,
    output: Option<&Path>,
) {
    let report = match ResolutionReport::build(manifest, properties, overrides) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Resolution error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    if let Some(path) = output {
        if let Err(e) = report.write_to_file(path) {
            eprintln!("Error writing report: {}", e);
            process::exit(EXIT_FAILURE);
        }
        eprintln!("Wrote: {}", path.display());
    }

    if json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(EXIT_FAILURE);
            }
        }
        return;
    }

    print_summary(&report);
}

fn print_summary(report: &ResolutionReport) {
    let resolution = &report.resolution;

    println!("Resolution key: {}", report.resolution_key);
    match report.flutter_sdk {
        Some(ref sdk) => println!("Flutter SDK: {}", sdk),
        None => println!("Flutter SDK: (not set)"),
    }
    println!();

    println!("Variants:");
    for variant in resolution["variants"].as_array().into_iter().flatten() {
        let config = &variant["config"];
        println!(
            "  {} ({} {} code {}, sdk {}/{}/{}, signing: {})",
            variant["name"].as_str().unwrap_or("?"),
            config["application_id"].as_str().unwrap_or("?"),
            config["version_name"].as_str().unwrap_or("?"),
            config["version_code"],
            config["min_sdk"],
            config["target_sdk"],
            config["compile_sdk"],
            config["signing_config"].as_str().unwrap_or("?"),
        );
    }
    println!();

    println!("Dependencies:");
    for dep in resolution["dependencies"].as_array().into_iter().flatten() {
        println!(
            "  {} {}:{}",
            dep["scope"].as_str().unwrap_or("?"),
            dep["name"].as_str().unwrap_or("?"),
            dep["version"].as_str().unwrap_or("?"),
        );
    }
    println!();

    println!("Source sets:");
    if let Some(sets) = resolution["source_sets"].as_object() {
        for (name, dirs) in sets {
            let dirs: Vec<&str> = dirs
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|d| d.as_str())
                .collect();
            println!("  {}: {}", name, dirs.join(", "));
        }
    }
}

fn run_property(key: &str, properties: PathBuf, require: bool) {
    let property = LazyProperty::from_file(properties, key);

    if require {
        match property.require() {
            Ok(value) => println!("{}", value),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(EXIT_ABSENT_PROPERTY);
            }
        }
        return;
    }

    match property.get() {
        Some(value) => println!("{}", value),
        None => eprintln!("Property '{}' is not set", key),
    }
}

fn run_verify(manifest_path: &Path) {
    let manifest = match BuildManifest::from_file(manifest_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Manifest error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    let input = match manifest.to_input(&BuiltinDefaults::default(), &CliOverrides::default()) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Manifest error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    match resolve(&input) {
        Ok(resolution) => {
            println!("Manifest valid: {}", manifest_path.display());
            println!();
            println!("  Namespace: {}", input.default_config.namespace);
            println!("  Variants: {}", resolution.variants.names().join(", "));
            println!("  Dependencies: {}", resolution.dependencies.len());
            if !resolution.plugins.is_empty() {
                println!("  Plugins: {}", resolution.plugins.join(", "));
            }
        }
        Err(e) => {
            eprintln!("Resolution error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}
