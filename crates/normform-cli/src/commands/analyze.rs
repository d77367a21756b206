//! Analyze command - discover dependencies and classify one data file.

use std::path::{Path, PathBuf};

use normform::{KeyRegistry, NormformError, Normalizer, NormalizerConfig, PrimaryKey};

use crate::cli::DiscoveryArgs;
use crate::commands::report;

pub fn run(
    file: PathBuf,
    key: Vec<String>,
    keys: Option<PathBuf>,
    violations: bool,
    json_output: bool,
    discovery: DiscoveryArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let primary_key = resolve_key(&file, key, keys.as_deref())?;

    let config = NormalizerConfig {
        parser: discovery.parser_config()?,
        discovery: discovery.discovery_config(),
    };
    let result = Normalizer::with_config(config).analyze(&file, &primary_key)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report::print_analysis(&result, violations);
    }

    Ok(())
}

/// The key given on the command line, or the registry entry for the file.
fn resolve_key(
    file: &Path,
    key: Vec<String>,
    registry: Option<&Path>,
) -> Result<PrimaryKey, Box<dyn std::error::Error>> {
    let dataset = file
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    if let Some(path) = registry {
        return Ok(KeyRegistry::load(path)?.primary_key_for(&dataset)?);
    }

    let attributes = key
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());
    PrimaryKey::new(attributes).ok_or_else(|| {
        NormformError::missing_input(dataset, "primary key (use --key or --keys)").into()
    })
}
