//! Dependencies command - list every functional dependency in a data file.

use std::path::PathBuf;

use colored::Colorize;
use normform::{Normalizer, NormalizerConfig};

use crate::cli::DiscoveryArgs;

pub fn run(
    file: PathBuf,
    json_output: bool,
    discovery: DiscoveryArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = NormalizerConfig {
        parser: discovery.parser_config()?,
        discovery: discovery.discovery_config(),
    };
    let normalizer = Normalizer::with_config(config);
    let (dataset, _source) = normalizer.load(&file)?;
    let dependencies = normalizer.discover(&dataset)?;

    if json_output {
        let output = serde_json::json!({
            "dataset": dataset.name(),
            "rule": normalizer.config().discovery.rule,
            "candidate_count": normalizer.config().discovery.candidate_count(&dataset),
            "dependencies": dependencies,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Dependencies in".cyan().bold(),
        dataset.name().white(),
        format!("({} rule)", discovery.rule).dimmed()
    );
    if dependencies.is_empty() {
        println!("{}", "No functional dependencies found.".yellow());
    }
    for fd in &dependencies {
        println!("  {}", fd);
    }
    println!();
    println!(
        "Found {} functional dependencies",
        dependencies.len().to_string().white().bold()
    );

    Ok(())
}
