//! Batch command - analyze every data file in a directory.

use std::path::PathBuf;

use colored::Colorize;
use normform::{KeyRegistry, Normalizer, NormalizerConfig};

use crate::cli::DiscoveryArgs;
use crate::commands::report;

pub fn run(
    dir: PathBuf,
    keys: PathBuf,
    violations: bool,
    fail_fast: bool,
    json_output: bool,
    discovery: DiscoveryArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(format!("Directory not found: {}", dir.display()).into());
    }

    let registry = KeyRegistry::load(&keys)?;
    let config = NormalizerConfig {
        parser: discovery.parser_config()?,
        discovery: discovery.discovery_config(),
    };
    let normalizer = Normalizer::with_config(config);
    let entries = normalizer.iter_directory(&dir, &registry)?;

    if json_output {
        let mut output = Vec::new();
        for entry in entries {
            match entry.outcome {
                Ok(result) => output.push(serde_json::json!({
                    "dataset": entry.dataset,
                    "result": result,
                })),
                Err(e) if fail_fast => return Err(format!("{}: {}", entry.dataset, e).into()),
                Err(e) => output.push(serde_json::json!({
                    "dataset": entry.dataset,
                    "error": e.to_string(),
                })),
            }
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let (mut analyzed, mut failed) = (0usize, 0usize);
    for entry in entries {
        analyzed += 1;
        match &entry.outcome {
            Ok(result) => report::print_analysis(result, violations),
            Err(e) if fail_fast => return Err(format!("{}: {}", entry.dataset, e).into()),
            Err(e) => {
                failed += 1;
                println!(
                    "{} {} {}",
                    "Dataset".cyan().bold(),
                    entry.dataset.white(),
                    "failed".red().bold()
                );
                println!("  {}", e.to_string().red());
            }
        }
        println!();
    }

    println!(
        "Analyzed {} datasets ({} ok, {} failed)",
        analyzed.to_string().white().bold(),
        (analyzed - failed).to_string().green(),
        failed.to_string().red()
    );

    Ok(())
}
