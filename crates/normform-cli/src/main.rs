//! normform CLI - functional dependency discovery and normal form analysis.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format));

    let result = match cli.command {
        Commands::Analyze {
            file,
            key,
            keys,
            violations,
            json,
            discovery,
        } => commands::analyze::run(file, key, keys, violations, json, discovery),

        Commands::Dependencies {
            file,
            json,
            discovery,
        } => commands::dependencies::run(file, json, discovery),

        Commands::Batch {
            dir,
            keys,
            violations,
            fail_fast,
            json,
            discovery,
        } => commands::batch::run(dir, keys, violations, fail_fast, json, discovery),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
