//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use normform::{DependencyRule, DiscoveryConfig, MissingKeys, ParserConfig};

/// normform: functional dependency discovery and normal form analysis
#[derive(Parser)]
#[command(name = "normform")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormatChoice,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover dependencies in a data file and classify it against 1NF-3NF
    Analyze {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Primary key attributes, comma separated (e.g. "EmployeeID,PayrollDate")
        #[arg(short, long, value_delimiter = ',', conflicts_with = "keys")]
        key: Vec<String>,

        /// JSON registry mapping file names to primary key attributes
        #[arg(long, value_name = "REGISTRY")]
        keys: Option<PathBuf>,

        /// Print the dependencies that violate 2NF and 3NF
        #[arg(long)]
        violations: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        discovery: DiscoveryArgs,
    },

    /// List every functional dependency discovered in a data file
    Dependencies {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        discovery: DiscoveryArgs,
    },

    /// Analyze every data file in a directory using a key registry
    Batch {
        /// Directory containing CSV/TSV files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// JSON registry mapping file names to primary key attributes
        #[arg(long, value_name = "REGISTRY")]
        keys: PathBuf,

        /// Print the dependencies that violate 2NF and 3NF
        #[arg(long)]
        violations: bool,

        /// Stop at the first dataset that fails
        #[arg(long)]
        fail_fast: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        discovery: DiscoveryArgs,
    },
}

/// Options shared by every command that runs discovery.
#[derive(Args, Clone, Debug, Default)]
pub struct DiscoveryArgs {
    /// Dependency rule (uniqueness, consistency)
    #[arg(long, default_value = "uniqueness")]
    pub rule: RuleChoice,

    /// Group rows with empty determinant cells together instead of skipping them
    #[arg(long)]
    pub group_missing: bool,

    /// Largest determinant size to test
    #[arg(long, value_name = "N")]
    pub max_determinant: Option<usize>,

    /// Read JSON arrays and objects in cells as composite values
    #[arg(long)]
    pub composite: bool,

    /// Field delimiter (auto-detected when omitted)
    #[arg(short, long)]
    pub delimiter: Option<char>,
}

impl DiscoveryArgs {
    /// Discovery configuration selected by the flags.
    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            rule: self.rule.clone().into(),
            missing_keys: if self.group_missing {
                MissingKeys::Group
            } else {
                MissingKeys::Skip
            },
            max_determinant_size: self.max_determinant,
        }
    }

    /// Loader configuration selected by the flags.
    pub fn parser_config(&self) -> Result<ParserConfig, String> {
        let delimiter = match self.delimiter {
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(c) => return Err(format!("Delimiter must be a single ASCII character, got '{}'", c)),
            None => None,
        };
        Ok(ParserConfig {
            delimiter,
            composite_values: self.composite,
            ..Default::default()
        })
    }
}

/// Dependency rule choice
#[derive(Clone, Debug, Default)]
pub enum RuleChoice {
    /// A determinant must identify every row
    #[default]
    Uniqueness,
    /// Rows agreeing on the determinant must agree on the dependent
    Consistency,
}

impl std::str::FromStr for RuleChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "uniqueness" | "row_uniqueness" | "unique" => Ok(RuleChoice::Uniqueness),
            "consistency" | "value_consistency" | "textbook" => Ok(RuleChoice::Consistency),
            _ => Err(format!(
                "Unknown rule: {}. Use: uniqueness or consistency.",
                s
            )),
        }
    }
}

impl std::fmt::Display for RuleChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleChoice::Uniqueness => write!(f, "uniqueness"),
            RuleChoice::Consistency => write!(f, "consistency"),
        }
    }
}

impl From<RuleChoice> for DependencyRule {
    fn from(choice: RuleChoice) -> Self {
        match choice {
            RuleChoice::Uniqueness => DependencyRule::RowUniqueness,
            RuleChoice::Consistency => DependencyRule::ValueConsistency,
        }
    }
}

/// Log output format choice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatChoice {
    /// Human-readable multi-field output
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// JSON lines
    Json,
}

impl std::str::FromStr for LogFormatChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormatChoice::Pretty),
            "compact" => Ok(LogFormatChoice::Compact),
            "json" => Ok(LogFormatChoice::Json),
            _ => Err(format!(
                "Unknown log format: {}. Use: pretty, compact, or json.",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormatChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatChoice::Pretty => write!(f, "pretty"),
            LogFormatChoice::Compact => write!(f, "compact"),
            LogFormatChoice::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_key_list() {
        let cli = Cli::try_parse_from([
            "normform",
            "analyze",
            "salary.csv",
            "--key",
            "EmployeeID,PayrollDate",
            "--rule",
            "consistency",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Analyze { key, discovery, .. } => {
                assert_eq!(key, ["EmployeeID", "PayrollDate"]);
                assert_eq!(
                    discovery.discovery_config().rule,
                    DependencyRule::ValueConsistency
                );
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_key_and_registry_conflict() {
        let parsed = Cli::try_parse_from([
            "normform", "analyze", "a.csv", "--key", "id", "--keys", "keys.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_rule_choice_parsing() {
        assert!(matches!("textbook".parse::<RuleChoice>(), Ok(RuleChoice::Consistency)));
        assert!(matches!("row-uniqueness".parse::<RuleChoice>(), Ok(RuleChoice::Uniqueness)));
        assert!("fuzzy".parse::<RuleChoice>().is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let args = DiscoveryArgs {
            delimiter: Some('§'),
            ..Default::default()
        };
        assert!(args.parser_config().is_err());
    }

    #[test]
    fn test_missing_keys_skipped_unless_grouped() {
        let cli = Cli::try_parse_from(["normform", "dependencies", "a.csv"]).unwrap();
        match cli.command {
            Commands::Dependencies { discovery, .. } => {
                assert_eq!(discovery.discovery_config().missing_keys, MissingKeys::Skip);
            }
            _ => panic!("expected dependencies"),
        }

        let cli =
            Cli::try_parse_from(["normform", "dependencies", "a.csv", "--group-missing"]).unwrap();
        match cli.command {
            Commands::Dependencies { discovery, .. } => {
                assert_eq!(discovery.discovery_config().missing_keys, MissingKeys::Group);
            }
            _ => panic!("expected dependencies"),
        }
    }
}
