//! CLI argument parsing for wtp

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wtp")]
#[command(author, version, about = "Manage, verify, and fill LLM prompt collections", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List prompt names in a folder or JSON prompt file
    List {
        /// Prompt folder or .json prompt file
        #[arg(required = true)]
        source: PathBuf,
    },

    /// Print a prompt's text
    Get {
        /// Prompt folder or .json prompt file
        #[arg(required = true)]
        source: PathBuf,

        /// Prompt name, e.g. "subfolder/prompt"
        #[arg(required = true)]
        name: String,
    },

    /// Fill a prompt's placeholders and print the result
    Fill {
        /// Prompt folder or .json prompt file
        #[arg(required = true)]
        source: PathBuf,

        /// Prompt name
        #[arg(required = true)]
        name: String,

        /// Substitution as key=value (repeatable)
        #[arg(short, long = "set", value_parser = parse_key_val)]
        set: Vec<(String, String)>,

        /// Render missing keys as empty strings instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Hash a prompt folder into an integrity report
    Report {
        /// Prompt folder
        #[arg(required = true)]
        folder: PathBuf,

        /// Where to write the report (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reload a prompt folder and verify it against a report
    Check {
        /// Prompt folder
        #[arg(required = true)]
        folder: PathBuf,

        /// Report to verify against (default: from config)
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Fail on any mismatch
        #[arg(long)]
        strict: bool,
    },

    /// Validate a JSON prompt file
    Validate {
        /// The .json prompt file
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Run text through the configured preprocessor
    Clean {
        /// Text to clean (reads stdin when omitted)
        text: Option<String>,
    },
}

/// Parse a `key=value` substitution argument
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("name=Bo").unwrap(),
            ("name".to_string(), "Bo".to_string())
        );
        assert_eq!(
            parse_key_val("eq=a=b").unwrap(),
            ("eq".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("no-equals").is_err());
    }

    #[test]
    fn test_cli_parses_fill_command() {
        let cli = Cli::parse_from([
            "wtp", "fill", "prompts", "hello", "--set", "name=Bo", "--set", "day=Monday",
        ]);
        match cli.command {
            Command::Fill { name, set, lenient, .. } => {
                assert_eq!(name, "hello");
                assert_eq!(set.len(), 2);
                assert!(!lenient);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
