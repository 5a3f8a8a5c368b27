//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Reshape - schema-driven JSON and XML record transformation
///
/// Reads a source record, fills every instance of an annotated target schema
/// from it, and validates the assembled document against the same schema.
#[derive(Parser, Debug)]
#[command(
    name = "reshape",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RESHAPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transform a JSON or XML record into the target schema's shape
    Transform(TransformArgs),

    /// Check that a target schema and its transform blocks are well formed
    Check(CheckArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),
}

/// Arguments for the transform command
#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Annotated target schema (JSON or YAML)
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Rule set to apply (falls back to the configured default)
    #[arg(short, long, value_name = "NAME")]
    pub rule_set: Option<String>,

    /// Input format; auto detects XML by a leading '<'
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Skip output validation against the schema
    #[arg(long)]
    pub no_validate: bool,

    /// Pretty-print the output document
    #[arg(long)]
    pub pretty: bool,

    /// Write the output document to a file instead of stdout
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Source record, or '-' for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: PathBuf,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Annotated target schema (JSON or YAML)
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Fail unless the schema declares this rule set
    #[arg(short, long, value_name = "NAME")]
    pub rule_set: Option<String>,

    /// List every instance path with its resolution tiers
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Destination file; the extension selects the format
    #[arg(value_name = "PATH", default_value = "reshape.toml")]
    pub path: PathBuf,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Input format selection
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatArg {
    /// Detect from the first non-whitespace byte
    #[default]
    Auto,
    /// JSON document
    Json,
    /// XML document
    Xml,
}

impl FormatArg {
    /// The engine format to force, if any
    pub fn to_input_format(self) -> Option<reshape_core::InputFormat> {
        match self {
            FormatArg::Auto => None,
            FormatArg::Json => Some(reshape_core::InputFormat::Json),
            FormatArg::Xml => Some(reshape_core::InputFormat::Xml),
        }
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stderr().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_transform_defaults_to_stdin() {
        let cli = Cli::parse_from(["reshape", "transform", "--schema", "image.json"]);
        match cli.command {
            Commands::Transform(args) => {
                assert_eq!(args.input, PathBuf::from("-"));
                assert_eq!(args.rule_set, None);
                assert_eq!(args.format, None);
                assert!(!args.pretty);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_transform_flags() {
        let cli = Cli::parse_from([
            "reshape", "-vv", "transform", "-s", "feed.yaml", "-r", "rss", "--format", "xml",
            "--no-validate", "--pretty", "-o", "out.json", "feed.xml",
        ]);
        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Commands::Transform(args) => {
                assert_eq!(args.rule_set.as_deref(), Some("rss"));
                assert_eq!(args.format, Some(FormatArg::Xml));
                assert!(args.no_validate);
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
                assert_eq!(args.input, PathBuf::from("feed.xml"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_quiet_overrides_verbosity() {
        let cli = Cli::parse_from(["reshape", "--quiet", "check", "--schema", "a.json"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_format_arg_mapping() {
        assert_eq!(FormatArg::Auto.to_input_format(), None);
        assert_eq!(
            FormatArg::Xml.to_input_format(),
            Some(reshape_core::InputFormat::Xml)
        );
    }
}
