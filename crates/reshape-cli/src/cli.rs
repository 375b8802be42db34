//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Reshape CLI - Declarative JSON transformations
///
/// Preview and validate transformation pipelines, infer schemas from sample
/// data, and check whether one schema can feed another.
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

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

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
    /// Run a pipeline over a data file and show the result
    Preview(PreviewArgs),

    /// Check a pipeline definition without running it
    Validate(ValidateArgs),

    /// Infer a schema from sample data
    Infer(InferArgs),

    /// Score how well a source schema can feed a target schema
    Compat(CompatArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the preview command
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Path to the input data file (JSON or YAML)
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Path to the pipeline file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    pub pipeline: PathBuf,

    /// Show the input and output of every step
    #[arg(long)]
    pub show_trace: bool,

    /// Show run metadata
    #[arg(long)]
    pub show_metadata: bool,

    /// Save the transformed data to a file
    #[arg(long = "save-to", value_name = "FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the pipeline file (JSON or YAML)
    #[arg(value_name = "PIPELINE")]
    pub pipeline: PathBuf,

    /// Treat warnings as errors
    #[arg(short, long)]
    pub strict: bool,
}

/// Arguments for the infer command
#[derive(Parser, Debug)]
pub struct InferArgs {
    /// Path to the primary data file (JSON or YAML)
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Additional sample files (can be used multiple times)
    #[arg(short, long = "sample", value_name = "FILE")]
    pub samples: Vec<PathBuf>,

    /// Treat a top-level array in DATA as a list of samples
    #[arg(long)]
    pub each: bool,

    /// Emit a draft 2020-12 JSON Schema instead of the inferred node tree
    #[arg(long)]
    pub json_schema: bool,
}

/// Arguments for the compat command
#[derive(Parser, Debug)]
pub struct CompatArgs {
    /// Path to the source schema file (JSON or YAML)
    #[arg(value_name = "SOURCE_SCHEMA")]
    pub source: PathBuf,

    /// Path to the target schema file (JSON or YAML)
    #[arg(value_name = "TARGET_SCHEMA")]
    pub target: PathBuf,
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

    /// List the configuration file locations that are searched
    Path,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Write the user config instead of the project config
    #[arg(long)]
    pub user: bool,

    /// File format to write
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,

    /// Force overwrite existing config files
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

impl ConfigFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
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
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify that the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: None,
            no_color: false,
            command: Commands::Validate(ValidateArgs {
                pipeline: PathBuf::from("pipeline.json"),
                strict: false,
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_preview_arguments() {
        let cli = Cli::parse_from([
            "reshape",
            "-o",
            "json-pretty",
            "preview",
            "data.json",
            "--pipeline",
            "steps.yaml",
            "--show-trace",
            "--save-to",
            "out.json",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::JsonPretty));
        match cli.command {
            Commands::Preview(args) => {
                assert_eq!(args.data, PathBuf::from("data.json"));
                assert_eq!(args.pipeline, PathBuf::from("steps.yaml"));
                assert!(args.show_trace);
                assert!(!args.show_metadata);
                assert_eq!(args.save_to, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_infer_repeated_samples() {
        let cli = Cli::parse_from([
            "reshape", "infer", "a.json", "-s", "b.json", "--sample", "c.yaml", "--json-schema",
        ]);
        match cli.command {
            Commands::Infer(args) => {
                assert_eq!(args.samples.len(), 2);
                assert!(args.json_schema);
                assert!(!args.each);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_preview_requires_pipeline() {
        assert!(Cli::try_parse_from(["reshape", "preview", "data.json"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["reshape", "-q", "-v", "validate", "p.json"]).is_err());
    }

    #[test]
    fn test_output_format_from_config_string() {
        assert_eq!("json-pretty".parse::<OutputFormat>(), Ok(OutputFormat::JsonPretty));
        assert_eq!("HUMAN".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
