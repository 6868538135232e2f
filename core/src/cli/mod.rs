pub mod report;

use crate::fields::parse_override;
use crate::tool::ToolPreference;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for dicat
#[derive(Parser, Debug)]
#[command(name = "dicat")]
#[command(about = "DICOM header anonymization tool")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show configured header fields read from the first DICOM file
    Show {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Write original and anonymized archives of a DICOM directory
    Anonymize {
        #[command(flatten)]
        input: InputArgs,

        /// Replacement value for an editable field, as TAG=VALUE
        #[arg(short, long = "set", value_name = "TAG=VALUE", value_parser = parse_override)]
        set: Vec<(String, String)>,

        /// Directory receiving the archives (defaults to DIRECTORY)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Delete the source files once both archives exist
        #[arg(long)]
        remove_source: bool,
    },
}

/// Arguments shared by every subcommand
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Field-definition file (.xml or .json); the built-in list is used if omitted
    #[arg(long, value_name = "FILE")]
    pub fields: Option<PathBuf>,

    /// Header tool to use
    #[arg(short, long, default_value = "auto")]
    pub tool: ToolPreference,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
