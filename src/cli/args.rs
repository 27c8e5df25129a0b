//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Run endpoint usage diagnostics (unused, unmatched, malformed, duplicate)
//! - `list`: Show every declared endpoint with its usage
//! - `export`: Write the usage table as CSV
//! - `init`: Initialize the configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use super::commands::check::CheckRule;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::List(cmd)) => cmd.common.verbose,
            Some(Command::Export(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all scanning commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Endpoint spec file: OpenAPI JSON/YAML or a plain endpoint list (overrides config file)
    #[arg(long, value_name = "PATH")]
    pub spec: Option<PathBuf>,

    /// Project directory to scan; repeat for several projects (overrides config file)
    #[arg(long = "project", value_name = "DIR")]
    pub projects: Vec<PathBuf>,

    /// Compare literal path segments case-insensitively
    #[arg(long)]
    pub case_insensitive: bool,

    /// Percent-decode candidate path segments before matching
    #[arg(long)]
    pub decode_percent: bool,

    /// Base path that may precede a declared template, e.g. /api/v1; repeatable
    #[arg(long = "strip-prefix", value_name = "PREFIX")]
    pub strip_prefixes: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Rules to run (default: unused, malformed, duplicate)
    #[arg(value_enum)]
    pub checks: Vec<CheckRule>,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Used,
    Unused,
    Unparseable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Only show endpoints with this status
    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    /// Only show endpoints whose path contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub const DEFAULT_EXPORT_PATH: &str = "endpoint_usage.csv";

#[derive(Debug, Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// CSV output path; `-` writes to stdout
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_EXPORT_PATH)]
    pub output: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check endpoint usage (unused endpoints, unmatched paths, malformed templates, duplicates)
    Check(CheckCommand),
    /// List declared endpoints with their usage counts and locations
    List(ListCommand),
    /// Export endpoint usage as CSV
    Export(ExportCommand),
    /// Initialize a new .apiusagerc.json configuration file
    Init,
}
