use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::taxonomy::TAGS_PATH_ENV;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report with summary
    Human,
    /// The raw validation results as JSON
    Json,
    /// Summary counts only
    Summary,
}

/// Main application configuration derived from CLI
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub verbose: bool,
    pub quiet: bool,
    pub format: OutputFormat,
    pub tags_override: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            verbose: cli.verbose,
            quiet: cli.quiet,
            format: cli.format,
            tags_override: cli
                .tags
                .clone()
                .or_else(|| std::env::var_os(TAGS_PATH_ENV).map(PathBuf::from)),
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Documentation curation tool
#[derive(Parser, Debug, Clone)]
#[command(name = "curate-docs")]
#[command(about = "Audit documentation metadata against a governed tag taxonomy")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Explicit tag registry path (overrides the conventional locations)
    #[arg(long = "tags", global = true, value_name = "PATH")]
    pub tags: Option<PathBuf>,

    /// Report output format
    #[arg(long = "format", global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Audit documentation structure, front matter and tags
    Audit(AuditArgs),
    /// Auto-generate tags for documentation files
    FixTags(FixTagsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// Root directory to audit (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// File extensions to process (comma-separated)
    #[arg(
        short = 'e',
        long = "extensions",
        default_value = "md,adoc",
        help = "File extensions to process (e.g., 'md,adoc')"
    )]
    pub extensions: String,

    /// Include file patterns (glob syntax)
    #[arg(long = "include", action = clap::ArgAction::Append)]
    pub include_patterns: Vec<String>,

    /// Exclude file patterns (glob syntax)
    #[arg(long = "exclude", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,
}

impl AuditArgs {
    pub fn get_extensions(&self) -> Vec<String> {
        self.extensions
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Args, Debug, Clone)]
pub struct FixTagsArgs {
    /// Files or directories to process (defaults to the current directory)
    pub paths: Vec<PathBuf>,

    /// Report files that would change without writing them
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Audit(args) => {
                if let Some(root) = &args.root
                    && !root.exists()
                {
                    return Err(format!("Path does not exist: {}", root.display()));
                }
                if args.get_extensions().is_empty() {
                    return Err("At least one file extension is required".to_string());
                }
            }
            Command::FixTags(args) => {
                for path in &args.paths {
                    if !path.exists() {
                        return Err(format!("Path does not exist: {}", path.display()));
                    }
                }
            }
        }
        Ok(())
    }
}
