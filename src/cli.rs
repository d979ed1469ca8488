use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::split_list;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show issues and fatal errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show configuration and per-file progress
    Verbose,
    /// Show all available debugging information
    Debug,
}

impl VerbosityLevel {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Issue list per document
    Human,
    /// Machine-readable JSON
    Json,
    /// Counts only
    Summary,
}

/// Lightweight structural validation of HTML documents
#[derive(Parser, Debug, Clone)]
#[command(name = "validate-html")]
#[command(
    about = "Report unmatched and unclosed tags, duplicate ids, images without alt text and dangling function references"
)]
#[command(version)]
pub struct Cli {
    /// HTML file to validate, or a directory to scan
    #[arg(value_name = "file.html")]
    pub path: PathBuf,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// File extensions to process in directories (comma-separated)
    #[arg(short = 'e', long = "extensions", help = "File extensions to process (e.g., 'html,htm')")]
    pub extensions: Option<String>,

    /// Number of documents validated concurrently
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only print issues
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Include file patterns (glob syntax)
    #[arg(long = "include", action = clap::ArgAction::Append)]
    pub include_patterns: Vec<String>,

    /// Exclude file patterns (glob syntax)
    #[arg(long = "exclude", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth to scan
    #[arg(long = "max-depth")]
    pub max_depth: Option<usize>,
}

impl Cli {
    pub fn get_extensions(&self) -> Option<Vec<String>> {
        self.extensions.as_deref().map(split_list)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.path.exists() {
            return Err(format!("Path does not exist: {}", self.path.display()));
        }
        if let Some(threads) = self.threads
            && threads == 0
        {
            return Err("Number of threads must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// The one-line usage printed when the document argument is missing
pub fn usage_line(program: &str) -> String {
    format!("Usage: {} <file.html>", program)
}
