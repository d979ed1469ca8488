use std::path::Path;

use crate::cli::VerbosityLevel;
use crate::config::{Config, ConfigError};
use crate::error::ValidationError;
use crate::validator::ValidationProgress;

/// Diagnostics on stderr, gated by verbosity.
///
/// Validation results go to stdout through [`Output`](crate::output::Output);
/// everything here is for the person running the tool.
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    show_timestamps: bool,
}

impl ErrorReporter {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: false,
        }
    }

    pub fn with_options(verbosity: VerbosityLevel, show_timestamps: bool) -> Self {
        Self {
            verbosity,
            show_timestamps,
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Report a fatal environment error. Always printed, even in quiet mode.
    pub fn report_error(&self, error: &ValidationError) {
        eprintln!("{}", self.format_error(error));
    }

    /// Report a configuration error
    pub fn report_config_error(&self, error: &ConfigError) {
        eprintln!("{}", self.format_config_error(error));
    }

    /// Echo the effective configuration in verbose mode
    pub fn report_configuration(&self, path: &Path, config: &Config, threads: usize) {
        if self.verbosity < VerbosityLevel::Verbose {
            return;
        }
        eprintln!("{}", self.format_configuration(path, config, threads));
    }

    /// Per-file progress in verbose mode
    pub fn report_progress(&self, progress: &ValidationProgress) {
        if self.verbosity < VerbosityLevel::Verbose {
            return;
        }
        eprintln!(
            "{}[{}/{}] {}",
            self.timestamp(),
            progress.completed,
            progress.total,
            progress.current_file.display()
        );
    }

    fn timestamp(&self) -> String {
        if self.show_timestamps {
            format!("[{}] ", chrono::Utc::now().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }

    fn format_error(&self, error: &ValidationError) -> String {
        let mut output = format!("{}Error: {}", self.timestamp(), error);

        if self.verbosity >= VerbosityLevel::Verbose {
            match error {
                ValidationError::DocumentRead { path, .. } => {
                    output.push_str(&format!(
                        "\nSuggestion: Check that {} exists and is readable",
                        path.display()
                    ));
                }
                ValidationError::FileSystemTraversal { .. } => {
                    output.push_str("\nSuggestion: Check the directory path and permissions");
                }
                ValidationError::Config(_) => {
                    output.push_str("\nSuggestion: Check the configuration file and VALIDATE_HTML_* variables");
                }
                _ => {}
            }
        }

        if self.verbosity == VerbosityLevel::Debug {
            output.push_str(&format!("\nDebug Info: {:?}", error));
            output.push_str("\nError Chain:");
            let mut current: &dyn std::error::Error = error;
            let mut level = 0;
            while let Some(source) = current.source() {
                level += 1;
                output.push_str(&format!("\n  {}: {}", level, source));
                current = source;
            }
        }

        output
    }

    fn format_config_error(&self, error: &ConfigError) -> String {
        if self.verbosity == VerbosityLevel::Quiet {
            return format!("Config error: {}", error);
        }
        format!("Configuration Error: {}\n{}", error, config_help(error))
    }

    fn format_configuration(&self, path: &Path, config: &Config, threads: usize) -> String {
        let checks = &config.checks;
        let mut output = String::from("Configuration:\n");
        output.push_str(&format!("  Path: {}\n", path.display()));
        output.push_str(&format!("  Extensions: {:?}\n", config.files.extensions));
        output.push_str(&format!("  Threads: {}\n", threads));
        output.push_str(&format!("  Output format: {:?}\n", config.output.format));
        output.push_str(&format!(
            "  Checks: doctype={} duplicate_ids={} missing_alt={} (limit {})\n",
            checks.doctype, checks.duplicate_ids, checks.missing_alt, checks.alt_index_limit
        ));
        output.push_str(&format!(
            "  Watched functions: {:?}",
            checks.undefined_functions
        ));
        output
    }
}

fn config_help(error: &ConfigError) -> &'static str {
    match error {
        ConfigError::Io(_) => "Check that the configuration file exists and is readable",
        ConfigError::TomlParsing(_) | ConfigError::JsonParsing(_) => {
            "Check the configuration file syntax (TOML/JSON format expected)"
        }
        ConfigError::Validation(_) => "Fix the reported value in the file, environment or command line",
        ConfigError::Environment(_) => "Fix or unset the reported VALIDATE_HTML_* variable",
        ConfigError::UnsupportedFormat(_) => "Use a .toml or .json configuration file",
    }
}
