//! Output and Reporting
//!
//! Renders validation results for stdout. A single document keeps the classic
//! two-form report (`No obvious HTML structural issues detected.` or
//! `Validation issues found:` plus one `- <issue>` line per issue); directories
//! get one such block per file and a summary.

use std::time::Duration;

use crate::cli::{OutputFormat, VerbosityLevel};
use crate::validator::{FileValidationResult, ValidationResults, ValidationStatus};

pub const NO_ISSUES_MESSAGE: &str = "No obvious HTML structural issues detected.";
pub const ISSUES_HEADER: &str = "Validation issues found:";

/// Output formatter for validation results
pub struct Output {
    verbosity: VerbosityLevel,
    format: OutputFormat,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel, format: OutputFormat) -> Self {
        Self {
            verbosity,
            format,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    /// Disable ANSI colors regardless of the terminal
    pub fn without_colors(mut self) -> Self {
        self.show_colors = false;
        self
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    /// Render the report for a single document given on the command line
    pub fn format_document(&self, result: &FileValidationResult) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result).map(|json| json + "\n"),
            OutputFormat::Summary => Ok(format!(
                "{}: {}\n",
                result.path.display(),
                status_word(&result.status)
            )),
            OutputFormat::Human => Ok(self.format_issue_list(result)),
        }
    }

    /// Render the report for a batch of documents
    pub fn format_results(&self, results: &ValidationResults) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(results).map(|json| json + "\n"),
            OutputFormat::Summary => Ok(self.format_summary(results)),
            OutputFormat::Human => {
                let mut output = String::new();
                for result in &results.file_results {
                    output.push_str(&self.format_file_result(result));
                }
                if self.verbosity > VerbosityLevel::Quiet {
                    if !output.is_empty() {
                        output.push('\n');
                    }
                    output.push_str(&self.format_summary(results));
                }
                Ok(output)
            }
        }
    }

    fn format_issue_list(&self, result: &FileValidationResult) -> String {
        match &result.status {
            ValidationStatus::Clean if self.verbosity == VerbosityLevel::Quiet => String::new(),
            ValidationStatus::Clean => format!("{}\n", NO_ISSUES_MESSAGE),
            ValidationStatus::IssuesFound { .. } => {
                let mut output = format!("{}\n", ISSUES_HEADER);
                for issue in &result.issues {
                    output.push_str(&format!("- {}\n", issue));
                }
                output
            }
            // Read failures are reported on stderr
            ValidationStatus::Error { .. } => String::new(),
        }
    }

    fn format_file_result(&self, result: &FileValidationResult) -> String {
        let path_display = result.path.display();

        match &result.status {
            ValidationStatus::Clean => {
                if self.verbosity == VerbosityLevel::Quiet {
                    return String::new();
                }
                format!(
                    "{} {}\n",
                    self.colorize(&format!("{}:", path_display), "32"),
                    NO_ISSUES_MESSAGE
                )
            }
            ValidationStatus::IssuesFound { .. } => format!(
                "{} {}",
                self.colorize(&format!("{}:", path_display), "31"),
                self.format_issue_list(result)
            ),
            ValidationStatus::Error { message } => format!(
                "{} {}\n",
                self.colorize(&format!("{}:", path_display), "33"),
                message
            ),
        }
    }

    fn format_summary(&self, results: &ValidationResults) -> String {
        let mut output = String::new();
        output.push_str("Validation Summary:\n");
        output.push_str(&format!("  Total files: {}\n", results.total_files));
        output.push_str(&format!(
            "  {} {}\n",
            self.colorize("Clean:", "32"),
            results.clean_files
        ));

        if results.files_with_issues > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("With issues:", "31"),
                results.files_with_issues
            ));
            output.push_str(&format!("  Total issues: {}\n", results.total_issues));
        }
        if results.error_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Errors:", "33"),
                results.error_files
            ));
        }

        if self.verbosity >= VerbosityLevel::Verbose {
            output.push_str(&format!(
                "  Duration: {}\n",
                format_duration(results.total_duration)
            ));
        }

        output
    }
}

fn status_word(status: &ValidationStatus) -> String {
    match status {
        ValidationStatus::Clean => "clean".to_string(),
        ValidationStatus::IssuesFound { issue_count } => format!(
            "{} issue{}",
            issue_count,
            if *issue_count == 1 { "" } else { "s" }
        ),
        ValidationStatus::Error { message } => format!("error ({})", message),
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
