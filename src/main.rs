use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;

use validate_html::cli::usage_line;
use validate_html::{
    Cli, ConfigManager, EXIT_CLEAN, EXIT_ERROR, EXIT_ISSUES, ErrorReporter, FileDiscovery,
    FileValidationResult, Output, ProgressCallback, ValidationConfig, ValidationEngine,
    ValidationProgress, VerbosityLevel, read_document,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return handle_parse_error(e),
    };

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn handle_parse_error(error: clap::Error) -> ExitCode {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            ExitCode::SUCCESS
        }
        ErrorKind::MissingRequiredArgument => {
            println!("{}", usage_line(&program_name()));
            ExitCode::from(EXIT_ERROR)
        }
        _ => {
            let _ = error.print();
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "validate-html".to_string())
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let reporter = ErrorReporter::new(VerbosityLevel::from_flags(cli.verbose, cli.quiet));

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        return Ok(EXIT_ERROR);
    }

    let config = match ConfigManager::load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            reporter.report_config_error(&e);
            return Ok(EXIT_ERROR);
        }
    };

    let verbosity = VerbosityLevel::from_flags(config.output.verbose, config.output.quiet);
    let reporter = ErrorReporter::new(verbosity);
    let threads = ConfigManager::get_thread_count(&config);
    reporter.report_configuration(&cli.path, &config, threads);

    let engine = ValidationEngine::new(ValidationConfig {
        max_concurrent_validations: threads,
        checks: config.checks.clone(),
    })
    .context("Failed to prepare checks")?;
    let output = Output::new(verbosity, config.output.format.into());

    if cli.path.is_file() {
        // One document: a read failure is fatal and nothing is reported
        let start = Instant::now();
        let html = match read_document(&cli.path).await {
            Ok(html) => html,
            Err(e) => {
                reporter.report_error(&e);
                return Ok(EXIT_ERROR);
            }
        };

        let report = engine.validator().validate(&html);
        let result = FileValidationResult::from_report(cli.path.clone(), report, start.elapsed());
        print!("{}", output.format_document(&result)?);

        return Ok(if result.status.has_issues() {
            EXIT_ISSUES
        } else {
            EXIT_CLEAN
        });
    }

    let discovery = match FileDiscovery::new()
        .with_extensions(config.files.extensions.clone())
        .with_include_patterns(config.files.include_patterns.clone())
        .and_then(|d| d.with_exclude_patterns(config.files.exclude_patterns.clone()))
    {
        Ok(discovery) => discovery.with_max_depth(config.files.max_depth),
        Err(e) => {
            reporter.report_error(&e);
            return Ok(EXIT_ERROR);
        }
    };

    let progress_callback: Option<ProgressCallback> = if verbosity >= VerbosityLevel::Verbose {
        let progress_reporter = ErrorReporter::new(verbosity);
        Some(Arc::new(move |progress: ValidationProgress| {
            progress_reporter.report_progress(&progress)
        }))
    } else {
        None
    };

    let results = match engine
        .validate_path_with_progress(&cli.path, &discovery, progress_callback)
        .await
    {
        Ok(results) => results,
        Err(e) => {
            reporter.report_error(&e);
            return Ok(EXIT_ERROR);
        }
    };

    print!("{}", output.format_results(&results)?);

    Ok(results.exit_code())
}
