//! Validation pipeline and batch engine
//!
//! [`DocumentValidator`] runs one synchronous pass over a document:
//!
//! 1. DOCTYPE check on the raw text
//! 2. sanitize, tokenize and match tags
//! 3. duplicate-id, missing-alt and undefined-function checks on the raw text
//!
//! Issues are concatenated in that order. [`ValidationEngine`] reads many
//! documents asynchronously and validates them concurrently, one tokio task per
//! file bounded by a semaphore. Passes share nothing but the immutable
//! validator.

use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::checks::{
    UndefinedFunctionCheck, check_doctype, check_duplicate_ids, check_missing_alt,
};
use crate::config::ChecksConfig;
use crate::error::{Result, ValidationError};
use crate::file_discovery::FileDiscovery;
use crate::issue::Issue;
use crate::matcher::match_tags;
use crate::sanitizer::sanitize;
use crate::tokenizer::tokenize;

/// Exit status: no issues found
pub const EXIT_CLEAN: u8 = 0;
/// Exit status: usage or environment error
pub const EXIT_ERROR: u8 = 1;
/// Exit status: at least one issue found
pub const EXIT_ISSUES: u8 = 2;

/// Issues found in one document, in report order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub issues: Vec<Issue>,
}

impl DocumentReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(Issue::message).collect()
    }
}

/// Runs the full set of checks over a single document
#[derive(Debug, Clone)]
pub struct DocumentValidator {
    checks: ChecksConfig,
    function_checks: Vec<UndefinedFunctionCheck>,
}

impl DocumentValidator {
    pub fn new(checks: ChecksConfig) -> Result<Self> {
        let function_checks = checks
            .undefined_functions
            .iter()
            .map(|name| UndefinedFunctionCheck::new(name))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            checks,
            function_checks,
        })
    }

    pub fn checks(&self) -> &ChecksConfig {
        &self.checks
    }

    pub fn validate(&self, html: &str) -> DocumentReport {
        let mut issues = Vec::new();

        if self.checks.doctype {
            issues.extend(check_doctype(html));
        }

        let sanitized = sanitize(html);
        issues.extend(match_tags(tokenize(&sanitized)));

        if self.checks.duplicate_ids {
            issues.extend(check_duplicate_ids(html));
        }
        if self.checks.missing_alt {
            issues.extend(check_missing_alt(html, self.checks.alt_index_limit));
        }
        for check in &self.function_checks {
            issues.extend(check.check(html));
        }

        DocumentReport { issues }
    }
}

/// Validate `html` with the default checks
pub fn validate_document(html: &str) -> DocumentReport {
    static DEFAULT_VALIDATOR: OnceLock<DocumentValidator> = OnceLock::new();
    DEFAULT_VALIDATOR
        .get_or_init(|| {
            DocumentValidator::new(ChecksConfig::default())
                .expect("Failed to compile default checks")
        })
        .validate(html)
}

/// Batch validation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Number of documents validated concurrently
    pub max_concurrent_validations: usize,
    /// Checks applied to every document
    pub checks: ChecksConfig,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_concurrent_validations: num_cpus::get(),
            checks: ChecksConfig::default(),
        }
    }
}

/// Status of a single file validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationStatus {
    /// No issues
    Clean,
    /// The document has structural or content issues
    IssuesFound { issue_count: usize },
    /// The document could not be read
    Error { message: String },
}

impl ValidationStatus {
    pub fn is_clean(&self) -> bool {
        matches!(self, ValidationStatus::Clean)
    }

    pub fn has_issues(&self) -> bool {
        matches!(self, ValidationStatus::IssuesFound { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationStatus::Error { .. })
    }
}

/// Result of validating a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileValidationResult {
    pub path: PathBuf,
    pub status: ValidationStatus,
    pub issues: Vec<Issue>,
    pub duration: Duration,
}

impl FileValidationResult {
    pub fn from_report(path: PathBuf, report: DocumentReport, duration: Duration) -> Self {
        let status = if report.is_clean() {
            ValidationStatus::Clean
        } else {
            ValidationStatus::IssuesFound {
                issue_count: report.issues.len(),
            }
        };

        Self {
            path,
            status,
            issues: report.issues,
            duration,
        }
    }

    pub fn error(path: PathBuf, error: ValidationError, duration: Duration) -> Self {
        Self {
            path,
            status: ValidationStatus::Error {
                message: error.to_string(),
            },
            issues: Vec::new(),
            duration,
        }
    }
}

/// Progress update, sent after each file completes
#[derive(Debug, Clone)]
pub struct ValidationProgress {
    pub current_file: PathBuf,
    pub completed: usize,
    pub total: usize,
}

/// Progress callback type for validation updates
pub type ProgressCallback = Arc<dyn Fn(ValidationProgress) + Send + Sync>;

/// Aggregated results of validating multiple files
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResults {
    pub total_files: usize,
    pub clean_files: usize,
    pub files_with_issues: usize,
    pub error_files: usize,
    pub total_issues: usize,
    pub total_duration: Duration,
    /// Per-file results, sorted by path
    pub file_results: Vec<FileValidationResult>,
}

impl ValidationResults {
    /// Aggregate individual file results into a summary
    pub fn aggregate(mut file_results: Vec<FileValidationResult>, total_duration: Duration) -> Self {
        file_results.sort_by(|a, b| a.path.cmp(&b.path));

        let mut clean_files = 0;
        let mut files_with_issues = 0;
        let mut error_files = 0;
        let mut total_issues = 0;

        for result in &file_results {
            match result.status {
                ValidationStatus::Clean => clean_files += 1,
                ValidationStatus::IssuesFound { issue_count } => {
                    files_with_issues += 1;
                    total_issues += issue_count;
                }
                ValidationStatus::Error { .. } => error_files += 1,
            }
        }

        Self {
            total_files: file_results.len(),
            clean_files,
            files_with_issues,
            error_files,
            total_issues,
            total_duration,
            file_results,
        }
    }

    pub fn has_issues(&self) -> bool {
        self.files_with_issues > 0
    }

    pub fn has_errors(&self) -> bool {
        self.error_files > 0
    }

    /// Process exit status for this run. Read errors outrank issues.
    pub fn exit_code(&self) -> u8 {
        if self.has_errors() {
            EXIT_ERROR
        } else if self.has_issues() {
            EXIT_ISSUES
        } else {
            EXIT_CLEAN
        }
    }
}

/// Concurrent validation of many documents
pub struct ValidationEngine {
    validator: Arc<DocumentValidator>,
    config: ValidationConfig,
}

impl ValidationEngine {
    pub fn new(config: ValidationConfig) -> Result<Self> {
        let validator = Arc::new(DocumentValidator::new(config.checks.clone())?);
        Ok(Self { validator, config })
    }

    pub fn validator(&self) -> &DocumentValidator {
        &self.validator
    }

    /// Validate every document `file_discovery` finds under `path`
    pub async fn validate_path(
        &self,
        path: &Path,
        file_discovery: &FileDiscovery,
    ) -> Result<ValidationResults> {
        self.validate_path_with_progress(path, file_discovery, None)
            .await
    }

    pub async fn validate_path_with_progress(
        &self,
        path: &Path,
        file_discovery: &FileDiscovery,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<ValidationResults> {
        let start = Instant::now();
        let files = file_discovery.discover_files(path).await?;
        let results = self.validate_files(files, progress_callback).await?;
        Ok(ValidationResults::aggregate(results, start.elapsed()))
    }

    /// Validate a list of files concurrently
    pub async fn validate_files(
        &self,
        files: Vec<PathBuf>,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<Vec<FileValidationResult>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let total = files.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(tokio::sync::Semaphore::new(
            self.config.max_concurrent_validations.max(1),
        ));

        let tasks: Vec<_> = files
            .into_iter()
            .map(|path| {
                let validator = Arc::clone(&self.validator);
                let semaphore = Arc::clone(&semaphore);
                let completed = Arc::clone(&completed);
                let progress_callback = progress_callback.clone();

                tokio::spawn(async move {
                    let _permit = semaphore.acquire().await.map_err(|_| {
                        ValidationError::Concurrency {
                            details: "Failed to acquire validation semaphore".to_string(),
                        }
                    })?;

                    let result = Self::validate_file_with(&validator, path.clone()).await;

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(callback) = &progress_callback {
                        callback(ValidationProgress {
                            current_file: path,
                            completed: done,
                            total,
                        });
                    }

                    Ok::<FileValidationResult, ValidationError>(result)
                })
            })
            .collect();

        let joined = try_join_all(tasks)
            .await
            .map_err(|e| ValidationError::Concurrency {
                details: format!("Task join error: {}", e),
            })?;

        joined.into_iter().collect()
    }

    /// Read and validate one file
    pub async fn validate_file(&self, path: &Path) -> FileValidationResult {
        Self::validate_file_with(&self.validator, path.to_path_buf()).await
    }

    async fn validate_file_with(validator: &DocumentValidator, path: PathBuf) -> FileValidationResult {
        let start = Instant::now();

        let html = match read_document(&path).await {
            Ok(html) => html,
            Err(e) => return FileValidationResult::error(path, e, start.elapsed()),
        };

        // CPU-bound and short; runs directly on the task
        let report = validator.validate(&html);
        FileValidationResult::from_report(path, report, start.elapsed())
    }
}

/// Read a whole document. Invalid UTF-8 is replaced, never rejected.
pub async fn read_document(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ValidationError::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueKind;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const CLEAN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Shop</title><style>a > b { color: red }</style></head>
<body>
  <img src="logo.png" alt="Logo">
  <p id="intro">Hello<br>world</p>
  <script>function addToCart(id) { if (id < 3 && id > 0) { return "<div>"; } }</script>
  <button onclick="addToCart(1)">Buy</button>
</body>
</html>"#;

    #[test]
    fn test_clean_page() {
        let report = validate_document(CLEAN_PAGE);
        assert!(report.is_clean(), "{:?}", report.messages());
    }

    #[test]
    fn test_report_order() {
        let html = r#"<html><body><div><p>x</div>
<img src="a.png"><span id="a"></span><span id="a"></span>
<button onclick="addToCart(5)">Buy</button></body></html>"#;
        let report = validate_document(html);

        assert_eq!(
            report.messages(),
            vec![
                "Missing DOCTYPE".to_string(),
                "Unclosed tag <p> before closing </div> at pos 21".to_string(),
                "Duplicate id(s): a".to_string(),
                "1 <img> tag(s) missing alt attribute (indices: [1])".to_string(),
                "`addToCart` is referenced but no definition found".to_string(),
            ]
        );
    }

    #[test]
    fn test_disabled_checks() {
        let checks = ChecksConfig {
            doctype: false,
            duplicate_ids: false,
            missing_alt: false,
            undefined_functions: vec![],
            ..ChecksConfig::default()
        };
        let validator = DocumentValidator::new(checks).unwrap();
        let report = validator.validate(
            r#"<img src=x><p id="a"></p><p id="a"></p><a onclick="addToCart(1)">"#,
        );
        assert_eq!(report.messages(), vec!["Unclosed tag <a>".to_string()]);
    }

    #[test]
    fn test_multiple_watched_functions() {
        let checks = ChecksConfig {
            undefined_functions: vec!["removeItem".to_string(), "addToCart".to_string()],
            ..ChecksConfig::default()
        };
        let validator = DocumentValidator::new(checks).unwrap();
        let report = validator.validate("<!doctype html><p onclick=\"addToCart(1); removeItem(2)\"></p>");
        assert_eq!(
            report.issues.iter().map(|i| i.kind.clone()).collect::<Vec<_>>(),
            vec![
                IssueKind::UndefinedFunction {
                    name: "removeItem".to_string()
                },
                IssueKind::UndefinedFunction {
                    name: "addToCart".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_results_aggregation_and_exit_code() {
        let clean = FileValidationResult::from_report(
            PathBuf::from("b.html"),
            DocumentReport::default(),
            Duration::ZERO,
        );
        let dirty = FileValidationResult::from_report(
            PathBuf::from("a.html"),
            validate_document("<p>"),
            Duration::ZERO,
        );

        let results = ValidationResults::aggregate(vec![clean.clone(), dirty], Duration::ZERO);
        assert_eq!(results.total_files, 2);
        assert_eq!(results.clean_files, 1);
        assert_eq!(results.files_with_issues, 1);
        assert_eq!(results.total_issues, 2);
        assert_eq!(results.file_results[0].path, PathBuf::from("a.html"));
        assert_eq!(results.exit_code(), EXIT_ISSUES);

        let results = ValidationResults::aggregate(vec![clean.clone()], Duration::ZERO);
        assert_eq!(results.exit_code(), EXIT_CLEAN);

        let failed = FileValidationResult::error(
            PathBuf::from("c.html"),
            ValidationError::Config("x".to_string()),
            Duration::ZERO,
        );
        let results = ValidationResults::aggregate(vec![clean, failed], Duration::ZERO);
        assert_eq!(results.exit_code(), EXIT_ERROR);
    }

    #[tokio::test]
    async fn test_engine_validates_directory() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::write(temp_dir.path().join("good.html"), CLEAN_PAGE)
            .await
            .unwrap();
        tokio::fs::write(temp_dir.path().join("bad.html"), "<!doctype html></span>")
            .await
            .unwrap();
        tokio::fs::write(temp_dir.path().join("skip.txt"), "</span>")
            .await
            .unwrap();

        let engine = ValidationEngine::new(ValidationConfig {
            max_concurrent_validations: 2,
            ..ValidationConfig::default()
        })
        .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |progress: ValidationProgress| {
            seen_clone.lock().unwrap().push(progress.completed);
            assert_eq!(progress.total, 2);
        });

        let results = engine
            .validate_path_with_progress(temp_dir.path(), &FileDiscovery::new(), Some(callback))
            .await
            .unwrap();

        assert_eq!(results.total_files, 2);
        assert_eq!(results.clean_files, 1);
        assert_eq!(results.files_with_issues, 1);
        assert!(results.file_results[0].path.ends_with("bad.html"));
        assert_eq!(
            results.file_results[0].issues[0].message(),
            "Unmatched closing tag </span> at pos 15"
        );

        let mut seen = seen.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_error_status() {
        let engine = ValidationEngine::new(ValidationConfig::default()).unwrap();
        let result = engine.validate_file(Path::new("/nonexistent/page.html")).await;
        assert!(result.status.is_error());
        assert!(result.issues.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_tolerated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.html");
        tokio::fs::write(&path, b"<!doctype html><p>caf\xe9</p>")
            .await
            .unwrap();

        let engine = ValidationEngine::new(ValidationConfig::default()).unwrap();
        let result = engine.validate_file(&path).await;
        assert!(result.status.is_clean());
    }
}
