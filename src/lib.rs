//! # validate-html Library
//!
//! Lightweight structural validation of HTML documents without a conformant
//! parser. Script and style blocks are blanked, tags are scanned by a tolerant
//! tokenizer and paired on a stack, and a few content checks (DOCTYPE,
//! duplicate ids, images without alt text, dangling function references) run
//! over the raw text.
//!
//! ```
//! use validate_html::validate_document;
//!
//! let report = validate_document("<!doctype html><div><p>text</div>");
//! assert_eq!(
//!     report.messages(),
//!     vec!["Unclosed tag <p> before closing </div> at pos 27"]
//! );
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod error_reporter;
pub mod file_discovery;
pub mod issue;
pub mod matcher;
pub mod output;
pub mod sanitizer;
pub mod tokenizer;
pub mod validator;

pub use checks::{
    DEFAULT_ALT_INDEX_LIMIT, UndefinedFunctionCheck, check_doctype, check_duplicate_ids,
    check_missing_alt,
};
pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{ChecksConfig, Config, ConfigError, ConfigManager};
pub use error::ValidationError;
pub use error_reporter::ErrorReporter;
pub use file_discovery::FileDiscovery;
pub use issue::{Issue, IssueKind};
pub use matcher::{CloseResolution, StructuralMatcher, VOID_TAGS, is_void_tag, match_tags};
pub use output::Output;
pub use sanitizer::sanitize;
pub use tokenizer::{TagEvent, Tokenizer, tokenize};
pub use validator::{
    DocumentReport, DocumentValidator, EXIT_CLEAN, EXIT_ERROR, EXIT_ISSUES,
    FileValidationResult, ProgressCallback, ValidationConfig, ValidationEngine,
    ValidationProgress, ValidationResults, ValidationStatus, read_document, validate_document,
};
