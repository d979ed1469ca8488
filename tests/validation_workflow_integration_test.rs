//! End-to-end checks of the document pipeline through the public API:
//! sanitize, tokenize, match, then the content checks in report order.

mod common;

use common::{BROKEN_PAGE, CLEAN_PAGE, write_page};
use rayon::prelude::*;
use tempfile::TempDir;
use validate_html::{
    ChecksConfig, DocumentValidator, FileDiscovery, IssueKind, StructuralMatcher,
    ValidationConfig, ValidationEngine, sanitize, tokenize, validate_document,
};

#[test]
fn test_discarded_tag_before_closer() {
    let mut matcher = StructuralMatcher::new();
    for event in tokenize("<div><p>text</div>") {
        matcher.feed(event);
    }
    assert!(matcher.open_tags().is_empty());

    let issues = matcher.finish();
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].kind,
        IssueKind::UnclosedBeforeClosing {
            tag: "p".to_string(),
            closing: "div".to_string(),
        }
    );
    assert_eq!(issues[0].offset, Some(12));
}

#[test]
fn test_image_without_alt() {
    let report = validate_document(r#"<img src="x.png">"#);
    assert!(
        report
            .messages()
            .contains(&"1 <img> tag(s) missing alt attribute (indices: [1])".to_string())
    );
}

#[test]
fn test_duplicate_id() {
    let report = validate_document(r#"<!doctype html><a id="a"></a><b id="a"></b>"#);
    assert_eq!(report.messages(), vec!["Duplicate id(s): a".to_string()]);
}

#[test]
fn test_dangling_function_reference() {
    let dangling = r#"<!doctype html><button onclick="addToCart(5)">Buy</button>"#;
    assert_eq!(
        validate_document(dangling).messages(),
        vec!["`addToCart` is referenced but no definition found".to_string()]
    );

    let defined = format!("{}<script>function addToCart(x) {{}}</script>", dangling);
    assert!(validate_document(&defined).is_clean());
}

#[test]
fn test_missing_doctype_reported_first() {
    let report = validate_document("<p>one</span>");
    let messages = report.messages();
    assert_eq!(messages[0], "Missing DOCTYPE");
    assert!(messages.len() > 1);

    for doctype in ["<!DOCTYPE html>", "<!doctype html>", "<!DocType html>"] {
        let report = validate_document(&format!("{}<p></p>", doctype));
        assert!(report.is_clean(), "{}: {:?}", doctype, report.messages());
    }
}

#[test]
fn test_unmatched_closing_tag() {
    let mut matcher = StructuralMatcher::new();
    for event in tokenize("</span>") {
        matcher.feed(event);
    }
    assert!(matcher.open_tags().is_empty());

    let issues = matcher.finish();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message(), "Unmatched closing tag </span> at pos 0");
}

#[test]
fn test_markup_inside_script_and_style_is_ignored() {
    let html = "<!doctype html><style>p > a { }</style><script>if (a < b) { x = '</div>'; }</script>";
    let sanitized = sanitize(html);
    assert_eq!(sanitized, "<!doctype html><style></style><script></script>");
    assert!(validate_document(html).is_clean());
}

#[test]
fn test_unterminated_script_reported_unclosed() {
    let report = validate_document("<!doctype html><p></p><script>let x = '<div>';");
    assert_eq!(report.messages(), vec!["Unclosed tag <script>".to_string()]);
}

#[test]
fn test_script_text_inside_style_keeps_later_issues() {
    let report = validate_document("<!doctype html><style>/* <script> */</style><div><p>x</div>");
    assert_eq!(
        report.messages(),
        vec!["Unclosed tag <p> before closing </div> at pos 39".to_string()]
    );
}

#[test]
fn test_script_closer_with_trailing_space() {
    let report = validate_document("<!doctype html><script>x</script ><div><p>x</div>");
    assert_eq!(
        report.messages(),
        vec!["Unclosed tag <p> before closing </div> at pos 41".to_string()]
    );
}

#[test]
fn test_single_quoted_alt_reported_missing() {
    let report = validate_document("<!doctype html><img src=x alt='y'>");
    assert_eq!(
        report.messages(),
        vec!["1 <img> tag(s) missing alt attribute (indices: [1])".to_string()]
    );
}

#[test]
fn test_alt_index_limit_is_configurable() {
    let page = "<!doctype html>".to_string() + &"<img src=x>".repeat(8);

    let default_report = validate_document(&page);
    assert_eq!(
        default_report.messages(),
        vec!["8 <img> tag(s) missing alt attribute (indices: [1, 2, 3, 4, 5])".to_string()]
    );

    let validator = DocumentValidator::new(ChecksConfig {
        alt_index_limit: 2,
        ..ChecksConfig::default()
    })
    .unwrap();
    assert_eq!(
        validator.validate(&page).messages(),
        vec!["8 <img> tag(s) missing alt attribute (indices: [1, 2])".to_string()]
    );
}

#[test]
fn test_validation_is_deterministic_across_threads() {
    let pages: Vec<String> = (0..64)
        .map(|i| {
            if i % 2 == 0 {
                CLEAN_PAGE.to_string()
            } else {
                format!("{}<div>{}</span>", BROKEN_PAGE, i)
            }
        })
        .collect();

    let sequential: Vec<Vec<String>> = pages
        .iter()
        .map(|page| validate_document(page).messages())
        .collect();
    let parallel: Vec<Vec<String>> = pages
        .par_iter()
        .map(|page| validate_document(page).messages())
        .collect();

    assert_eq!(sequential, parallel);
    assert!(parallel[0].is_empty());
    assert!(!parallel[1].is_empty());
}

#[tokio::test]
async fn test_engine_over_directory_tree() {
    let temp_dir = TempDir::new().unwrap();
    write_page(temp_dir.path(), "index.html", CLEAN_PAGE);
    write_page(temp_dir.path(), "blog/post.html", BROKEN_PAGE);
    write_page(temp_dir.path(), "blog/drafts/old.html", "</b>");
    write_page(temp_dir.path(), "blog/style.css", "p > a {}");

    let engine = ValidationEngine::new(ValidationConfig {
        max_concurrent_validations: 4,
        checks: ChecksConfig::default(),
    })
    .unwrap();

    let results = engine
        .validate_path(temp_dir.path(), &FileDiscovery::new())
        .await
        .unwrap();
    assert_eq!(results.total_files, 3);
    assert_eq!(results.clean_files, 1);
    assert_eq!(results.files_with_issues, 2);
    assert_eq!(results.total_issues, 6);

    let shallow = FileDiscovery::new().with_max_depth(Some(1));
    let results = engine
        .validate_path(temp_dir.path(), &shallow)
        .await
        .unwrap();
    assert_eq!(results.total_files, 2);
}
