//! Auxiliary content checks
//!
//! Independent scans over the original (unsanitized) document text. Each check
//! returns at most one [`Issue`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::issue::{Issue, IssueKind};

/// Default number of offending image indices shown in a missing-alt report
pub const DEFAULT_ALT_INDEX_LIMIT: usize = 5;

/// Cached regex for double-quoted `id` attributes
static ID_ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for `<img ...>` tags
static IMG_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for a double-quoted `alt` attribute inside an image tag
static ALT_ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();

fn id_attribute_regex() -> &'static Regex {
    ID_ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)(?:^|\s)id\s*=\s*"([^"]+)""#).expect("Failed to compile id regex")
    })
}

fn img_tag_regex() -> &'static Regex {
    IMG_TAG_REGEX
        .get_or_init(|| Regex::new(r"(?i)<img\b([^>]*)>").expect("Failed to compile img regex"))
}

fn alt_attribute_regex() -> &'static Regex {
    ALT_ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)\salt\s*=\s*""#).expect("Failed to compile alt regex")
    })
}

/// Report a document with no `<!doctype` declaration, in any case
pub fn check_doctype(html: &str) -> Option<Issue> {
    let declared = html
        .as_bytes()
        .windows(b"<!doctype".len())
        .any(|window| window.eq_ignore_ascii_case(b"<!doctype"));

    (!declared).then(|| Issue::new(IssueKind::MissingDoctype))
}

/// Report every `id` value that occurs more than once
pub fn check_duplicate_ids(html: &str) -> Option<Issue> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for caps in id_attribute_regex().captures_iter(html) {
        if let Some(value) = caps.get(1) {
            *counts.entry(value.as_str()).or_default() += 1;
        }
    }

    let ids: Vec<String> = counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(id, _)| id.to_string())
        .collect();

    (!ids.is_empty()).then(|| Issue::new(IssueKind::DuplicateIds { ids }))
}

/// Report images lacking an `alt` attribute.
///
/// The count covers every offending image; only the first `index_limit` 1-based
/// indices are listed.
pub fn check_missing_alt(html: &str, index_limit: usize) -> Option<Issue> {
    let missing: Vec<usize> = img_tag_regex()
        .captures_iter(html)
        .enumerate()
        .filter(|(_, caps)| {
            caps.get(1)
                .is_none_or(|attrs| !alt_attribute_regex().is_match(attrs.as_str()))
        })
        .map(|(index, _)| index + 1)
        .collect();

    if missing.is_empty() {
        return None;
    }

    Some(Issue::new(IssueKind::MissingAlt {
        count: missing.len(),
        indices: missing.into_iter().take(index_limit).collect(),
    }))
}

/// Detects calls to a named function that the document never declares.
///
/// Recognised declarations are `function name(`, `const name =`, `let name =`
/// and `var name =`.
#[derive(Debug, Clone)]
pub struct UndefinedFunctionCheck {
    name: String,
    call: Regex,
    declaration: Regex,
}

impl UndefinedFunctionCheck {
    pub fn new(name: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(name);
        let call = Regex::new(&format!(r"\b{escaped}\s*\("))?;
        let declaration = Regex::new(&format!(
            r"\bfunction\s+{escaped}\s*\(|\b(?:const|let|var)\s+{escaped}\s*="
        ))?;

        Ok(Self {
            name: name.to_string(),
            call,
            declaration,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, html: &str) -> Option<Issue> {
        let dangling = self.call.is_match(html) && !self.declaration.is_match(html);
        dangling.then(|| {
            Issue::new(IssueKind::UndefinedFunction {
                name: self.name.clone(),
            })
        })
    }
}
