//! Structural and content issues reported by a validation pass.

use std::fmt;

use serde::{Serialize, Serializer};
use serde::ser::SerializeStruct;

/// What was found. Each variant carries the data needed to render its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// The document has no `<!doctype` declaration
    MissingDoctype,
    /// An opener discarded while recovering on a mismatched closer
    UnclosedBeforeClosing { tag: String, closing: String },
    /// A closer with no opener anywhere on the stack
    UnmatchedClosing { tag: String },
    /// An opener still on the stack at end of document
    Unclosed { tag: String },
    /// Ids used more than once, sorted
    DuplicateIds { ids: Vec<String> },
    /// Images without an `alt` attribute
    MissingAlt {
        count: usize,
        /// 1-based image indices, possibly truncated for display
        indices: Vec<usize>,
    },
    /// A watched function is called but never declared
    UndefinedFunction { name: String },
}

impl IssueKind {
    /// Stable machine-readable name, used in JSON output
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::MissingDoctype => "missing-doctype",
            IssueKind::UnclosedBeforeClosing { .. } => "unclosed-before-closing",
            IssueKind::UnmatchedClosing { .. } => "unmatched-closing",
            IssueKind::Unclosed { .. } => "unclosed",
            IssueKind::DuplicateIds { .. } => "duplicate-ids",
            IssueKind::MissingAlt { .. } => "missing-alt",
            IssueKind::UndefinedFunction { .. } => "undefined-function",
        }
    }
}

/// A single reported problem, with the byte offset of the tag that triggered it
/// when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: IssueKind,
    pub offset: Option<usize>,
}

impl Issue {
    pub fn new(kind: IssueKind) -> Self {
        Self { kind, offset: None }
    }

    pub fn at(kind: IssueKind, offset: usize) -> Self {
        Self {
            kind,
            offset: Some(offset),
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::MissingDoctype => write!(f, "Missing DOCTYPE"),
            IssueKind::UnclosedBeforeClosing { tag, closing } => {
                write!(f, "Unclosed tag <{}> before closing </{}>", tag, closing)?;
                if let Some(offset) = self.offset {
                    write!(f, " at pos {}", offset)?;
                }
                Ok(())
            }
            IssueKind::UnmatchedClosing { tag } => {
                write!(f, "Unmatched closing tag </{}>", tag)?;
                if let Some(offset) = self.offset {
                    write!(f, " at pos {}", offset)?;
                }
                Ok(())
            }
            IssueKind::Unclosed { tag } => write!(f, "Unclosed tag <{}>", tag),
            IssueKind::DuplicateIds { ids } => write!(f, "Duplicate id(s): {}", ids.join(", ")),
            IssueKind::MissingAlt { count, indices } => write!(
                f,
                "{} <img> tag(s) missing alt attribute (indices: {:?})",
                count, indices
            ),
            IssueKind::UndefinedFunction { name } => {
                write!(f, "`{}` is referenced but no definition found", name)
            }
        }
    }
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Issue", 3)?;
        state.serialize_field("kind", self.kind.code())?;
        state.serialize_field("message", &self.message())?;
        state.serialize_field("offset", &self.offset)?;
        state.end()
    }
}
