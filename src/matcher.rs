//! Structural Matcher
//!
//! Pairs opening and closing tags with a stack of open element names. Anomalies
//! never stop the pass; each one becomes an [`Issue`] and matching continues.

use crate::issue::{Issue, IssueKind};
use crate::tokenizer::TagEvent;

/// Elements that never take a closing tag. Sorted, for binary search.
pub const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Whether `name` (lowercase) is a void element
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.binary_search(&name).is_ok()
}

/// How a closing tag is resolved against the current stack.
///
/// Decided from the position of the nearest same-named opener before the stack
/// is touched:
///
/// | nearest opener        | resolution                         |
/// |-----------------------|------------------------------------|
/// | on top                | `Matched`: pop it                  |
/// | `n` entries below top | `Recover`: report and pop `n`, then pop the opener |
/// | absent                | `Unmatched`: report, stack untouched |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseResolution {
    Matched,
    Recover { discard: usize },
    Unmatched,
}

impl CloseResolution {
    pub fn resolve(stack: &[String], name: &str) -> Self {
        match stack.iter().rposition(|open| open == name) {
            Some(index) if index + 1 == stack.len() => CloseResolution::Matched,
            Some(index) => CloseResolution::Recover {
                discard: stack.len() - index - 1,
            },
            None => CloseResolution::Unmatched,
        }
    }
}

/// Incremental matcher state for one validation pass
#[derive(Debug, Default, Clone)]
pub struct StructuralMatcher {
    stack: Vec<String>,
    issues: Vec<Issue>,
}

impl StructuralMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one tag event
    pub fn feed(&mut self, event: TagEvent<'_>) {
        if event.is_closing {
            self.close(event);
        } else if !is_void_tag(&event.name) && !event.is_self_closing() {
            self.stack.push(event.name);
        }
    }

    fn close(&mut self, event: TagEvent<'_>) {
        match CloseResolution::resolve(&self.stack, &event.name) {
            CloseResolution::Matched => {
                self.stack.pop();
            }
            CloseResolution::Recover { discard } => {
                for _ in 0..discard {
                    if let Some(tag) = self.stack.pop() {
                        self.issues.push(Issue::at(
                            IssueKind::UnclosedBeforeClosing {
                                tag,
                                closing: event.name.clone(),
                            },
                            event.offset,
                        ));
                    }
                }
                self.stack.pop();
            }
            CloseResolution::Unmatched => {
                self.issues.push(Issue::at(
                    IssueKind::UnmatchedClosing { tag: event.name },
                    event.offset,
                ));
            }
        }
    }

    /// Elements currently open, outermost first
    pub fn open_tags(&self) -> &[String] {
        &self.stack
    }

    /// End the pass: every element still open is reported, innermost first.
    pub fn finish(mut self) -> Vec<Issue> {
        while let Some(tag) = self.stack.pop() {
            self.issues.push(Issue::new(IssueKind::Unclosed { tag }));
        }
        self.issues
    }
}

/// Run a complete matcher pass over `events`
pub fn match_tags<'a, I>(events: I) -> Vec<Issue>
where
    I: IntoIterator<Item = TagEvent<'a>>,
{
    let mut matcher = StructuralMatcher::new();
    for event in events {
        matcher.feed(event);
    }
    matcher.finish()
}
