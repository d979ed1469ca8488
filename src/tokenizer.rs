//! Tag Tokenizer
//!
//! A small hand-written scanner that recognises tags in (sanitized) markup:
//!
//! ```text
//! tag        = "<" [ "/" ] name attributes ">"
//! name       = 1*( ALPHA / DIGIT / ":" / "-" )
//! attributes = *( any byte except ">" )
//! ```
//!
//! The scanner is tolerant. Attribute syntax is not checked and quotes are not
//! honoured, so the first `>` after the name always ends the tag. A `<` that does
//! not start a tag is treated as text and scanning resumes at the next byte.

use std::iter::FusedIterator;

use serde::Serialize;

/// One opening or closing tag found in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEvent<'a> {
    /// `true` for `</name ...>`
    pub is_closing: bool,
    /// Tag name, lowercased. Never empty.
    pub name: String,
    /// Everything between the name and the closing `>`, untouched
    pub raw_attributes: &'a str,
    /// Byte offset of the `<` in the scanned text
    pub offset: usize,
}

impl TagEvent<'_> {
    /// Whether an opening tag ends with an explicit `/` marker, e.g. `<br/>` or
    /// `<custom-el a="b" />`.
    pub fn is_self_closing(&self) -> bool {
        !self.is_closing && self.raw_attributes.trim_end().ends_with('/')
    }
}

/// Lazy iterator over the tags of a document.
///
/// Cloning a tokenizer, or calling [`tokenize`] again on the same text, restarts
/// the scan and yields the identical sequence.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Try to read a tag whose `<` sits at `start`. Returns the event and the
    /// position just past its `>`.
    fn scan_tag(&self, start: usize) -> TagScan<'a> {
        let bytes = self.source.as_bytes();
        let mut cursor = start + 1;

        let is_closing = bytes.get(cursor) == Some(&b'/');
        if is_closing {
            cursor += 1;
        }

        let name_start = cursor;
        while cursor < bytes.len() && is_name_byte(bytes[cursor]) {
            cursor += 1;
        }
        if cursor == name_start {
            return TagScan::NotATag;
        }
        let name_end = cursor;

        let Some(gt) = self.source[name_end..].find('>') else {
            return TagScan::Exhausted;
        };
        let close = name_end + gt;

        TagScan::Tag(
            TagEvent {
                is_closing,
                name: self.source[name_start..name_end].to_ascii_lowercase(),
                raw_attributes: &self.source[name_end..close],
                offset: start,
            },
            close + 1,
        )
    }
}

enum TagScan<'a> {
    Tag(TagEvent<'a>, usize),
    NotATag,
    /// No `>` remains anywhere in the input, so no further tag can match
    Exhausted,
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = TagEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(found) = self.source[self.pos..].find('<') {
            let start = self.pos + found;
            match self.scan_tag(start) {
                TagScan::Tag(event, end) => {
                    self.pos = end;
                    return Some(event);
                }
                TagScan::NotATag => self.pos = start + 1,
                TagScan::Exhausted => break,
            }
        }
        self.pos = self.source.len();
        None
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Scan `source` for tags
pub fn tokenize(source: &str) -> Tokenizer<'_> {
    Tokenizer::new(source)
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b':' || byte == b'-'
}
