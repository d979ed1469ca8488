//! Content Sanitizer
//!
//! Blanks the contents of `<script>` and `<style>` blocks so that angle brackets
//! inside embedded code are never mistaken for tags by the tokenizer.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Cached regex for a script or style opener
static BLOCK_OPENER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for `</script>`, tolerating whitespace before the `>`
static SCRIPT_CLOSER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for `</style>`, tolerating whitespace before the `>`
static STYLE_CLOSER_REGEX: OnceLock<Regex> = OnceLock::new();

fn block_opener_regex() -> &'static Regex {
    BLOCK_OPENER_REGEX.get_or_init(|| {
        Regex::new(r"(?i)<(script|style)\b[^>]*>").expect("Failed to compile block opener regex")
    })
}

fn closer_regex(tag: &str) -> &'static Regex {
    if tag == "script" {
        SCRIPT_CLOSER_REGEX.get_or_init(|| {
            Regex::new(r"(?i)</script\s*>").expect("Failed to compile script closer regex")
        })
    } else {
        STYLE_CLOSER_REGEX.get_or_init(|| {
            Regex::new(r"(?i)</style\s*>").expect("Failed to compile style closer regex")
        })
    }
}

/// Replace every script and style block with an empty instance of that block.
///
/// Blocks are found left to right: the earliest opener of either kind runs to
/// its own closer, so a `<style>` inside a script body is just script text.
/// Closed blocks become `<script></script>` / `<style></style>`. A block that is
/// never closed swallows the rest of the document and leaves only a bare opener
/// behind, which the structural matcher then reports as unclosed. The result is
/// never longer than the input, and is borrowed when there was nothing to blank.
pub fn sanitize(html: &str) -> Cow<'_, str> {
    let opener_regex = block_opener_regex();
    if !opener_regex.is_match(html) {
        return Cow::Borrowed(html);
    }

    let mut sanitized = String::with_capacity(html.len());
    let mut cursor = 0;

    while let Some(opener) = opener_regex.captures_at(html, cursor) {
        let (Some(whole), Some(name)) = (opener.get(0), opener.get(1)) else {
            break;
        };
        let tag = name.as_str().to_ascii_lowercase();
        sanitized.push_str(&html[cursor..whole.start()]);

        match closer_regex(&tag).find_at(html, whole.end()) {
            Some(closer) => {
                sanitized.push_str(&format!("<{tag}></{tag}>"));
                cursor = closer.end();
            }
            None => {
                sanitized.push_str(&format!("<{tag}>"));
                cursor = html.len();
            }
        }
    }

    sanitized.push_str(&html[cursor..]);
    Cow::Owned(sanitized)
}
