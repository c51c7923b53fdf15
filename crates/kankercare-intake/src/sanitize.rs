//! Free-text sanitization
//!
//! Strips markup that could execute when user input is echoed back into a
//! page: `<script>` blocks, `javascript:` URLs and inline event handlers.
//! Removal runs to a fixed point so fragments cannot reassemble into a new
//! payload once an inner match is cut out.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Maximum characters kept per string field
pub const MAX_TEXT_CHARS: usize = 1000;

/// Maximum elements kept per list field
pub const MAX_LIST_ITEMS: usize = 100;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<\s*script\b[^>]*>.*?<\s*/\s*script\s*>").expect("valid script block pattern")
});

static SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/?\s*script\b[^>]*(?:>|$)").expect("valid script tag pattern")
});

static JAVASCRIPT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("valid javascript url pattern"));

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+\s*=").expect("valid event handler pattern"));

/// Remove script blocks, `javascript:` fragments and inline event handlers,
/// then trim surrounding whitespace.
pub fn sanitize(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = strip_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}

fn strip_once(input: &str) -> String {
    let out = SCRIPT_BLOCK.replace_all(input, "");
    let out = SCRIPT_TAG.replace_all(&out, "");
    let out = JAVASCRIPT_URL.replace_all(&out, "");
    EVENT_HANDLER.replace_all(&out, "").into_owned()
}

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}

/// Sanitize and cap a single string field.
pub fn clean_text(input: &str) -> String {
    truncate_chars(&sanitize(input), MAX_TEXT_CHARS)
}

/// Cap a list field and sanitize each element.
pub fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .take(MAX_LIST_ITEMS)
        .map(|item| clean_text(item))
        .collect()
}

/// Sanitize every field of a JSON object record.
///
/// Strings are sanitized and capped at [`MAX_TEXT_CHARS`], arrays are capped
/// at [`MAX_LIST_ITEMS`] with string elements sanitized, nested objects are
/// handled recursively and every other value passes through unchanged.
pub fn sanitize_record(record: &Map<String, Value>) -> Map<String, Value> {
    record
        .iter()
        .map(|(key, value)| (key.clone(), sanitize_value(value)))
        .collect()
}

fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(clean_text(s)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .take(MAX_LIST_ITEMS)
                .map(|item| match item {
                    Value::String(s) => Value::String(clean_text(s)),
                    other => other.clone(),
                })
                .collect(),
        ),
        Value::Object(map) => Value::Object(sanitize_record(map)),
        other => other.clone(),
    }
}

/// Records that can produce a sanitized copy of themselves
pub trait Sanitize {
    /// Return a copy with every free-text field cleaned
    fn sanitized(&self) -> Self;
}
