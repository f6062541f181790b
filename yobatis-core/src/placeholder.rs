//! `${key}` placeholder helpers.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]*)\}").expect("Invalid placeholder regex"));

/// Check whether the text contains at least one `${...}` placeholder.
pub fn has_placeholder(text: &str) -> bool {
    PLACEHOLDER_RE.is_match(text)
}

/// The keys of every placeholder in the text, in order of appearance.
pub fn placeholder_keys(text: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Replace every placeholder the lookup knows about, in a single pass.
///
/// Keys are trimmed before lookup. Placeholders the lookup returns `None`
/// for are left untouched, and replacement values are not scanned again.
pub fn substitute<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| {
            lookup(caps[1].trim()).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
