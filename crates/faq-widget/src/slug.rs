use std::sync::LazyLock;

use regex::Regex;

use crate::model::Slug;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").expect("valid regex"));
static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Derive the deep-link slug for a question.
///
/// Lowercases and trims, turns whitespace runs into `-`, drops anything outside
/// `[A-Za-z0-9_-]`, then collapses repeated hyphens. Non-ASCII letters are dropped,
/// not transliterated.
pub fn slugify(text: &str) -> Slug {
    let lowered = text.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(lowered.trim(), "-");
    let stripped = NON_WORD.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUN.replace_all(&stripped, "-");
    Slug::from_normalized(collapsed.into_owned())
}
