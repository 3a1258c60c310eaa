//! Text hygiene for scraped content.
//!
//! Everything headed for the store or a model prompt passes through here first.
//! Scraper output is messy: truncated Unicode, NUL bytes smuggled through
//! JSON, hashtag walls, and bare-URL posts with no actual content.

use std::sync::LazyLock;

use regex::Regex;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));
static URL_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("valid url regex"));

/// Removes characters that are unsafe to store or embed in a prompt.
///
/// Drops NUL bytes and the noncharacters `U+FFFE`/`U+FFFF`. The model API is
/// documented to reject malformed surrogate pairs; a Rust `str` cannot
/// contain an unpaired surrogate (JSON decoding enforces this before any
/// text reaches us), so that guarantee holds by construction.
///
/// Pure and idempotent: `sanitize_text(sanitize_text(x)) == sanitize_text(x)`.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|&c| c != '\0' && c != '\u{FFFE}' && c != '\u{FFFF}')
        .collect()
}

/// Length in UTF-16 code units.
///
/// The provider-side limits this filter mirrors are expressed in UTF-16
/// units, so the thresholds below use the same measure rather than byte or
/// scalar-value counts.
#[must_use]
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Accept/reject heuristic applied to content-pipeline posts before they are
/// persisted or scored.
///
/// Rejects a post when any of the following hold:
/// - shorter than 20 UTF-16 code units;
/// - hashtag tokens outnumber 60% of whitespace tokens (exactly 60% passes);
/// - fewer than half the code units are ASCII letters (non-Latin content the
///   advisor cannot riff on);
/// - the trimmed text is nothing but a URL.
///
/// The comment pipeline deliberately does NOT use this filter — it needs
/// broader recall of near-real-time posts and applies a length check only.
#[must_use]
pub fn is_quality_post(text: &str) -> bool {
    let len = utf16_len(text);
    if len < 20 {
        return false;
    }

    #[allow(clippy::cast_precision_loss)]
    let hash_count = HASHTAG_RE.find_iter(text).count() as f64;
    #[allow(clippy::cast_precision_loss)]
    let word_count = text.split_whitespace().count().max(1) as f64;
    if hash_count / word_count > 0.6 {
        return false;
    }

    #[allow(clippy::cast_precision_loss)]
    let latin_ratio =
        text.chars().filter(char::is_ascii_alphabetic).count() as f64 / len as f64;
    if latin_ratio < 0.5 {
        return false;
    }

    if URL_ONLY_RE.is_match(text.trim()) {
        return false;
    }

    true
}

/// Total engagement normalized by post age.
///
/// Raw counts miss timing: 50 likes in 2 hours beats 500 likes in 3 days.
/// Ages under 30 minutes are clamped to 0.5h so brand-new posts don't produce
/// absurd velocities. A non-positive age returns the raw total.
#[must_use]
pub fn engagement_velocity(likes: i64, comments: i64, shares: i64, age_hours: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let total = (likes + comments + shares) as f64;
    if age_hours <= 0.0 {
        return total;
    }
    total / age_hours.max(0.5)
}

/// Number of whitespace-separated words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
#[path = "text_test.rs"]
mod tests;
