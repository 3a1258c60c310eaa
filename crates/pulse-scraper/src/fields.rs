//! Field extraction over loosely-shaped actor output.
//!
//! Apify actors change their dataset schemas without notice, and the same
//! logical field shows up under different names across actor versions. Each
//! accessor takes an ordered list of dotted paths and returns the first one
//! that yields a usable value, so adapters read as alias tables instead of
//! nested `if let` chains.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Resolves a dotted path like `"engagement.likes"` against a JSON object.
fn walk<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = item;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Returns the first non-empty string found at any of `paths`.
#[must_use]
pub fn first_str(item: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| {
        walk(item, path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
    })
}

/// Returns the first numeric value found at any of `paths`.
///
/// Zero is a real count, not a missing field, so `0` is returned rather than
/// skipped. Floats are truncated. An array counts as its length, which covers
/// actors that return the raw list of reactions instead of a total.
#[must_use]
pub fn first_i64(item: &Value, paths: &[&str]) -> Option<i64> {
    paths.iter().find_map(|path| {
        let value = walk(item, path)?;
        if let Some(n) = value.as_i64() {
            return Some(n);
        }
        #[allow(clippy::cast_possible_truncation)]
        if let Some(f) = value.as_f64() {
            return Some(f as i64);
        }
        if let Some(arr) = value.as_array() {
            return i64::try_from(arr.len()).ok();
        }
        None
    })
}

/// Returns the first parseable timestamp found at any of `paths`.
///
/// Accepts RFC 3339 strings and integer epoch values; epoch values above
/// `10^12` are treated as milliseconds.
#[must_use]
pub fn first_timestamp(item: &Value, paths: &[&str]) -> Option<DateTime<Utc>> {
    paths.iter().find_map(|path| {
        let value = walk(item, path)?;
        if let Some(s) = value.as_str() {
            return DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc));
        }
        if let Some(n) = value.as_i64() {
            return if n > 1_000_000_000_000 {
                DateTime::from_timestamp_millis(n)
            } else {
                DateTime::from_timestamp(n, 0)
            };
        }
        None
    })
}
