//! Helpers for turning model output back into typed values.

use serde::de::DeserializeOwned;

use crate::error::AiError;

/// Strips markdown code fences the model sometimes wraps JSON in despite
/// instructions.
pub(crate) fn strip_code_fences(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parses a (possibly fenced) JSON document into `T`.
pub(crate) fn parse_json<T: DeserializeOwned>(context: &str, raw: &str) -> Result<T, AiError> {
    serde_json::from_str(strip_code_fences(raw)).map_err(|source| AiError::Parse {
        context: context.to_owned(),
        source,
    })
}

/// Truncates to at most `max_chars` characters; prompt inputs only need
/// enough of a post for the model to judge it.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Clamps a model-reported score into the 0-100 band the store expects.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn clamp_score(value: f64) -> i32 {
    value.round().clamp(0.0, 100.0) as i32
}
