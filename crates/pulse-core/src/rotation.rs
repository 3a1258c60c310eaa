//! Date-seeded keyword rotation.
//!
//! The scrape provider is slow and rate-limited, and each pipeline run has a
//! hard wall-clock budget, so a run can only afford a few keywords. Rotating
//! a fixed-size window through the full list by day index covers the whole
//! list over consecutive days without any persisted rotation state. The
//! trade-off is that two runs on the same day revisit the same subset.

use chrono::Utc;

/// Selects the keyword window for a given day.
///
/// `start = (day_index * max_per_run) % len`, then `min(max_per_run, len)`
/// keywords taken from `start`, wrapping around the end of the list. Returns
/// an empty vec for an empty list.
#[must_use]
pub fn rotate_keywords(all_keywords: &[String], max_per_run: usize, day_index: u64) -> Vec<String> {
    if all_keywords.is_empty() || max_per_run == 0 {
        return Vec::new();
    }

    let len = all_keywords.len();
    #[allow(clippy::cast_possible_truncation)]
    let start = (day_index as usize).wrapping_mul(max_per_run) % len;

    (0..max_per_run.min(len))
        .map(|i| all_keywords[(start + i) % len].clone())
        .collect()
}

/// Days since the Unix epoch, the rotation seed for "today".
#[must_use]
pub fn current_day_index() -> u64 {
    let secs = Utc::now().timestamp().max(0);
    u64::try_from(secs).unwrap_or_default() / 86_400
}

/// Splits a newline-separated keyword field into trimmed, non-empty entries.
///
/// The profile stores keyword lists as one keyword per line, exactly as the
/// advisor types them into the settings UI.
#[must_use]
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("kw{i}")).collect()
    }

    #[test]
    fn selects_window_of_requested_size() {
        let all = keywords(7);
        let selected = rotate_keywords(&all, 3, 0);
        assert_eq!(selected, vec!["kw0", "kw1", "kw2"]);
    }

    #[test]
    fn wraps_around_the_list_boundary() {
        let all = keywords(7);
        // day 2: start = (2 * 3) % 7 = 6 → indices [6, 0, 1].
        let selected = rotate_keywords(&all, 3, 2);
        assert_eq!(selected, vec!["kw6", "kw0", "kw1"]);
    }

    #[test]
    fn seven_days_cover_the_full_list() {
        let all = keywords(7);
        let mut seen = std::collections::HashSet::new();
        for day in 0..7 {
            let selected = rotate_keywords(&all, 3, day);
            assert_eq!(selected.len(), 3, "day {day} window size");
            seen.extend(selected);
        }
        assert_eq!(seen.len(), 7, "rotation must cover every keyword");
    }

    #[test]
    fn short_list_is_returned_whole() {
        let all = keywords(2);
        let selected = rotate_keywords(&all, 3, 5);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn empty_list_yields_empty_selection() {
        assert!(rotate_keywords(&[], 3, 1).is_empty());
    }

    #[test]
    fn same_day_is_deterministic() {
        let all = keywords(11);
        assert_eq!(rotate_keywords(&all, 4, 9), rotate_keywords(&all, 4, 9));
    }

    #[test]
    fn parse_keyword_list_trims_and_drops_blanks() {
        let raw = "equity compensation\n  RSU tax strategy  \n\n\nwealth building\n";
        assert_eq!(
            parse_keyword_list(raw),
            vec!["equity compensation", "RSU tax strategy", "wealth building"]
        );
    }
}
