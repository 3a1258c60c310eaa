use serde::{Deserialize, Serialize};

/// Source platform of a scraped post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Twitter,
    Tiktok,
}

impl Platform {
    /// Stable string form, used as the store's `platform` column value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized piece of third-party content, ready for the store.
///
/// Produced by the platform adapters in `pulse-scraper`. Identity is
/// `(external_id, platform)`. Engagement counts are present-but-zero, never
/// absent: a zero here is a real observation and drives the scoring rubric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedPost {
    pub external_id: String,
    pub platform: Platform,
    pub creator_name: String,
    pub creator_handle: String,
    /// Author headline; only populated by the comment-feed adapter.
    pub creator_title: Option<String>,
    pub creator_company: Option<String>,
    /// Sanitized post body (see [`crate::text::sanitize_text`]).
    pub post_text: String,
    pub url: String,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    /// Estimated age at scrape time; comment pipeline only.
    pub post_age_hours: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serializes_lowercase() {
        let json = serde_json::to_string(&Platform::Linkedin).expect("serialize");
        assert_eq!(json, "\"linkedin\"");
    }

    #[test]
    fn platform_round_trips() {
        for p in [Platform::Linkedin, Platform::Twitter, Platform::Tiktok] {
            let json = serde_json::to_string(&p).expect("serialize");
            let back: Platform = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, p);
            assert_eq!(json.trim_matches('"'), p.as_str());
        }
    }
}
