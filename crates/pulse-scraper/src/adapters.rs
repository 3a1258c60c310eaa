//! Normalizers from raw actor dataset items to [`ScrapedPost`].
//!
//! Each adapter returns `None` for items that are unusable (no text, fails
//! the quality gate) rather than erroring, so one malformed item never sinks
//! a batch. Alias lists are ordered by how current each actor schema is.

use chrono::{DateTime, Utc};
use pulse_core::text::{is_quality_post, sanitize_text, utf16_len};
use pulse_core::types::{Platform, ScrapedPost};
use serde_json::Value;

use crate::fields::{first_i64, first_str, first_timestamp};

/// Shown when an actor item carries no author name at all.
const UNKNOWN_CREATOR: &str = "Unknown";

/// Minimum comment-candidate length in UTF-16 code units. Comment targets
/// need enough substance to say something useful about; the content filter's
/// 20-unit floor is too permissive here.
const MIN_COMMENT_POST_LEN: usize = 30;

/// Comment-feed posts with no parseable timestamp are assumed half a day
/// old, which lands them mid-range on the recency score.
const DEFAULT_POST_AGE_HOURS: f64 = 12.0;

/// Normalizes one item from the LinkedIn post-search actor.
#[must_use]
pub fn normalize_linkedin_content(item: &Value) -> Option<ScrapedPost> {
    let text = sanitize_text(&first_str(item, &["text", "title", "postText", "content"])?);
    if !is_quality_post(&text) {
        return None;
    }

    let url = linkedin_post_url(item)?;

    Some(ScrapedPost {
        external_id: external_id(item, &["id", "urn"]),
        platform: Platform::Linkedin,
        creator_name: first_str(item, &["author.name", "authorName"])
            .unwrap_or_else(|| UNKNOWN_CREATOR.to_owned()),
        creator_handle: first_str(item, &["author.url", "authorUrl"]).unwrap_or_default(),
        creator_title: None,
        creator_company: None,
        post_text: text,
        url,
        likes: first_i64(item, &["engagement.likes", "numLikes", "likes"]).unwrap_or(0),
        comments: first_i64(item, &["engagement.comments", "numComments", "comments"])
            .unwrap_or(0),
        shares: first_i64(item, &["engagement.shares", "numShares", "shares"]).unwrap_or(0),
        post_age_hours: None,
    })
}

/// Normalizes one item from the tweet-scraper actor.
#[must_use]
pub fn normalize_twitter_content(item: &Value) -> Option<ScrapedPost> {
    let text = sanitize_text(&first_str(item, &["full_text", "text"])?);
    if !is_quality_post(&text) {
        return None;
    }

    let id = external_id(item, &["id_str", "id"]);
    let handle = first_str(item, &["user.screen_name", "author.userName"]).unwrap_or_default();
    let url_handle = if handle.is_empty() { "i" } else { &handle };
    let url = format!("https://x.com/{url_handle}/status/{id}");

    Some(ScrapedPost {
        external_id: id,
        platform: Platform::Twitter,
        creator_name: first_str(item, &["user.name", "author.name"])
            .unwrap_or_else(|| UNKNOWN_CREATOR.to_owned()),
        creator_handle: handle,
        creator_title: None,
        creator_company: None,
        post_text: text,
        url,
        likes: first_i64(item, &["favorite_count", "favouriteCount"]).unwrap_or(0),
        comments: first_i64(item, &["reply_count", "replyCount"]).unwrap_or(0),
        shares: first_i64(item, &["retweet_count", "retweetCount"]).unwrap_or(0),
        post_age_hours: None,
    })
}

/// Normalizes one item from the TikTok scraper actor. The video caption is
/// the post text.
#[must_use]
pub fn normalize_tiktok_content(item: &Value) -> Option<ScrapedPost> {
    let text = sanitize_text(&first_str(item, &["text", "desc", "description"])?);
    if !is_quality_post(&text) {
        return None;
    }

    let url = first_str(item, &["webVideoUrl", "url"])?;

    Some(ScrapedPost {
        external_id: external_id(item, &["id", "videoId"]),
        platform: Platform::Tiktok,
        // authorMeta.name is the @handle; nickName is the display name.
        creator_name: first_str(item, &["authorMeta.nickName", "authorMeta.name", "author"])
            .unwrap_or_else(|| UNKNOWN_CREATOR.to_owned()),
        creator_handle: first_str(item, &["authorMeta.name", "authorMeta.id"]).unwrap_or_default(),
        creator_title: None,
        creator_company: None,
        post_text: text,
        url,
        likes: first_i64(item, &["diggCount", "stats.diggCount"]).unwrap_or(0),
        comments: first_i64(item, &["commentCount", "stats.commentCount"]).unwrap_or(0),
        shares: first_i64(item, &["shareCount", "stats.shareCount"]).unwrap_or(0),
        post_age_hours: None,
    })
}

/// Normalizes one item from the LinkedIn post-search actor for the comment
/// pipeline.
///
/// Unlike [`normalize_linkedin_content`] this keeps author context (headline
/// and company, used for the authority score and Sales Navigator lead
/// matching) and estimates the post's age for the recency score. The gate is
/// length-only: a hashtag-heavy founder post can still be a good comment
/// target.
#[must_use]
pub fn normalize_linkedin_comment(item: &Value) -> Option<ScrapedPost> {
    let text = sanitize_text(&first_str(item, &["text", "title", "postText", "content"])?);
    if utf16_len(&text) < MIN_COMMENT_POST_LEN {
        return None;
    }

    let url = linkedin_post_url(item)?;

    // Rounded to a tenth of an hour; finer precision is noise to the rubric.
    #[allow(clippy::cast_precision_loss)]
    let post_age_hours = first_timestamp(item, &["postedAt", "publishedAt", "postedDate"])
        .map_or(DEFAULT_POST_AGE_HOURS, |posted| {
            let minutes = Utc::now().signed_duration_since(posted).num_minutes();
            (minutes.max(0) as f64 / 60.0 * 10.0).round() / 10.0
        });

    Some(ScrapedPost {
        external_id: external_id(item, &["id", "urn"]),
        platform: Platform::Linkedin,
        creator_name: first_str(item, &["author.name", "authorName"])
            .unwrap_or_else(|| UNKNOWN_CREATOR.to_owned()),
        creator_handle: first_str(item, &["author.url", "authorUrl"]).unwrap_or_default(),
        creator_title: first_str(item, &["author.headline", "authorHeadline"]),
        creator_company: first_str(item, &["author.company", "authorCompany"]),
        post_text: text,
        url,
        likes: first_i64(item, &["engagement.likes", "numLikes", "likes"]).unwrap_or(0),
        comments: first_i64(item, &["engagement.comments", "numComments", "comments"])
            .unwrap_or(0),
        shares: first_i64(item, &["engagement.shares", "numShares", "shares"]).unwrap_or(0),
        post_age_hours: Some(post_age_hours),
    })
}

/// One of the advisor's own LinkedIn posts, destined for the style-history
/// store. Identity is the post URL, so items without one are dropped.
#[derive(Debug, Clone)]
pub struct AdvisorHistoryPost {
    pub author_name: String,
    pub post_text: String,
    pub linkedin_url: String,
    pub posted_at: DateTime<Utc>,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
}

/// Minimum advisor-post length in UTF-16 code units. Short reshares and
/// congratulation one-liners carry no style signal.
const MIN_HISTORY_POST_LEN: usize = 10;

/// Normalizes one item from a date-sorted LinkedIn search for the advisor's
/// own name. Author-name matching against the profile happens downstream;
/// this only enforces the length and URL gates.
#[must_use]
pub fn normalize_advisor_history(item: &Value) -> Option<AdvisorHistoryPost> {
    let text = sanitize_text(&first_str(item, &["text", "title", "postText", "content"])?);
    if utf16_len(&text) < MIN_HISTORY_POST_LEN {
        return None;
    }

    let linkedin_url = linkedin_post_url(item)?;

    Some(AdvisorHistoryPost {
        author_name: first_str(item, &["author.name", "authorName"]).unwrap_or_default(),
        post_text: text,
        linkedin_url,
        posted_at: first_timestamp(item, &["postedAt", "publishedAt", "postedDate"])
            .unwrap_or_else(Utc::now),
        likes: first_i64(item, &["engagement.likes", "numLikes", "likes"]).unwrap_or(0),
        comments: first_i64(item, &["engagement.comments", "numComments", "comments"])
            .unwrap_or(0),
        shares: first_i64(item, &["engagement.shares", "numShares", "shares"]).unwrap_or(0),
    })
}

/// Canonical post URL for LinkedIn items, reconstructing one from the share
/// URN when the actor omits the direct link.
fn linkedin_post_url(item: &Value) -> Option<String> {
    first_str(item, &["linkedinUrl", "url", "postUrl"]).or_else(|| {
        first_str(item, &["shareUrn"])
            .map(|urn| format!("https://www.linkedin.com/feed/update/{urn}"))
    })
}

/// Pulls a stable external id, minting a random one when the actor omits it.
/// A minted id still dedupes within the store because the post URL is stable
/// across runs for LinkedIn and TikTok; for the rare id-less item, double
/// ingestion is preferable to dropping it.
fn external_id(item: &Value, paths: &[&str]) -> String {
    first_str(item, paths)
        .or_else(|| first_i64(item, paths).map(|n| n.to_string()))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
#[path = "adapters_test.rs"]
mod tests;
