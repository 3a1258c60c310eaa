//! Per-platform scrape entry points.
//!
//! Each content scrape fans out over the keyword list, one synchronous actor
//! run per keyword. A failed keyword is logged and skipped so the rest of the
//! batch still lands; partial data beats an empty run.
//!
//! These functions take their inputs by value so the futures they return own
//! everything they touch and stay `Send` across spawn and scheduler
//! boundaries.

use pulse_core::types::ScrapedPost;
use serde_json::json;
use tracing::{info, warn};

pub use crate::adapters::AdvisorHistoryPost;
use crate::adapters::{
    normalize_advisor_history, normalize_linkedin_comment, normalize_linkedin_content,
    normalize_tiktok_content, normalize_twitter_content,
};
use crate::client::ApifyClient;
use crate::error::ScraperError;

const LINKEDIN_ACTOR: &str = "harvestapi~linkedin-post-search";
const TWITTER_ACTOR: &str = "apidojo~tweet-scraper";
const TIKTOK_ACTOR: &str = "clockworks~tiktok-scraper";

const LINKEDIN_CONTENT_LIMIT: u32 = 20;
const TWITTER_CONTENT_LIMIT: u32 = 15;
const TIKTOK_CONTENT_LIMIT: u32 = 10;
const COMMENT_FEED_LIMIT: u32 = 15;
const POST_HISTORY_LIMIT: u32 = 30;

/// Scrapes LinkedIn posts for each keyword, normalized and quality-filtered.
pub async fn scrape_linkedin_content(
    client: ApifyClient,
    keywords: Vec<String>,
) -> Vec<ScrapedPost> {
    let mut results = Vec::new();
    for keyword in &keywords {
        let input = json!({
            "searchQueries": [keyword],
            "maxPosts": LINKEDIN_CONTENT_LIMIT,
            "sortBy": "relevance",
        });
        match client
            .run_actor_sync(LINKEDIN_ACTOR, &input, LINKEDIN_CONTENT_LIMIT)
            .await
        {
            Ok(items) => {
                let raw = items.len();
                let before = results.len();
                results.extend(items.iter().filter_map(normalize_linkedin_content));
                info!(keyword = %keyword, raw, kept = results.len() - before, "linkedin content scrape");
            }
            Err(error) => {
                warn!(keyword = %keyword, %error, "linkedin content scrape failed");
            }
        }
    }
    results
}

/// Scrapes top tweets for each keyword.
pub async fn scrape_twitter_content(
    client: ApifyClient,
    keywords: Vec<String>,
) -> Vec<ScrapedPost> {
    let mut results = Vec::new();
    for keyword in &keywords {
        let input = json!({
            "searchTerms": [keyword],
            "maxItems": TWITTER_CONTENT_LIMIT,
            "sort": "Top",
        });
        match client
            .run_actor_sync(TWITTER_ACTOR, &input, TWITTER_CONTENT_LIMIT)
            .await
        {
            Ok(items) => {
                let raw = items.len();
                let before = results.len();
                results.extend(items.iter().filter_map(normalize_twitter_content));
                info!(keyword = %keyword, raw, kept = results.len() - before, "twitter content scrape");
            }
            Err(error) => {
                warn!(keyword = %keyword, %error, "twitter content scrape failed");
            }
        }
    }
    results
}

/// Scrapes TikTok videos for each keyword; captions become post text.
pub async fn scrape_tiktok_content(
    client: ApifyClient,
    keywords: Vec<String>,
) -> Vec<ScrapedPost> {
    let mut results = Vec::new();
    for keyword in &keywords {
        let input = json!({
            "searchQueries": [keyword],
            "maxItems": TIKTOK_CONTENT_LIMIT,
        });
        match client
            .run_actor_sync(TIKTOK_ACTOR, &input, TIKTOK_CONTENT_LIMIT)
            .await
        {
            Ok(items) => {
                let raw = items.len();
                let before = results.len();
                results.extend(items.iter().filter_map(normalize_tiktok_content));
                info!(keyword = %keyword, raw, kept = results.len() - before, "tiktok content scrape");
            }
            Err(error) => {
                warn!(keyword = %keyword, %error, "tiktok content scrape failed");
            }
        }
    }
    results
}

/// Scrapes LinkedIn posts worth commenting on, keeping author context and
/// estimated post age for the scoring rubric.
pub async fn scrape_linkedin_comment_feed(
    client: ApifyClient,
    keywords: Vec<String>,
) -> Vec<ScrapedPost> {
    let mut results = Vec::new();
    for keyword in &keywords {
        let input = json!({
            "searchQueries": [keyword],
            "maxPosts": COMMENT_FEED_LIMIT,
            "sortBy": "relevance",
        });
        match client
            .run_actor_sync(LINKEDIN_ACTOR, &input, COMMENT_FEED_LIMIT)
            .await
        {
            Ok(items) => {
                let raw = items.len();
                let before = results.len();
                results.extend(items.iter().filter_map(normalize_linkedin_comment));
                info!(keyword = %keyword, raw, kept = results.len() - before, "comment feed scrape");
            }
            Err(error) => {
                warn!(keyword = %keyword, %error, "comment feed scrape failed");
            }
        }
    }
    results
}

/// Searches LinkedIn for the advisor's own recent posts, newest first.
///
/// This is a single search rather than a keyword fan-out, so failures
/// propagate instead of being swallowed. Author-name matching against the
/// profile is the caller's job.
///
/// # Errors
///
/// Returns the underlying [`ScraperError`] when the actor run fails.
pub async fn scrape_post_history(
    client: ApifyClient,
    advisor_name: String,
) -> Result<Vec<AdvisorHistoryPost>, ScraperError> {
    let input = json!({
        "searchQueries": [advisor_name],
        "maxPosts": POST_HISTORY_LIMIT,
        "sortBy": "date",
    });
    let items = client
        .run_actor_sync(LINKEDIN_ACTOR, &input, POST_HISTORY_LIMIT)
        .await?;
    let raw = items.len();
    let posts: Vec<AdvisorHistoryPost> =
        items.iter().filter_map(normalize_advisor_history).collect();
    info!(advisor_name = %advisor_name, raw, kept = posts.len(), "post history scrape");
    Ok(posts)
}
