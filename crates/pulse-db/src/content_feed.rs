//! Database operations for the `content_feed` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pulse_core::ScrapedPost;

use crate::DbError;

/// A row from the `content_feed` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentFeedRow {
    pub id: i64,
    pub external_id: String,
    pub platform: String,
    pub creator_name: String,
    pub creator_handle: String,
    pub post_text: String,
    pub url: String,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub scraped_at: DateTime<Utc>,
    pub expertise_signal: Option<i32>,
    pub icp_relevance: Option<i32>,
    pub suggested_angle: Option<String>,
    pub scored_at: Option<DateTime<Utc>>,
    pub draft_text: Option<String>,
    pub draft_topic_tags: Option<Vec<String>>,
    pub draft_hook_type: Option<String>,
    pub draft_image_hint: Option<String>,
    pub draft_hashtags: Option<Vec<String>>,
    pub draft_source_urls: Option<String>,
    pub draft_continuity_ref: Option<String>,
    pub draft_status: String,
}

const ROW_COLUMNS: &str = "id, external_id, platform, creator_name, creator_handle, post_text, \
     url, likes, comments, shares, scraped_at, expertise_signal, icp_relevance, \
     suggested_angle, scored_at, draft_text, draft_topic_tags, draft_hook_type, \
     draft_image_hint, draft_hashtags, draft_source_urls, draft_continuity_ref, draft_status";

/// Score fields applied together with `scored_at` in a single update.
#[derive(Debug, Clone)]
pub struct ContentScoreUpdate {
    pub expertise_signal: i32,
    pub icp_relevance: i32,
    pub suggested_angle: String,
}

/// Draft fields applied when the generation stage succeeds for a record.
#[derive(Debug, Clone)]
pub struct NewDraft {
    pub draft_text: String,
    pub draft_topic_tags: Vec<String>,
    pub draft_hook_type: String,
    pub draft_image_hint: Option<String>,
    pub draft_hashtags: Vec<String>,
    pub draft_source_urls: Option<String>,
    pub draft_continuity_ref: Option<String>,
}

/// Inserts scraped posts, skipping any whose `(external_id, platform)` is
/// already stored.
///
/// Feed rows are immutable observations once scraped, so `ON CONFLICT DO
/// NOTHING` is the full strategy. Returns the number of newly inserted rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if an insert fails.
pub async fn upsert_content_posts(pool: &PgPool, posts: &[ScrapedPost]) -> Result<u64, DbError> {
    let mut inserted = 0u64;
    for post in posts {
        let result = sqlx::query(
            "INSERT INTO content_feed \
             (external_id, platform, creator_name, creator_handle, post_text, url, \
              likes, comments, shares) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (external_id, platform) DO NOTHING",
        )
        .bind(&post.external_id)
        .bind(post.platform.as_str())
        .bind(&post.creator_name)
        .bind(&post.creator_handle)
        .bind(&post.post_text)
        .bind(&post.url)
        .bind(post.likes)
        .bind(post.comments)
        .bind(post.shares)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

/// Returns up to `limit` unscored rows, most recently scraped first.
///
/// "Unscored" is exactly `scored_at IS NULL`; records whose scoring failed in
/// a previous run still match and are naturally retried.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unscored_content(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<ContentFeedRow>, DbError> {
    let rows = sqlx::query_as::<_, ContentFeedRow>(&format!(
        "SELECT {ROW_COLUMNS} FROM content_feed \
         WHERE scored_at IS NULL \
         ORDER BY scraped_at DESC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Writes the score annotation and stamps `scored_at` atomically.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has the given id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn apply_content_score(
    pool: &PgPool,
    id: i64,
    score: &ContentScoreUpdate,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE content_feed \
         SET expertise_signal = $1, icp_relevance = $2, suggested_angle = $3, \
             scored_at = NOW() \
         WHERE id = $4",
    )
    .bind(score.expertise_signal)
    .bind(score.icp_relevance)
    .bind(&score.suggested_angle)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Returns the top `limit` scored-but-undrafted rows by `expertise_signal`.
///
/// A candidate must be scored, have no draft text yet, and still be in the
/// initial `pending` status — records the review surface has already acted on
/// never come back through generation.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_draft_candidates(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<ContentFeedRow>, DbError> {
    let rows = sqlx::query_as::<_, ContentFeedRow>(&format!(
        "SELECT {ROW_COLUMNS} FROM content_feed \
         WHERE draft_text IS NULL \
           AND scored_at IS NOT NULL \
           AND draft_status = 'pending' \
         ORDER BY expertise_signal DESC NULLS LAST \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Writes a generated draft and moves the row to `generated`.
///
/// This is the pipeline's only write to `draft_status`; the approve/skip
/// transitions belong to the review surface.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has the given id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn apply_content_draft(pool: &PgPool, id: i64, draft: &NewDraft) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE content_feed \
         SET draft_text = $1, draft_topic_tags = $2, draft_hook_type = $3, \
             draft_image_hint = $4, draft_hashtags = $5, draft_source_urls = $6, \
             draft_continuity_ref = $7, draft_status = 'generated' \
         WHERE id = $8",
    )
    .bind(&draft.draft_text)
    .bind(&draft.draft_topic_tags)
    .bind(&draft.draft_hook_type)
    .bind(&draft.draft_image_hint)
    .bind(&draft.draft_hashtags)
    .bind(&draft.draft_source_urls)
    .bind(&draft.draft_continuity_ref)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Deletes feed rows scraped before `cutoff` that were never acted upon.
///
/// Approved and skipped rows are kept — those are the advisor's decisions.
/// Returns the number of rows deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_stale_content(pool: &PgPool, cutoff: DateTime<Utc>) -> Result<u64, DbError> {
    let result = sqlx::query(
        "DELETE FROM content_feed \
         WHERE scraped_at < $1 AND draft_status IN ('pending', 'generated')",
    )
    .bind(cutoff)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
