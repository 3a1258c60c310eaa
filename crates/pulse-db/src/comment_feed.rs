//! Database operations for the `comment_feed` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pulse_core::ScrapedPost;

use crate::DbError;

/// A row from the `comment_feed` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentFeedRow {
    pub id: i64,
    pub external_id: String,
    pub platform: String,
    pub creator_name: String,
    pub creator_handle: String,
    pub creator_title: String,
    pub creator_company: String,
    pub post_text: String,
    pub url: String,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub post_age_hours: Option<f64>,
    pub scraped_at: DateTime<Utc>,
    pub icp_magnet: Option<i32>,
    pub engagement_window: Option<i32>,
    pub authority_positioning: Option<i32>,
    pub conversation_starter: Option<i32>,
    pub comment_priority: Option<i32>,
    pub topic_tag: Option<String>,
    pub sn_lead: bool,
    pub suggested_comment: Option<String>,
    pub scored_at: Option<DateTime<Utc>>,
    pub commented: bool,
}

const ROW_COLUMNS: &str = "id, external_id, platform, creator_name, creator_handle, \
     creator_title, creator_company, post_text, url, likes, comments, shares, \
     post_age_hours, scraped_at, icp_magnet, engagement_window, authority_positioning, \
     conversation_starter, comment_priority, topic_tag, sn_lead, suggested_comment, \
     scored_at, commented";

/// Comment score annotation, applied together with the suggested comment and
/// the SN-lead flag in a single update.
#[derive(Debug, Clone)]
pub struct CommentScoreUpdate {
    pub icp_magnet: i32,
    pub engagement_window: i32,
    pub authority_positioning: i32,
    pub conversation_starter: i32,
    pub comment_priority: i32,
    pub topic_tag: String,
    pub sn_lead: bool,
    pub suggested_comment: Option<String>,
}

/// Inserts scraped posts, skipping already-stored `(external_id, platform)`
/// pairs. Same immutable-observation policy as the content feed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if an insert fails.
pub async fn upsert_comment_posts(pool: &PgPool, posts: &[ScrapedPost]) -> Result<u64, DbError> {
    let mut inserted = 0u64;
    for post in posts {
        let result = sqlx::query(
            "INSERT INTO comment_feed \
             (external_id, platform, creator_name, creator_handle, creator_title, \
              creator_company, post_text, url, likes, comments, shares, post_age_hours) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (external_id, platform) DO NOTHING",
        )
        .bind(&post.external_id)
        .bind(post.platform.as_str())
        .bind(&post.creator_name)
        .bind(&post.creator_handle)
        .bind(post.creator_title.as_deref().unwrap_or(""))
        .bind(post.creator_company.as_deref().unwrap_or(""))
        .bind(&post.post_text)
        .bind(&post.url)
        .bind(post.likes)
        .bind(post.comments)
        .bind(post.shares)
        .bind(post.post_age_hours)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

/// Returns up to `limit` unscored rows, most recently scraped first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unscored_comments(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<CommentFeedRow>, DbError> {
    let rows = sqlx::query_as::<_, CommentFeedRow>(&format!(
        "SELECT {ROW_COLUMNS} FROM comment_feed \
         WHERE scored_at IS NULL \
         ORDER BY scraped_at DESC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Writes the full comment annotation and stamps `scored_at` atomically.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has the given id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn apply_comment_score(
    pool: &PgPool,
    id: i64,
    score: &CommentScoreUpdate,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE comment_feed \
         SET icp_magnet = $1, engagement_window = $2, authority_positioning = $3, \
             conversation_starter = $4, comment_priority = $5, topic_tag = $6, \
             sn_lead = $7, suggested_comment = $8, scored_at = NOW() \
         WHERE id = $9",
    )
    .bind(score.icp_magnet)
    .bind(score.engagement_window)
    .bind(score.authority_positioning)
    .bind(score.conversation_starter)
    .bind(score.comment_priority)
    .bind(&score.topic_tag)
    .bind(score.sn_lead)
    .bind(&score.suggested_comment)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Deletes rows scraped before `cutoff` that the advisor never commented on.
///
/// Returns the number of rows deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_stale_comments(pool: &PgPool, cutoff: DateTime<Utc>) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM comment_feed WHERE scraped_at < $1 AND NOT commented")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
