//! Database operations for the `advisor_posts` table.
//!
//! Unlike the feed tables, these rows are living metrics: the post-history
//! sync re-scrapes the advisor's own posts and refreshes engagement counts
//! in place, keyed by `linkedin_url`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `advisor_posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdvisorPostRow {
    pub id: i64,
    pub post_text: String,
    pub linkedin_url: String,
    pub posted_at: DateTime<Utc>,
    pub likes: i64,
    pub comments_count: i64,
    pub shares: i64,
    pub topic_tags: Option<Vec<String>>,
    pub hook_type: Option<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An advisor post observed by the post-history sync.
#[derive(Debug, Clone)]
pub struct NewAdvisorPost {
    pub post_text: String,
    pub linkedin_url: String,
    pub posted_at: DateTime<Utc>,
    pub likes: i64,
    pub comments_count: i64,
    pub shares: i64,
}

/// Inserts an advisor post or refreshes its engagement counts on conflict.
///
/// Identity fields (`post_text`, `posted_at`) are only set on first insert;
/// a conflicting row keeps them and takes the new `likes`/`comments_count`/
/// `shares` plus a fresh `updated_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_advisor_post(pool: &PgPool, post: &NewAdvisorPost) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO advisor_posts \
         (post_text, linkedin_url, posted_at, likes, comments_count, shares, source) \
         VALUES ($1, $2, $3, $4, $5, $6, 'auto_sync') \
         ON CONFLICT (linkedin_url) DO UPDATE SET \
             likes = EXCLUDED.likes, \
             comments_count = EXCLUDED.comments_count, \
             shares = EXCLUDED.shares, \
             updated_at = NOW()",
    )
    .bind(&post.post_text)
    .bind(&post.linkedin_url)
    .bind(post.posted_at)
    .bind(post.likes)
    .bind(post.comments_count)
    .bind(post.shares)
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns the `limit` most recent advisor posts.
///
/// The generation stage reads the topic tags and hook types off these rows
/// to build its anti-repetition exclusion lists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_advisor_posts(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<AdvisorPostRow>, DbError> {
    let rows = sqlx::query_as::<_, AdvisorPostRow>(
        "SELECT id, post_text, linkedin_url, posted_at, likes, comments_count, shares, \
                topic_tags, hook_type, source, created_at, updated_at \
         FROM advisor_posts \
         ORDER BY posted_at DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
