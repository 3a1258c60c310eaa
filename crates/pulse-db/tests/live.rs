//! Live integration tests for pulse-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/pulse-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{Duration, Utc};
use pulse_core::types::{Platform, ScrapedPost};
use pulse_db::advisor_posts::{list_recent_advisor_posts, upsert_advisor_post, NewAdvisorPost};
use pulse_db::comment_feed::{
    apply_comment_score, delete_stale_comments, list_unscored_comments, upsert_comment_posts,
    CommentScoreUpdate,
};
use pulse_db::content_feed::{
    apply_content_draft, apply_content_score, delete_stale_content, list_draft_candidates,
    list_unscored_content, upsert_content_posts, ContentScoreUpdate, NewDraft,
};
use pulse_db::pipeline_runs::{
    complete_run, fail_run, latest_runs, try_start_run, RunCounts,
};
use pulse_db::DbError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn scraped_post(external_id: &str, platform: Platform) -> ScrapedPost {
    ScrapedPost {
        external_id: external_id.to_string(),
        platform,
        creator_name: "Jane Creator".to_string(),
        creator_handle: "jane".to_string(),
        creator_title: None,
        creator_company: None,
        post_text: "A post about RSU vesting schedules and estimated taxes.".to_string(),
        url: format!("https://example.com/{external_id}"),
        likes: 10,
        comments: 2,
        shares: 1,
        post_age_hours: None,
    }
}

fn comment_post(external_id: &str) -> ScrapedPost {
    ScrapedPost {
        creator_title: Some("CEO at Seriesly".to_string()),
        creator_company: Some("Seriesly".to_string()),
        post_age_hours: Some(4.5),
        ..scraped_post(external_id, Platform::Linkedin)
    }
}

fn content_score() -> ContentScoreUpdate {
    ContentScoreUpdate {
        expertise_signal: 72,
        icp_relevance: 64,
        suggested_angle: "Riff on vesting timing.".to_string(),
    }
}

fn comment_score(sn_lead: bool) -> CommentScoreUpdate {
    CommentScoreUpdate {
        icp_magnet: 70,
        engagement_window: 55,
        authority_positioning: 80,
        conversation_starter: 60,
        comment_priority: 67,
        topic_tag: "equity_comp".to_string(),
        sn_lead,
        suggested_comment: Some("The 83(b) angle here is underrated.".to_string()),
    }
}

async fn backdate_content(pool: &sqlx::PgPool, external_id: &str, days: i64) {
    sqlx::query("UPDATE content_feed SET scraped_at = NOW() - make_interval(days => $1::int) WHERE external_id = $2")
        .bind(days)
        .bind(external_id)
        .execute(pool)
        .await
        .expect("backdate content row");
}

async fn backdate_comment(pool: &sqlx::PgPool, external_id: &str, days: i64) {
    sqlx::query("UPDATE comment_feed SET scraped_at = NOW() - make_interval(days => $1::int) WHERE external_id = $2")
        .bind(days)
        .bind(external_id)
        .execute(pool)
        .await
        .expect("backdate comment row");
}

// ---------------------------------------------------------------------------
// Section 1: Content feed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn content_upsert_skips_duplicate_identity(pool: sqlx::PgPool) {
    let posts = vec![
        scraped_post("p1", Platform::Linkedin),
        scraped_post("p2", Platform::Linkedin),
    ];
    let inserted = upsert_content_posts(&pool, &posts).await.expect("insert");
    assert_eq!(inserted, 2);

    // Same external_id on a different platform is a different post.
    let again = vec![
        scraped_post("p1", Platform::Linkedin),
        scraped_post("p1", Platform::Twitter),
    ];
    let inserted = upsert_content_posts(&pool, &again).await.expect("insert");
    assert_eq!(inserted, 1, "only the cross-platform twin is new");

    let unscored = list_unscored_content(&pool, 10).await.expect("list");
    assert_eq!(unscored.len(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn rescrape_does_not_overwrite_scores(pool: sqlx::PgPool) {
    upsert_content_posts(&pool, &[scraped_post("p1", Platform::Linkedin)])
        .await
        .expect("insert");
    let row = &list_unscored_content(&pool, 10).await.expect("list")[0];
    apply_content_score(&pool, row.id, &content_score())
        .await
        .expect("score");

    // A later scrape observing the same post again must not reset anything.
    let mut rescrape = scraped_post("p1", Platform::Linkedin);
    rescrape.likes = 9999;
    upsert_content_posts(&pool, &[rescrape]).await.expect("re-upsert");

    let unscored = list_unscored_content(&pool, 10).await.expect("list");
    assert!(unscored.is_empty(), "scored row must stay scored");
}

#[sqlx::test(migrations = "../../migrations")]
async fn draft_candidates_are_scored_undrafted_by_signal(pool: sqlx::PgPool) {
    let posts = vec![
        scraped_post("low", Platform::Linkedin),
        scraped_post("high", Platform::Linkedin),
        scraped_post("unscored", Platform::Linkedin),
    ];
    upsert_content_posts(&pool, &posts).await.expect("insert");

    let rows = list_unscored_content(&pool, 10).await.expect("list");
    for row in &rows {
        if row.external_id == "unscored" {
            continue;
        }
        let mut score = content_score();
        score.expertise_signal = if row.external_id == "high" { 90 } else { 30 };
        apply_content_score(&pool, row.id, &score).await.expect("score");
    }

    let candidates = list_draft_candidates(&pool, 10).await.expect("candidates");
    assert_eq!(candidates.len(), 2, "unscored rows are not draftable");
    assert_eq!(candidates[0].external_id, "high");

    let draft = NewDraft {
        draft_text: "Draft body.".to_string(),
        draft_topic_tags: vec!["equity_comp".to_string()],
        draft_hook_type: "contrarian".to_string(),
        draft_image_hint: None,
        draft_hashtags: vec![],
        draft_source_urls: None,
        draft_continuity_ref: None,
    };
    apply_content_draft(&pool, candidates[0].id, &draft)
        .await
        .expect("draft");

    let candidates = list_draft_candidates(&pool, 10).await.expect("candidates");
    assert_eq!(candidates.len(), 1, "drafted row leaves the candidate pool");
    assert_eq!(candidates[0].external_id, "low");
}

#[sqlx::test(migrations = "../../migrations")]
async fn content_sweep_only_removes_old_unapproved_rows(pool: sqlx::PgPool) {
    let posts = vec![
        scraped_post("old", Platform::Linkedin),
        scraped_post("fresh", Platform::Linkedin),
        scraped_post("approved", Platform::Linkedin),
    ];
    upsert_content_posts(&pool, &posts).await.expect("insert");
    backdate_content(&pool, "old", 45).await;
    backdate_content(&pool, "approved", 45).await;
    sqlx::query("UPDATE content_feed SET draft_status = 'approved' WHERE external_id = 'approved'")
        .execute(&pool)
        .await
        .expect("approve");

    let cutoff = Utc::now() - Duration::days(30);
    let swept = delete_stale_content(&pool, cutoff).await.expect("sweep");
    assert_eq!(swept, 1, "only the old pending row is swept");

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_feed")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(remaining, 2);
}

// ---------------------------------------------------------------------------
// Section 2: Comment feed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn comment_annotation_is_atomic(pool: sqlx::PgPool) {
    upsert_comment_posts(&pool, &[comment_post("c1")])
        .await
        .expect("insert");
    let row = &list_unscored_comments(&pool, 10).await.expect("list")[0];
    assert_eq!(row.creator_title, "CEO at Seriesly");
    assert!((row.post_age_hours.expect("age") - 4.5).abs() < f64::EPSILON);

    apply_comment_score(&pool, row.id, &comment_score(true))
        .await
        .expect("score");

    let unscored = list_unscored_comments(&pool, 10).await.expect("list");
    assert!(unscored.is_empty());

    let (sn_lead, suggested): (bool, Option<String>) = sqlx::query_as(
        "SELECT sn_lead, suggested_comment FROM comment_feed WHERE external_id = 'c1'",
    )
    .fetch_one(&pool)
    .await
    .expect("fetch");
    assert!(sn_lead);
    assert!(suggested.expect("comment").contains("83(b)"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn comment_sweep_spares_commented_rows(pool: sqlx::PgPool) {
    upsert_comment_posts(&pool, &[comment_post("old"), comment_post("acted")])
        .await
        .expect("insert");
    backdate_comment(&pool, "old", 10).await;
    backdate_comment(&pool, "acted", 10).await;
    sqlx::query("UPDATE comment_feed SET commented = TRUE WHERE external_id = 'acted'")
        .execute(&pool)
        .await
        .expect("mark commented");

    let cutoff = Utc::now() - Duration::days(7);
    let swept = delete_stale_comments(&pool, cutoff).await.expect("sweep");
    assert_eq!(swept, 1);

    let kept: String =
        sqlx::query_scalar("SELECT external_id FROM comment_feed")
            .fetch_one(&pool)
            .await
            .expect("fetch");
    assert_eq!(kept, "acted", "commented rows survive retention");
}

// ---------------------------------------------------------------------------
// Section 3: Advisor posts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn advisor_post_upsert_refreshes_engagement(pool: sqlx::PgPool) {
    let mut post = NewAdvisorPost {
        post_text: "Most clients postpone the estate conversation.".to_string(),
        linkedin_url: "https://www.linkedin.com/posts/ja-1".to_string(),
        posted_at: Utc::now() - Duration::days(3),
        likes: 10,
        comments_count: 1,
        shares: 0,
    };
    upsert_advisor_post(&pool, &post).await.expect("insert");

    post.likes = 42;
    post.comments_count = 7;
    upsert_advisor_post(&pool, &post).await.expect("refresh");

    let rows = list_recent_advisor_posts(&pool, 10).await.expect("list");
    assert_eq!(rows.len(), 1, "url is the identity");
    assert_eq!(rows[0].likes, 42);
    assert_eq!(rows[0].comments_count, 7);
    assert_eq!(rows[0].source, "auto_sync", "refresh marks the row synced");
}

// ---------------------------------------------------------------------------
// Section 4: Run log and lock
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn run_lock_blocks_concurrent_runs_of_same_pipeline(pool: sqlx::PgPool) {
    let run = try_start_run(&pool, "content", 900.0)
        .await
        .expect("start")
        .expect("lock acquired");
    assert_eq!(run.status, "running");

    let second = try_start_run(&pool, "content", 900.0).await.expect("start");
    assert!(second.is_none(), "second content run must be refused");

    // A different pipeline is unaffected.
    let other = try_start_run(&pool, "comments", 900.0).await.expect("start");
    assert!(other.is_some());

    complete_run(
        &pool,
        run.id,
        RunCounts {
            results: 5,
            scored: 3,
            errors: 1,
        },
    )
    .await
    .expect("complete");

    let third = try_start_run(&pool, "content", 900.0).await.expect("start");
    assert!(third.is_some(), "lock releases on completion");
}

#[sqlx::test(migrations = "../../migrations")]
async fn stale_running_rows_are_reaped(pool: sqlx::PgPool) {
    let run = try_start_run(&pool, "content", 900.0)
        .await
        .expect("start")
        .expect("lock acquired");
    sqlx::query("UPDATE pipeline_runs SET started_at = NOW() - INTERVAL '20 minutes' WHERE id = $1")
        .bind(run.id)
        .execute(&pool)
        .await
        .expect("backdate run");

    let next = try_start_run(&pool, "content", 900.0)
        .await
        .expect("start")
        .expect("stale lock must not block forever");
    assert_ne!(next.id, run.id);

    let (status, message): (String, Option<String>) =
        sqlx::query_as("SELECT status, error_message FROM pipeline_runs WHERE id = $1")
            .bind(run.id)
            .fetch_one(&pool)
            .await
            .expect("fetch reaped row");
    assert_eq!(status, "failed");
    assert!(message.expect("message").contains("reaped"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn completing_a_non_running_row_is_not_found(pool: sqlx::PgPool) {
    let run = try_start_run(&pool, "content", 900.0)
        .await
        .expect("start")
        .expect("lock acquired");
    fail_run(&pool, run.id, RunCounts::default(), "scrape provider down")
        .await
        .expect("fail");

    let err = complete_run(&pool, run.id, RunCounts::default())
        .await
        .expect_err("terminal rows are immutable");
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
async fn latest_runs_reports_one_row_per_pipeline(pool: sqlx::PgPool) {
    for _ in 0..2 {
        let run = try_start_run(&pool, "content", 900.0)
            .await
            .expect("start")
            .expect("lock");
        complete_run(&pool, run.id, RunCounts::default())
            .await
            .expect("complete");
    }
    let comments = try_start_run(&pool, "comments", 900.0)
        .await
        .expect("start")
        .expect("lock");

    let latest = latest_runs(&pool).await.expect("latest");
    assert_eq!(latest.len(), 2);
    let content = latest
        .iter()
        .find(|r| r.pipeline == "content")
        .expect("content entry");
    assert_eq!(content.status, "completed");
    let running = latest
        .iter()
        .find(|r| r.pipeline == "comments")
        .expect("comments entry");
    assert_eq!(running.id, comments.id);
}
