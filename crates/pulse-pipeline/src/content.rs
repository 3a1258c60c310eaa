//! The content pipeline: scrape three platforms, score, draft, sweep.

use chrono::{Duration, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use pulse_ai::{generate_draft, score_content};
use pulse_core::rotation::{current_day_index, parse_keyword_list, rotate_keywords};
use pulse_db::content_feed::{self, ContentScoreUpdate, NewDraft};
use pulse_db::pipeline_runs::RunCounts;
use pulse_db::profile::{self, AdvisorProfileRow};
use pulse_scraper::{scrape_linkedin_content, scrape_tiktok_content, scrape_twitter_content};

use crate::{PipelineDeps, PipelineError};

/// Used until the advisor fills in their content keyword list.
const DEFAULT_CONTENT_KEYWORDS: &str =
    "equity compensation\nRSU tax strategy\nwealth building high earners";

/// Unscored posts picked up per run. Newest first, so a backlog never
/// starves fresh material.
const SCORING_BATCH_LIMIT: i64 = 50;

/// Drafts generated per run, from the highest expertise-signal candidates.
const DRAFT_BATCH_LIMIT: i64 = 8;

/// Advisor posts fed to the draft prompt for anti-repetition context.
const DRAFT_HISTORY_LIMIT: i64 = 15;

/// Undrafted feed rows older than this are swept.
const CONTENT_RETENTION_DAYS: i64 = 30;

pub(crate) async fn run(deps: &PipelineDeps, counts: &mut RunCounts) -> Result<(), PipelineError> {
    let profile = profile::get_advisor_profile(&deps.pool)
        .await?
        .unwrap_or_default();

    let all_keywords = keyword_pool(&profile);
    let keywords = rotate_keywords(
        &all_keywords,
        deps.config.max_keywords_per_run,
        current_day_index(),
    );
    info!(
        selected = keywords.len(),
        total = all_keywords.len(),
        ?keywords,
        "content keyword window"
    );

    let (linkedin, twitter, tiktok) = tokio::join!(
        scrape_linkedin_content(deps.apify.clone(), keywords.clone()),
        scrape_twitter_content(deps.apify.clone(), keywords.clone()),
        scrape_tiktok_content(deps.apify.clone(), keywords),
    );
    let mut posts = linkedin;
    posts.extend(twitter);
    posts.extend(tiktok);
    counts.results = i32::try_from(posts.len()).unwrap_or(i32::MAX);

    let inserted = content_feed::upsert_content_posts(&deps.pool, &posts).await?;
    info!(scraped = posts.len(), inserted, "content posts stored");

    score_batch(deps, &profile, counts).await?;
    draft_batch(deps, &profile, counts).await?;

    let cutoff = Utc::now() - Duration::days(CONTENT_RETENTION_DAYS);
    let swept = content_feed::delete_stale_content(&deps.pool, cutoff).await?;
    if swept > 0 {
        info!(swept, "stale content rows removed");
    }

    Ok(())
}

fn keyword_pool(profile: &AdvisorProfileRow) -> Vec<String> {
    let mut keywords = parse_keyword_list(&profile.content_keywords);
    if keywords.is_empty() {
        keywords = parse_keyword_list(DEFAULT_CONTENT_KEYWORDS);
    }
    keywords
}

/// Scores up to [`SCORING_BATCH_LIMIT`] unscored rows with bounded
/// concurrency. A failed score is counted and skipped; the row stays
/// unscored and gets retried next run.
async fn score_batch(
    deps: &PipelineDeps,
    profile: &AdvisorProfileRow,
    counts: &mut RunCounts,
) -> Result<(), PipelineError> {
    let unscored = content_feed::list_unscored_content(&deps.pool, SCORING_BATCH_LIMIT).await?;
    if unscored.is_empty() {
        return Ok(());
    }

    // Each scoring future owns its inputs, so the batch stays `Send` no
    // matter where the run is polled from.
    let claude = deps.claude.clone();
    let model = deps.config.scoring_model.clone();
    let profile = profile.clone();
    let results: Vec<_> = stream::iter(unscored.into_iter().map(move |row| {
        let claude = claude.clone();
        let model = model.clone();
        let profile = profile.clone();
        async move {
            let verdict = score_content(&claude, &model, &row, &profile).await;
            (row.id, verdict)
        }
    }))
    .buffer_unordered(deps.config.scoring_max_concurrent)
    .collect()
    .await;

    for (id, verdict) in results {
        match verdict {
            Ok(score) => {
                let update = ContentScoreUpdate {
                    expertise_signal: score.expertise_signal,
                    icp_relevance: score.icp_relevance,
                    suggested_angle: score.suggested_angle,
                };
                content_feed::apply_content_score(&deps.pool, id, &update).await?;
                counts.scored += 1;
            }
            Err(error) => {
                counts.errors += 1;
                warn!(post_id = id, %error, "content scoring failed");
            }
        }
    }
    Ok(())
}

/// Generates drafts for the top scored, undrafted rows, one at a time. Draft
/// calls are expensive enough that sequencing them is the concurrency cap.
async fn draft_batch(
    deps: &PipelineDeps,
    profile: &AdvisorProfileRow,
    counts: &mut RunCounts,
) -> Result<(), PipelineError> {
    let candidates = content_feed::list_draft_candidates(&deps.pool, DRAFT_BATCH_LIMIT).await?;
    if candidates.is_empty() {
        return Ok(());
    }

    let history = pulse_db::advisor_posts::list_recent_advisor_posts(
        &deps.pool,
        DRAFT_HISTORY_LIMIT,
    )
    .await?;
    let voice_samples = profile::list_voice_samples(&deps.pool, "post").await?;
    let prefs = profile::list_active_preferences(&deps.pool).await?;

    for row in &candidates {
        match generate_draft(
            &deps.claude,
            &deps.config.generation_model,
            row,
            profile,
            &history,
            &voice_samples,
            &prefs,
        )
        .await
        {
            Ok(draft) => {
                let update = NewDraft {
                    draft_text: draft.draft_text,
                    draft_topic_tags: draft.topic_tags,
                    draft_hook_type: draft.hook_type,
                    draft_image_hint: draft.image_suggestion,
                    draft_hashtags: draft.hashtags.unwrap_or_default(),
                    draft_source_urls: draft.source_urls,
                    draft_continuity_ref: draft.continuity_reference,
                };
                content_feed::apply_content_draft(&deps.pool, row.id, &update).await?;
            }
            Err(error) => {
                counts.errors += 1;
                warn!(post_id = row.id, %error, "draft generation failed");
            }
        }
    }
    Ok(())
}
