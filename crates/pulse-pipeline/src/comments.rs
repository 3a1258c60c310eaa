//! The comment pipeline: scrape LinkedIn, score, suggest comments, sweep.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use pulse_ai::{generate_comment, score_comment};
use pulse_core::rotation::{current_day_index, parse_keyword_list, rotate_keywords};
use pulse_db::comment_feed::{self, CommentScoreUpdate};
use pulse_db::pipeline_runs::RunCounts;
use pulse_db::profile::{self, AdvisorProfileRow};
use pulse_scraper::scrape_linkedin_comment_feed;

use crate::{PipelineDeps, PipelineError};

/// Used until the advisor fills in their comment keyword list.
const DEFAULT_COMMENT_KEYWORDS: &str =
    "tech careers\nstartup culture\nBigLaw life\naerospace engineering";

/// Unscored posts annotated per run.
const SCORING_BATCH_LIMIT: i64 = 30;

/// Comment-feed rows older than this are swept unless already commented on.
const COMMENT_RETENTION_DAYS: i64 = 7;

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
        "comment keyword window"
    );

    let posts = scrape_linkedin_comment_feed(deps.apify.clone(), keywords).await;
    counts.results = i32::try_from(posts.len()).unwrap_or(i32::MAX);

    let inserted = comment_feed::upsert_comment_posts(&deps.pool, &posts).await?;
    info!(scraped = posts.len(), inserted, "comment posts stored");

    let sn_set = sn_lead_set(deps).await?;
    let voice_samples = profile::list_voice_samples(&deps.pool, "comment").await?;

    let unscored = comment_feed::list_unscored_comments(&deps.pool, SCORING_BATCH_LIMIT).await?;
    for row in &unscored {
        let verdict = score_comment(&deps.claude, &deps.config.scoring_model, row, &profile).await;
        let score = match verdict {
            Ok(score) => score,
            Err(error) => {
                counts.errors += 1;
                warn!(post_id = row.id, %error, "comment scoring failed");
                continue;
            }
        };

        // The suggested comment rides along in the same annotation pass so
        // the review surface never shows a scored row without one.
        let suggested = match generate_comment(
            &deps.claude,
            &deps.config.generation_model,
            row,
            &profile,
            &voice_samples,
        )
        .await
        {
            Ok(text) => Some(text),
            Err(error) => {
                counts.errors += 1;
                warn!(post_id = row.id, %error, "comment generation failed");
                continue;
            }
        };

        let sn_lead = sn_set
            .contains(&format!("{}|{}", row.creator_name, row.creator_company).to_lowercase());
        let update = CommentScoreUpdate {
            icp_magnet: score.icp_magnet,
            engagement_window: score.engagement_window,
            authority_positioning: score.authority_positioning,
            conversation_starter: score.conversation_starter,
            comment_priority: score.comment_priority,
            topic_tag: score.topic_tag,
            sn_lead,
            suggested_comment: suggested,
        };
        comment_feed::apply_comment_score(&deps.pool, row.id, &update).await?;
        counts.scored += 1;
    }

    let cutoff = Utc::now() - Duration::days(COMMENT_RETENTION_DAYS);
    let swept = comment_feed::delete_stale_comments(&deps.pool, cutoff).await?;
    if swept > 0 {
        info!(swept, "stale comment rows removed");
    }

    Ok(())
}

fn keyword_pool(profile: &AdvisorProfileRow) -> Vec<String> {
    let mut keywords = parse_keyword_list(&profile.comment_keywords);
    if keywords.is_empty() {
        keywords = parse_keyword_list(DEFAULT_COMMENT_KEYWORDS);
    }
    keywords
}

/// Loads the Sales Navigator roster as lowercase `name|company` keys for
/// exact matching against post authors.
async fn sn_lead_set(deps: &PipelineDeps) -> Result<HashSet<String>, PipelineError> {
    let leads = profile::list_sn_leads(&deps.pool).await?;
    Ok(leads
        .into_iter()
        .map(|lead| format!("{}|{}", lead.name, lead.company).to_lowercase())
        .collect())
}
