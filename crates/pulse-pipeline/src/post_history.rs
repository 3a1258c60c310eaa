//! The post-history sync: refresh the advisor's own LinkedIn posts.
//!
//! A date-sorted name search returns a mix of the advisor's posts and
//! near-namesakes; a fuzzy word match filters to the advisor's own before
//! the engagement-refreshing upsert.

use tracing::{info, warn};

use pulse_db::advisor_posts::{self, NewAdvisorPost};
use pulse_db::pipeline_runs::RunCounts;
use pulse_db::profile;
use pulse_scraper::scrape_post_history;

use crate::{PipelineDeps, PipelineError};

pub(crate) async fn run(deps: &PipelineDeps, counts: &mut RunCounts) -> Result<(), PipelineError> {
    let profile = profile::get_advisor_profile(&deps.pool)
        .await?
        .unwrap_or_default();
    let advisor_name = profile.full_name.trim();

    if advisor_name.is_empty() {
        info!("no advisor name configured, post-history sync is a no-op");
        return Ok(());
    }

    let posts = scrape_post_history(deps.apify.clone(), advisor_name.to_owned()).await?;
    counts.results = i32::try_from(posts.len()).unwrap_or(i32::MAX);

    for post in posts
        .iter()
        .filter(|p| author_matches(advisor_name, &p.author_name))
    {
        let record = NewAdvisorPost {
            post_text: post.post_text.clone(),
            linkedin_url: post.linkedin_url.clone(),
            posted_at: post.posted_at,
            likes: post.likes,
            comments_count: post.comments,
            shares: post.shares,
        };
        match advisor_posts::upsert_advisor_post(&deps.pool, &record).await {
            Ok(()) => counts.scored += 1,
            Err(error) => {
                counts.errors += 1;
                warn!(url = %post.linkedin_url, %error, "advisor post upsert failed");
            }
        }
    }

    info!(
        scraped = counts.results,
        stored = counts.scored,
        errors = counts.errors,
        "post history sync finished"
    );
    Ok(())
}

/// Fuzzy author match: the author name must contain all but at most one of
/// the advisor's name words. Tolerates middle initials and credential
/// suffixes without admitting arbitrary namesakes.
fn author_matches(advisor_name: &str, author_name: &str) -> bool {
    let author = author_name.to_lowercase();
    let words: Vec<String> = advisor_name
        .to_lowercase()
        .split_whitespace()
        .map(ToOwned::to_owned)
        .collect();
    if words.is_empty() {
        return false;
    }
    let matched = words.iter().filter(|w| author.contains(w.as_str())).count();
    matched >= 1.max(words.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::author_matches;

    #[test]
    fn exact_name_matches() {
        assert!(author_matches("Jane Advisor", "Jane Advisor"));
    }

    #[test]
    fn credential_suffix_still_matches() {
        assert!(author_matches("Jane Advisor", "Jane Advisor, CFP®"));
    }

    #[test]
    fn one_missing_word_is_tolerated() {
        assert!(author_matches("Jane Q Advisor", "Jane Advisor"));
    }

    #[test]
    fn different_person_is_rejected() {
        assert!(!author_matches("Jane Advisor", "John Smith"));
    }

    #[test]
    fn single_word_name_requires_that_word() {
        assert!(author_matches("Advisor", "The Advisor Collective"));
        assert!(!author_matches("Advisor", "Jane Smith"));
    }

    #[test]
    fn case_is_ignored() {
        assert!(author_matches("JANE ADVISOR", "jane advisor"));
    }
}
