//! Scoring calls, run on the cheaper model.

use serde::Deserialize;

use pulse_db::comment_feed::CommentFeedRow;
use pulse_db::content_feed::ContentFeedRow;
use pulse_db::profile::AdvisorProfileRow;

use crate::client::ClaudeClient;
use crate::error::AiError;
use crate::parse::{clamp_score, parse_json};
use crate::prompts;

const SCORING_MAX_TOKENS: u32 = 200;

/// Verdict for one content-feed post.
#[derive(Debug, Clone)]
pub struct ContentScore {
    pub expertise_signal: i32,
    pub icp_relevance: i32,
    pub suggested_angle: String,
}

#[derive(Deserialize)]
struct ContentScoreWire {
    expertise_signal: f64,
    icp_relevance: f64,
    suggested_angle: String,
}

/// Verdict for one comment-feed post.
#[derive(Debug, Clone)]
pub struct CommentScore {
    pub icp_magnet: i32,
    pub engagement_window: i32,
    pub authority_positioning: i32,
    pub conversation_starter: i32,
    pub comment_priority: i32,
    pub topic_tag: String,
}

#[derive(Deserialize)]
struct CommentScoreWire {
    icp_magnet: f64,
    engagement_window: f64,
    authority_positioning: f64,
    conversation_starter: f64,
    comment_priority: f64,
    topic_tag: String,
}

/// Scores one content-feed post against the advisor's strategy.
///
/// All score fields are clamped into 0-100 regardless of what the model
/// reports.
///
/// # Errors
///
/// Returns [`AiError`] when the API call fails or the response is not the
/// requested JSON shape.
pub async fn score_content(
    client: &ClaudeClient,
    model: &str,
    post: &ContentFeedRow,
    profile: &AdvisorProfileRow,
) -> Result<ContentScore, AiError> {
    let prompt = prompts::content_scoring_prompt(post, profile);
    let raw = client.complete(model, SCORING_MAX_TOKENS, &prompt).await?;
    let wire: ContentScoreWire = parse_json("content score", &raw)?;
    Ok(ContentScore {
        expertise_signal: clamp_score(wire.expertise_signal),
        icp_relevance: clamp_score(wire.icp_relevance),
        suggested_angle: wire.suggested_angle,
    })
}

/// Scores one comment-feed post for comment opportunity value.
///
/// # Errors
///
/// Returns [`AiError`] when the API call fails or the response is not the
/// requested JSON shape.
pub async fn score_comment(
    client: &ClaudeClient,
    model: &str,
    post: &CommentFeedRow,
    profile: &AdvisorProfileRow,
) -> Result<CommentScore, AiError> {
    let prompt = prompts::comment_scoring_prompt(post, profile);
    let raw = client.complete(model, SCORING_MAX_TOKENS, &prompt).await?;
    let wire: CommentScoreWire = parse_json("comment score", &raw)?;
    Ok(CommentScore {
        icp_magnet: clamp_score(wire.icp_magnet),
        engagement_window: clamp_score(wire.engagement_window),
        authority_positioning: clamp_score(wire.authority_positioning),
        conversation_starter: clamp_score(wire.conversation_starter),
        comment_priority: clamp_score(wire.comment_priority),
        topic_tag: wire.topic_tag,
    })
}
