//! Generation calls, run on the stronger model.

use serde::Deserialize;

use pulse_db::advisor_posts::AdvisorPostRow;
use pulse_db::comment_feed::CommentFeedRow;
use pulse_db::content_feed::ContentFeedRow;
use pulse_db::profile::{AdvisorProfileRow, ContentPreferenceRow, VoiceSampleRow};

use crate::client::ClaudeClient;
use crate::error::AiError;
use crate::parse::parse_json;
use crate::prompts;

const DRAFT_MAX_TOKENS: u32 = 1000;
const COMMENT_MAX_TOKENS: u32 = 300;
const OUTREACH_MAX_TOKENS: u32 = 200;

/// One generated post draft, ready to store against its source post.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftOutput {
    pub draft_text: String,
    #[serde(default)]
    pub topic_tags: Vec<String>,
    pub hook_type: String,
    #[serde(default)]
    pub image_suggestion: Option<String>,
    #[serde(default)]
    pub hashtags: Option<Vec<String>>,
    #[serde(default)]
    pub source_urls: Option<String>,
    #[serde(default)]
    pub continuity_reference: Option<String>,
}

/// A lead who engaged with the advisor, as input to outreach drafting.
#[derive(Debug, Clone)]
pub struct OutreachLead {
    pub name: String,
    pub title: String,
    pub company: String,
    pub interaction_text: String,
}

/// Generates one post draft riffing on a scored source post.
///
/// # Errors
///
/// Returns [`AiError`] when the API call fails or the response is not the
/// requested JSON shape.
pub async fn generate_draft(
    client: &ClaudeClient,
    model: &str,
    source: &ContentFeedRow,
    profile: &AdvisorProfileRow,
    history: &[AdvisorPostRow],
    voice_samples: &[VoiceSampleRow],
    prefs: &[ContentPreferenceRow],
) -> Result<DraftOutput, AiError> {
    let prompt = prompts::draft_prompt(source, profile, history, voice_samples, prefs);
    let raw = client.complete(model, DRAFT_MAX_TOKENS, &prompt).await?;
    parse_json("post draft", &raw)
}

/// Generates a ready-to-post comment for a comment-feed post. The response
/// is plain text by design.
///
/// # Errors
///
/// Returns [`AiError`] when the API call fails or the model returns no text.
pub async fn generate_comment(
    client: &ClaudeClient,
    model: &str,
    post: &CommentFeedRow,
    profile: &AdvisorProfileRow,
    voice_samples: &[VoiceSampleRow],
) -> Result<String, AiError> {
    let prompt = prompts::comment_prompt(post, profile, voice_samples);
    client.complete(model, COMMENT_MAX_TOKENS, &prompt).await
}

/// Generates a first-touch DM for a lead, referencing how they engaged.
///
/// # Errors
///
/// Returns [`AiError`] when the API call fails or the model returns no text.
pub async fn generate_outreach(
    client: &ClaudeClient,
    model: &str,
    lead: &OutreachLead,
    profile: &AdvisorProfileRow,
) -> Result<String, AiError> {
    let prompt = prompts::outreach_prompt(lead, profile);
    client.complete(model, OUTREACH_MAX_TOKENS, &prompt).await
}
