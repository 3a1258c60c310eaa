//! Claude-backed scoring and generation for the content pipeline.
//!
//! Scoring runs on the cheaper model, draft and comment generation on the
//! stronger one; both model ids come from configuration so a rubric change
//! never requires a rebuild.

pub mod client;
pub mod error;
pub mod generate;
mod parse;
pub mod prompts;
pub mod score;

pub use client::ClaudeClient;
pub use error::AiError;
pub use generate::{
    generate_comment, generate_draft, generate_outreach, DraftOutput, OutreachLead,
};
pub use score::{score_comment, score_content, CommentScore, ContentScore};
