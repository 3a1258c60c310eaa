pub mod adapters;
pub mod client;
pub mod error;
pub mod fields;
pub mod platforms;
mod retry;

pub use client::{extract_apify_token, ApifyClient};
pub use error::ScraperError;
pub use platforms::{
    scrape_linkedin_comment_feed, scrape_linkedin_content, scrape_post_history,
    scrape_tiktok_content, scrape_twitter_content, AdvisorHistoryPost,
};
