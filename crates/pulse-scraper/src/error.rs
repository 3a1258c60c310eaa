use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("APIFY_API_TOKEN is empty or unset")]
    MissingToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by actor {actor} (retry after {retry_after_secs}s)")]
    RateLimited { actor: String, retry_after_secs: u64 },

    #[error("actor not found: {actor}")]
    ActorNotFound { actor: String },

    #[error("unexpected HTTP status {status} from actor {actor}")]
    UnexpectedStatus { status: u16, actor: String },
}
