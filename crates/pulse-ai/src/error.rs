use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Claude API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("model response contained no text block")]
    EmptyResponse,

    #[error("unparseable model output for {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
