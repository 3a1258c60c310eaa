use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde_json::Value;

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

const APIFY_API_URL: &str = "https://api.apify.com";

/// Recovers an Apify token from a possibly mangled env value.
///
/// Some deploy platforms prepend a scheme (or other junk) to secret values;
/// pull the `apify_api_…` token out if one is embedded, otherwise return the
/// raw value unchanged. Empty input yields `None`.
#[must_use]
pub fn extract_apify_token(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    let re = Regex::new(r"apify_api_[A-Za-z0-9]+").expect("valid token regex");
    Some(
        re.find(raw)
            .map_or_else(|| raw.to_owned(), |m| m.as_str().to_owned()),
    )
}

/// HTTP client for Apify's synchronous actor-run endpoint.
///
/// Pre-built actors handle the anti-bot work; we never hold platform
/// credentials ourselves. The `run-sync-get-dataset-items` endpoint blocks
/// until the actor finishes and returns the dataset items directly, so one
/// call per keyword is the whole interaction.
///
/// Rate limiting (429) and network failures are retried with exponential
/// backoff; anything else is a typed error.
///
/// Cloning is cheap: the inner `reqwest::Client` is a shared handle.
#[derive(Clone)]
pub struct ApifyClient {
    client: Client,
    base_url: String,
    token: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl ApifyClient {
    /// Creates an `ApifyClient` from a raw token value and retry policy.
    ///
    /// `timeout_secs` bounds the whole synchronous call, actor runtime
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingToken`] if `raw_token` is empty, or
    /// [`ScraperError::Http`] if the underlying client cannot be built.
    pub fn new(
        raw_token: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let token = extract_apify_token(raw_token).ok_or(ScraperError::MissingToken)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pulse/0.1 (content-ops)")
            .build()?;
        Ok(Self {
            client,
            base_url: APIFY_API_URL.to_owned(),
            token,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Overrides the API origin; used by tests to point at a local server.
    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_owned();
        self
    }

    /// Runs an actor synchronously and returns its dataset items.
    ///
    /// `actor` is the Apify actor id in `owner~name` form. `input` is the
    /// actor-specific input document; `limit` caps the items returned.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScraperError::ActorNotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx (not retried).
    /// - [`ScraperError::Http`] — network failure after all retries exhausted.
    /// - [`ScraperError::Deserialize`] — body is not a JSON array of items.
    pub async fn run_actor_sync(
        &self,
        actor: &str,
        input: &Value,
        limit: u32,
    ) -> Result<Vec<Value>, ScraperError> {
        let url = format!(
            "{}/v2/acts/{actor}/run-sync-get-dataset-items?limit={limit}",
            self.base_url
        );

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .post(&url)
                    .bearer_auth(&self.token)
                    .json(input)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited {
                        actor: actor.to_owned(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::ActorNotFound {
                        actor: actor.to_owned(),
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        actor: actor.to_owned(),
                    });
                }

                let body = response.text().await?;
                let items =
                    serde_json::from_str::<Vec<Value>>(&body).map_err(|e| {
                        ScraperError::Deserialize {
                            context: format!("dataset items from {actor}"),
                            source: e,
                        }
                    })?;
                Ok(items)
            }
        })
        .await
    }
}
