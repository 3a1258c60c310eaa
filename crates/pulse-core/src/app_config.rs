use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Shared secret for the pipeline trigger endpoints (cron and manual runs).
    pub cron_secret: String,
    /// Apify API token, possibly mangled by the deploy platform (see
    /// `pulse_scraper::extract_apify_token`).
    pub apify_token: String,
    pub anthropic_api_key: String,
    /// Model used for per-post scoring calls (cheap, high volume).
    pub scoring_model: String,
    /// Model used for draft/comment/outreach generation (expensive, low volume).
    pub generation_model: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Overall timeout per Apify call. The sync endpoint blocks while the
    /// actor runs, so this must cover the actor's own wait budget.
    pub scraper_request_timeout_secs: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    /// Keywords processed per pipeline run; the rotation window size.
    pub max_keywords_per_run: usize,
    /// Cap on concurrent model calls within a scoring batch.
    pub scoring_max_concurrent: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("cron_secret", &"[redacted]")
            .field("apify_token", &"[redacted]")
            .field("anthropic_api_key", &"[redacted]")
            .field("scoring_model", &self.scoring_model)
            .field("generation_model", &self.generation_model)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .field("max_keywords_per_run", &self.max_keywords_per_run)
            .field("scoring_max_concurrent", &self.scoring_max_concurrent)
            .finish()
    }
}
