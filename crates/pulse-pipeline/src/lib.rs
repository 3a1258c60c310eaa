//! Pipeline orchestration: scrape, score, generate, sweep.
//!
//! Three pipelines share the same run discipline: acquire the per-pipeline
//! run lock, do the work while counting per-item failures instead of
//! aborting, and close the log row with final counters. A pipeline-level
//! failure (scrape provider down, store unreachable) fails the run but keeps
//! whatever partial progress already landed.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{error, info};

use pulse_ai::ClaudeClient;
use pulse_core::AppConfig;
use pulse_db::pipeline_runs::{self, RunCounts};
use pulse_scraper::ApifyClient;

pub mod comments;
pub mod content;
pub mod post_history;

/// A `running` row older than this is treated as a casualty of a killed
/// process and reaped before the lock is attempted.
pub const STALE_RUN_SECS: f64 = 900.0;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Db(#[from] pulse_db::DbError),

    #[error(transparent)]
    Scraper(#[from] pulse_scraper::ScraperError),

    #[error(transparent)]
    Ai(#[from] pulse_ai::AiError),
}

/// The three pipelines, as named in the run log and the trigger API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Content,
    Comments,
    PostHistory,
}

impl PipelineKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineKind::Content => "content",
            PipelineKind::Comments => "comments",
            PipelineKind::PostHistory => "post_history",
        }
    }
}

impl FromStr for PipelineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => Ok(PipelineKind::Content),
            "comments" => Ok(PipelineKind::Comments),
            "post_history" => Ok(PipelineKind::PostHistory),
            other => Err(format!("unknown pipeline type: {other}")),
        }
    }
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Long-lived handles shared by every pipeline run.
pub struct PipelineDeps {
    pub pool: PgPool,
    pub apify: ApifyClient,
    pub claude: ClaudeClient,
    pub config: AppConfig,
}

impl PipelineDeps {
    /// Builds the shared clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if either API client cannot be constructed.
    pub fn new(pool: PgPool, config: AppConfig) -> Result<Self, PipelineError> {
        let apify = ApifyClient::new(
            &config.apify_token,
            config.scraper_request_timeout_secs,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_secs,
        )?;
        let claude = ClaudeClient::new(
            &config.anthropic_api_key,
            config.scraper_request_timeout_secs,
        )?;
        Ok(Self {
            pool,
            apify,
            claude,
            config,
        })
    }
}

/// Final counters reported by a finished run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub scraped: i32,
    pub scored: i32,
    pub errors: i32,
}

impl From<RunCounts> for RunSummary {
    fn from(counts: RunCounts) -> Self {
        Self {
            scraped: counts.results,
            scored: counts.scored,
            errors: counts.errors,
        }
    }
}

/// Runs one pipeline under the run lock.
///
/// Returns `Ok(None)` if another run of the same pipeline is already in
/// flight; callers surface that as a conflict rather than queueing.
///
/// Takes the shared deps handle by value so the returned future owns its
/// state and is `Send` from any caller — an axum handler, a scheduler job,
/// or a spawned task.
///
/// # Errors
///
/// Returns [`PipelineError`] when the run fails at the pipeline level. The
/// run log row is closed as `failed` first, with partial counters intact.
pub async fn run_pipeline(
    deps: Arc<PipelineDeps>,
    kind: PipelineKind,
) -> Result<Option<RunSummary>, PipelineError> {
    let Some(run) = pipeline_runs::try_start_run(&deps.pool, kind.as_str(), STALE_RUN_SECS).await?
    else {
        info!(pipeline = %kind, "run already in flight, skipping");
        return Ok(None);
    };

    info!(pipeline = %kind, run_id = run.id, "pipeline run started");
    let mut counts = RunCounts::default();

    let outcome = match kind {
        PipelineKind::Content => content::run(&deps, &mut counts).await,
        PipelineKind::Comments => comments::run(&deps, &mut counts).await,
        PipelineKind::PostHistory => post_history::run(&deps, &mut counts).await,
    };

    match outcome {
        Ok(()) => {
            pipeline_runs::complete_run(&deps.pool, run.id, counts).await?;
            info!(
                pipeline = %kind,
                run_id = run.id,
                scraped = counts.results,
                scored = counts.scored,
                errors = counts.errors,
                "pipeline run completed"
            );
            Ok(Some(counts.into()))
        }
        Err(err) => {
            error!(pipeline = %kind, run_id = run.id, error = %err, "pipeline run failed");
            counts.errors += 1;
            pipeline_runs::fail_run(&deps.pool, run.id, counts, &err.to_string()).await?;
            Err(err)
        }
    }
}
