//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the three
//! recurring pipeline runs. The cadences mirror the review workflow: content
//! lands once a day before the advisor's posting window, the comment feed
//! refreshes through the working day, and the post-history sync is a weekly
//! background chore.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use pulse_pipeline::{run_pipeline, PipelineDeps, PipelineKind};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(deps: Arc<PipelineDeps>) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    // Content daily at 11:00 UTC, comments every 4 hours, post-history
    // weekly on Sunday at 06:00 UTC.
    register_pipeline_job(
        &scheduler,
        Arc::clone(&deps),
        PipelineKind::Content,
        "0 0 11 * * *",
    )
    .await?;
    register_pipeline_job(
        &scheduler,
        Arc::clone(&deps),
        PipelineKind::Comments,
        "0 0 */4 * * *",
    )
    .await?;
    register_pipeline_job(&scheduler, deps, PipelineKind::PostHistory, "0 0 6 * * SUN").await?;

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_pipeline_job(
    scheduler: &JobScheduler,
    deps: Arc<PipelineDeps>,
    kind: PipelineKind,
    schedule: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let deps = Arc::clone(&deps);

        Box::pin(async move {
            tracing::info!(pipeline = %kind, "scheduler: starting pipeline run");
            match run_pipeline(deps, kind).await {
                Ok(Some(summary)) => tracing::info!(
                    pipeline = %kind,
                    scraped = summary.scraped,
                    scored = summary.scored,
                    errors = summary.errors,
                    "scheduler: pipeline run complete"
                ),
                Ok(None) => tracing::warn!(
                    pipeline = %kind,
                    "scheduler: skipped, a run is already in flight"
                ),
                Err(error) => tracing::error!(
                    pipeline = %kind,
                    %error,
                    "scheduler: pipeline run failed"
                ),
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
