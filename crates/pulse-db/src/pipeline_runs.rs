//! Database operations for the `pipeline_runs` log.
//!
//! One row per orchestrator invocation. The table doubles as the run lock:
//! a partial unique index allows at most one `running` row per pipeline, and
//! [`try_start_run`] acquires it with a guarded insert.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `pipeline_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PipelineRunRow {
    pub id: i64,
    pub pipeline: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub results_count: i32,
    pub scored_count: i32,
    pub errors_count: i32,
    pub error_message: Option<String>,
}

/// Aggregate counters written when a run finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunCounts {
    pub results: i32,
    pub scored: i32,
    pub errors: i32,
}

const ROW_COLUMNS: &str = "id, pipeline, status, started_at, completed_at, \
     results_count, scored_count, errors_count, error_message";

/// Attempts to acquire the run lock for a pipeline and open a new log row.
///
/// A `running` row older than `stale_after_secs` means a previous invocation
/// was killed by the host mid-run (there is no cooperative cancellation);
/// such rows are reaped as `failed` before the lock is attempted, so a dead
/// run never blocks the pipeline forever.
///
/// Returns `None` if a live run of this pipeline already holds the lock.
/// The insert races are backstopped by the partial unique index on
/// `(pipeline) WHERE status = 'running'` — a loser of the race also gets
/// `None`, never an error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] for any failure other than losing the lock race.
pub async fn try_start_run(
    pool: &PgPool,
    pipeline: &str,
    stale_after_secs: f64,
) -> Result<Option<PipelineRunRow>, DbError> {
    let reaped = sqlx::query(
        "UPDATE pipeline_runs \
         SET status = 'failed', \
             error_message = 'run exceeded the execution ceiling and was reaped', \
             completed_at = NOW() \
         WHERE pipeline = $1 AND status = 'running' \
           AND started_at < NOW() - make_interval(secs => $2)",
    )
    .bind(pipeline)
    .bind(stale_after_secs)
    .execute(pool)
    .await?;

    if reaped.rows_affected() > 0 {
        tracing::warn!(
            pipeline,
            reaped = reaped.rows_affected(),
            "reaped stale running pipeline rows"
        );
    }

    let insert = sqlx::query_as::<_, PipelineRunRow>(&format!(
        "INSERT INTO pipeline_runs (pipeline, status) \
         SELECT $1, 'running' \
         WHERE NOT EXISTS \
             (SELECT 1 FROM pipeline_runs WHERE pipeline = $1 AND status = 'running') \
         RETURNING {ROW_COLUMNS}"
    ))
    .bind(pipeline)
    .fetch_optional(pool)
    .await;

    match insert {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Closes a run as `completed` with its final counters.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the row is not in `running` state, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn complete_run(pool: &PgPool, id: i64, counts: RunCounts) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE pipeline_runs \
         SET status = 'completed', completed_at = NOW(), \
             results_count = $1, scored_count = $2, errors_count = $3 \
         WHERE id = $4 AND status = 'running'",
    )
    .bind(counts.results)
    .bind(counts.scored)
    .bind(counts.errors)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Closes a run as `failed`, recording the error and any partial counters.
///
/// Partial progress from earlier stages is durable by design and is not
/// rolled back here.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the row is not in `running` state, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn fail_run(
    pool: &PgPool,
    id: i64,
    counts: RunCounts,
    error_message: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE pipeline_runs \
         SET status = 'failed', completed_at = NOW(), error_message = $1, \
             results_count = $2, scored_count = $3, errors_count = $4 \
         WHERE id = $5 AND status = 'running'",
    )
    .bind(error_message)
    .bind(counts.results)
    .bind(counts.scored)
    .bind(counts.errors)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Returns the most recent run for each pipeline type.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_runs(pool: &PgPool) -> Result<Vec<PipelineRunRow>, DbError> {
    let rows = sqlx::query_as::<_, PipelineRunRow>(&format!(
        "SELECT DISTINCT ON (pipeline) {ROW_COLUMNS} \
         FROM pipeline_runs \
         ORDER BY pipeline, started_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
