//! Read-side access to the advisor's configuration records.
//!
//! The profile, voice samples, content preferences, and SN lead list are all
//! mutated by the settings UI; the pipeline only ever reads them.

use sqlx::PgPool;

use crate::DbError;

/// The single long-lived advisor profile row.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct AdvisorProfileRow {
    pub full_name: String,
    pub firm: String,
    pub specialization: String,
    pub tagline: String,
    pub icp_professions: String,
    pub icp_age_min: i32,
    pub icp_age_max: i32,
    pub content_keywords: String,
    pub comment_keywords: String,
    pub topics_always: String,
    pub topics_never: String,
    pub compliance_rules: String,
    pub tone_rules: String,
    pub preferred_length: String,
    pub preferred_formats: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VoiceSampleRow {
    pub id: i64,
    pub sample_type: String,
    pub sample_text: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentPreferenceRow {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SnLeadRow {
    pub id: i64,
    pub name: String,
    pub company: String,
}

/// Fetches the advisor profile, if one has been created yet.
///
/// A fresh install has no profile row; callers fall back to
/// `AdvisorProfileRow::default()` and built-in keyword defaults.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_advisor_profile(pool: &PgPool) -> Result<Option<AdvisorProfileRow>, DbError> {
    let row = sqlx::query_as::<_, AdvisorProfileRow>(
        "SELECT full_name, firm, specialization, tagline, icp_professions, \
                icp_age_min, icp_age_max, content_keywords, comment_keywords, \
                topics_always, topics_never, compliance_rules, tone_rules, \
                preferred_length, preferred_formats \
         FROM advisor_profile \
         ORDER BY id \
         LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Lists voice samples of one type (`post` or `comment`).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_voice_samples(
    pool: &PgPool,
    sample_type: &str,
) -> Result<Vec<VoiceSampleRow>, DbError> {
    let rows = sqlx::query_as::<_, VoiceSampleRow>(
        "SELECT id, sample_type, sample_text FROM voice_samples WHERE sample_type = $1",
    )
    .bind(sample_type)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lists active content preferences.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_preferences(pool: &PgPool) -> Result<Vec<ContentPreferenceRow>, DbError> {
    let rows = sqlx::query_as::<_, ContentPreferenceRow>(
        "SELECT id, label FROM content_preferences WHERE active",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lists the uploaded SN lead roster for the comment pipeline's
/// name-and-company cross-reference.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_sn_leads(pool: &PgPool) -> Result<Vec<SnLeadRow>, DbError> {
    let rows = sqlx::query_as::<_, SnLeadRow>("SELECT id, name, company FROM sn_leads")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// A lead awaiting an outreach opener, with the context the drafting prompt
/// wants.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutreachLeadRow {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub company: String,
    pub interaction_text: String,
}

/// Lists `new` leads that have no suggested message yet, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_leads_without_message(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<OutreachLeadRow>, DbError> {
    let rows = sqlx::query_as::<_, OutreachLeadRow>(
        "SELECT id, name, title, company, interaction_text \
         FROM sn_leads \
         WHERE status = 'new' AND suggested_message IS NULL \
         ORDER BY created_at \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Stores a drafted outreach message and moves the lead to `suggested`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the lead does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_suggested_message(
    pool: &PgPool,
    id: i64,
    message: &str,
) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE sn_leads SET suggested_message = $2, status = 'suggested' WHERE id = $1")
        .bind(id)
        .bind(message)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
