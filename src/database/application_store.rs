use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::{Application, ApplicationRow};
use crate::models::job::{weights_from_columns, JobScoring};
use crate::models::score::{AggregatedScore, SCORE_DECIMALS};

/// Shared projection of an application with its candidate resolved through a
/// left join. Callers append their own `WHERE`/`ORDER BY`.
pub const APPLICATION_SELECT: &str = r#"
    SELECT
        a.id,
        a.job_id,
        a.candidate_id,
        u.name AS candidate_name,
        u.email AS candidate_email,
        a.status,
        a.ranking_score,
        a.ai_score,
        a.manual_score,
        a.cover_note,
        a.applied_at,
        a.updated_at
    FROM applications a
    LEFT JOIN users u ON u.id = a.candidate_id
"#;

/// Persistence used by the scoring and ranking paths.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// `None` when the job does not exist.
    async fn find_job_scoring(&self, job_id: Uuid) -> Result<Option<JobScoring>>;

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>>;

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>>;

    /// Writes `next` (breakdown and the ranking score derived from it) only
    /// while the row still holds `current`. `false` means another write got
    /// there first or the row is gone; callers reread and retry.
    async fn save_scores(
        &self,
        id: Uuid,
        current: &AggregatedScore,
        next: &AggregatedScore,
    ) -> Result<bool>;
}

#[derive(Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct JobScoringRow {
    id: Uuid,
    title: String,
    ai_weight: Option<Decimal>,
    manual_weight: Option<Decimal>,
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value
        .and_then(Decimal::from_f64)
        .map(|d| d.round_dp(SCORE_DECIMALS))
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn find_job_scoring(&self, job_id: Uuid) -> Result<Option<JobScoring>> {
        let row = sqlx::query_as::<_, JobScoringRow>(
            "SELECT id, title, ai_weight, manual_weight FROM jobs WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| JobScoring {
            job_id: r.id,
            title: r.title,
            weights: weights_from_columns(r.ai_weight, r.manual_weight),
        }))
    }

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let query = format!("{} WHERE a.job_id = $1 ORDER BY a.applied_at ASC", APPLICATION_SELECT);
        let rows = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Application::try_from).collect()
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let query = format!("{} WHERE a.id = $1", APPLICATION_SELECT);
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Application::try_from).transpose()
    }

    async fn save_scores(
        &self,
        id: Uuid,
        current: &AggregatedScore,
        next: &AggregatedScore,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE applications
            SET ai_score = $2, manual_score = $3, ranking_score = $4, updated_at = NOW()
            WHERE id = $1
              AND ranking_score = $5
              AND ai_score IS NOT DISTINCT FROM $6
              AND manual_score IS NOT DISTINCT FROM $7
            "#,
        )
        .bind(id)
        .bind(to_decimal(next.breakdown.ai_score))
        .bind(to_decimal(next.breakdown.manual_score))
        .bind(next.ranking_score)
        .bind(current.ranking_score)
        .bind(to_decimal(current.breakdown.ai_score))
        .bind(to_decimal(current.breakdown.manual_score))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
