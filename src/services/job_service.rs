use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload, WeightsPayload};
use crate::error::{conflict_on_foreign_key, Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::models::score::ScoreWeights;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const JOB_IN_USE: &str = "Job has applications; close it instead of deleting";

const JOB_COLUMNS: &str = "id, title, description, requirements, status, applicant_count, ai_weight, manual_weight, created_at, updated_at";

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

pub struct JobList {
    pub items: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

/// Normalized weights as they go into the NUMERIC columns.
fn weight_columns(weights: Option<&WeightsPayload>) -> (Option<Decimal>, Option<Decimal>) {
    match weights {
        Some(w) => {
            let normalized = ScoreWeights::new(w.ai, w.manual);
            (
                Decimal::from_f64(normalized.ai()).map(|d| d.round_dp(4)),
                Decimal::from_f64(normalized.manual()).map(|d| d.round_dp(4)),
            )
        }
        None => (None, None),
    }
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateJobPayload) -> Result<Job> {
        let status = payload.status.unwrap_or(JobStatus::Open);
        let (ai_weight, manual_weight) = weight_columns(payload.weights.as_ref());

        let query = format!(
            r#"
            INSERT INTO jobs (title, description, requirements, status, ai_weight, manual_weight)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(payload.title.trim())
            .bind(payload.description)
            .bind(payload.requirements)
            .bind(status.as_str())
            .bind(ai_weight)
            .bind(manual_weight)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(job_id = %job.id, "job created");
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateJobPayload) -> Result<Job> {
        if payload.reset_weights && payload.weights.is_some() {
            return Err(Error::BadRequest(
                "weights and reset_weights cannot be combined".into(),
            ));
        }
        let (ai_weight, manual_weight) = weight_columns(payload.weights.as_ref());

        let query = format!(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                requirements = COALESCE($4, requirements),
                status = COALESCE($5, status),
                ai_weight = CASE WHEN $6 THEN NULL ELSE COALESCE($7, ai_weight) END,
                manual_weight = CASE WHEN $6 THEN NULL ELSE COALESCE($8, manual_weight) END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(payload.title.as_deref().map(str::trim))
            .bind(payload.description.as_deref())
            .bind(payload.requirements.clone())
            .bind(payload.status.map(|s| s.as_str()))
            .bind(payload.reset_weights)
            .bind(ai_weight)
            .bind(manual_weight)
            .fetch_one(&self.pool)
            .await?;

        Ok(job)
    }

    pub async fn list(&self, query: JobListQuery) -> Result<JobList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = query.status {
            filters.push(format!("status = ${}", args.len() + 1));
            args.push(status.as_str().to_string());
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            filters.push(format!("title ILIKE ${}", args.len() + 1));
            args.push(format!("%{}%", search.trim()));
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT {} FROM jobs {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            JOB_COLUMNS,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM jobs {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, Job>(&items_query);
        for value in &args {
            items_statement = items_statement.bind(value);
        }
        items_statement = items_statement.bind(per_page).bind(offset);
        let items = items_statement.fetch_all(&self.pool).await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = total_statement.bind(value);
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        let total_pages = ((total as f64) / (per_page as f64)).ceil() as i64;

        Ok(JobList {
            items,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Job> {
        let query = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))
    }

    /// Jobs with applications stay: applications are kept as history. The
    /// check and the delete are one statement, and the RESTRICT foreign key
    /// rejects an application inserted in between.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM jobs
            WHERE id = $1
              AND NOT EXISTS (SELECT 1 FROM applications WHERE job_id = $1)
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_foreign_key(e, JOB_IN_USE))?;

        if result.rows_affected() == 0 {
            let applications: Option<i64> = sqlx::query_scalar(
                "SELECT (SELECT COUNT(*) FROM applications WHERE job_id = jobs.id) FROM jobs WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            return Err(match applications {
                None => Error::NotFound("Job not found".into()),
                Some(count) => Error::Conflict(format!(
                    "Job has {} application(s); close it instead of deleting",
                    count
                )),
            });
        }

        tracing::info!(job_id = %id, "job deleted");
        Ok(())
    }
}
