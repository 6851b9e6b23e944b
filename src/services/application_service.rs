use crate::database::application_store::APPLICATION_SELECT;
use crate::dto::application_dto::ApplyPayload;
use crate::error::{conflict_on_unique, Error, Result};
use crate::models::application::{Application, ApplicationRow, ApplicationStatus};
use crate::models::job::JobStatus;
use crate::models::user::UserRole;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn apply(&self, payload: ApplyPayload) -> Result<Application> {
        let mut tx = self.pool.begin().await?;

        let job_status: Option<String> =
            sqlx::query_scalar("SELECT status FROM jobs WHERE id = $1 FOR UPDATE")
                .bind(payload.job_id)
                .fetch_optional(&mut *tx)
                .await?;
        match job_status.as_deref() {
            None => return Err(Error::NotFound("Job not found".into())),
            Some(status) if status != JobStatus::Open.as_str() => {
                return Err(Error::Conflict("Job is not accepting applications".into()))
            }
            Some(_) => {}
        }

        let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(payload.candidate_id)
            .fetch_optional(&mut *tx)
            .await?;
        match role.as_deref() {
            None => return Err(Error::NotFound("Candidate not found".into())),
            Some(role) if role != UserRole::Candidate.as_str() => {
                return Err(Error::BadRequest("Only candidates can apply to jobs".into()))
            }
            Some(_) => {}
        }

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO applications (job_id, candidate_id, status, cover_note)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(payload.job_id)
        .bind(payload.candidate_id)
        .bind(ApplicationStatus::Applied.as_str())
        .bind(payload.cover_note)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Candidate has already applied to this job."))?;

        sqlx::query(
            "UPDATE jobs SET applicant_count = applicant_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(payload.job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(application_id = %id, job_id = %payload.job_id, "application submitted");
        self.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Application> {
        let query = format!("{} WHERE a.id = $1", APPLICATION_SELECT);
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))?;
        Application::try_from(row)
    }

    pub async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let query = format!(
            "{} WHERE a.job_id = $1 ORDER BY a.applied_at ASC, a.id ASC",
            APPLICATION_SELECT
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Application::try_from).collect()
    }

    pub async fn update_status(&self, id: Uuid, target: ApplicationStatus) -> Result<Application> {
        let current = self.get(id).await?;
        if !current.status.can_transition_to(target) {
            return Err(Error::Conflict(format!(
                "Cannot move application from {} to {}",
                current.status, target
            )));
        }

        let mut conn = self.pool.acquire().await?;
        if !advance_from(&mut conn, id, current.status, target).await? {
            return Err(Error::Conflict(
                "Application status changed concurrently; reload and retry".into(),
            ));
        }

        tracing::info!(application_id = %id, from = %current.status, to = %target, "application status changed");
        self.get(id).await
    }
}

/// Moves an application from `from` to `to` only if it is still in `from`.
/// Returns whether the row changed.
pub(crate) async fn advance_from(
    conn: &mut PgConnection,
    id: Uuid,
    from: ApplicationStatus,
    to: ApplicationStatus,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE applications SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2",
    )
    .bind(id)
    .bind(from.as_str())
    .bind(to.as_str())
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
