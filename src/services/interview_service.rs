use crate::dto::interview_dto::{FeedbackPayload, ScheduleInterviewPayload};
use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::models::interview::{Interview, InterviewRow, InterviewStatus};
use crate::services::application_service::advance_from;
use crate::services::scoring_service::clamp_score;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const INTERVIEW_COLUMNS: &str = r#"
    id, application_id, scheduled_at, duration_minutes, status,
    ai_score, ai_summary,
    technical_rating, communication_rating, problem_solving_rating,
    feedback_comment, interviewer_id, feedback_submitted_at,
    created_at, updated_at
"#;

#[derive(Clone)]
pub struct InterviewService {
    pool: PgPool,
}

impl InterviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn schedule(
        &self,
        application_id: Uuid,
        payload: ScheduleInterviewPayload,
    ) -> Result<Interview> {
        let mut tx = self.pool.begin().await?;

        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM applications WHERE id = $1 FOR UPDATE")
                .bind(application_id)
                .fetch_optional(&mut *tx)
                .await?;
        let status: ApplicationStatus = status
            .ok_or_else(|| Error::NotFound("Application not found".into()))?
            .parse()?;
        if status.is_terminal() {
            return Err(Error::Conflict(format!(
                "Application is already {}",
                status
            )));
        }

        let query = format!(
            r#"
            INSERT INTO interviews (application_id, scheduled_at, duration_minutes, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            INTERVIEW_COLUMNS
        );
        let row = sqlx::query_as::<_, InterviewRow>(&query)
            .bind(application_id)
            .bind(payload.scheduled_at)
            .bind(payload.duration_minutes)
            .bind(InterviewStatus::Scheduled.as_str())
            .fetch_one(&mut *tx)
            .await?;

        if status.can_transition_to(ApplicationStatus::InterviewScheduled) {
            advance_from(
                &mut tx,
                application_id,
                status,
                ApplicationStatus::InterviewScheduled,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(interview_id = %row.id, application_id = %application_id, "interview scheduled");
        Interview::try_from(row)
    }

    pub async fn get(&self, id: Uuid) -> Result<Interview> {
        let query = format!("SELECT {} FROM interviews WHERE id = $1", INTERVIEW_COLUMNS);
        let row = sqlx::query_as::<_, InterviewRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".into()))?;
        Interview::try_from(row)
    }

    pub async fn list_for_application(&self, application_id: Uuid) -> Result<Vec<Interview>> {
        let query = format!(
            "SELECT {} FROM interviews WHERE application_id = $1 ORDER BY scheduled_at ASC",
            INTERVIEW_COLUMNS
        );
        let rows = sqlx::query_as::<_, InterviewRow>(&query)
            .bind(application_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Interview::try_from).collect()
    }

    pub async fn cancel(&self, id: Uuid) -> Result<Interview> {
        let query = format!(
            r#"
            UPDATE interviews
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING {}
            "#,
            INTERVIEW_COLUMNS
        );
        let row = sqlx::query_as::<_, InterviewRow>(&query)
            .bind(id)
            .bind(InterviewStatus::Cancelled.as_str())
            .bind(InterviewStatus::Scheduled.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Interview::try_from(row),
            None => {
                let existing = self.get(id).await?;
                Err(Error::Conflict(format!(
                    "Interview is {} and cannot be cancelled",
                    existing.status.as_str()
                )))
            }
        }
    }

    /// Stores the feedback, completes the interview and moves the application
    /// to `interviewed` when it was waiting on this interview. Resubmitting
    /// overwrites earlier feedback.
    pub async fn submit_feedback(&self, id: Uuid, payload: &FeedbackPayload) -> Result<Interview> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(String, Uuid)> = sqlx::query_as(
            "SELECT status, application_id FROM interviews WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let (status, application_id) =
            current.ok_or_else(|| Error::NotFound("Interview not found".into()))?;
        if status == InterviewStatus::Cancelled.as_str() {
            return Err(Error::Conflict(
                "Feedback cannot be recorded for a cancelled interview".into(),
            ));
        }

        let query = format!(
            r#"
            UPDATE interviews
            SET
                status = $2,
                technical_rating = $3,
                communication_rating = $4,
                problem_solving_rating = $5,
                feedback_comment = $6,
                interviewer_id = $7,
                feedback_submitted_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            INTERVIEW_COLUMNS
        );
        let row = sqlx::query_as::<_, InterviewRow>(&query)
            .bind(id)
            .bind(InterviewStatus::Completed.as_str())
            .bind(payload.technical_rating)
            .bind(payload.communication_rating)
            .bind(payload.problem_solving_rating)
            .bind(payload.comment.as_deref())
            .bind(payload.interviewer_id)
            .fetch_one(&mut *tx)
            .await?;

        advance_from(
            &mut tx,
            application_id,
            ApplicationStatus::InterviewScheduled,
            ApplicationStatus::Interviewed,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(interview_id = %id, application_id = %application_id, "interview feedback recorded");
        Interview::try_from(row)
    }

    /// Attaches an AI evaluation to one of the application's interviews.
    pub async fn record_ai_result(
        &self,
        id: Uuid,
        application_id: Uuid,
        score: Option<f64>,
        summary: Option<&str>,
    ) -> Result<Interview> {
        let score = score.map(clamp_score).and_then(Decimal::from_f64).map(|d| d.round_dp(2));
        let query = format!(
            r#"
            UPDATE interviews
            SET ai_score = $3, ai_summary = $4, updated_at = NOW()
            WHERE id = $1 AND application_id = $2
            RETURNING {}
            "#,
            INTERVIEW_COLUMNS
        );
        let row = sqlx::query_as::<_, InterviewRow>(&query)
            .bind(id)
            .bind(application_id)
            .bind(score)
            .bind(summary)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found for this application".into()))?;
        Interview::try_from(row)
    }
}
