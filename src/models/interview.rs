use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::Error;
use crate::models::score::score_from_column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(InterviewStatus::Scheduled),
            "completed" => Some(InterviewStatus::Completed),
            "cancelled" => Some(InterviewStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AiResult {
    pub score: f64,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InterviewFeedback {
    pub technical_rating: i32,
    pub communication_rating: i32,
    pub problem_solving_rating: i32,
    pub comment: Option<String>,
    pub interviewer_id: Option<Uuid>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Interview {
    pub id: Uuid,
    pub application_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: InterviewStatus,
    pub ai_result: Option<AiResult>,
    pub feedback: Option<InterviewFeedback>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: String,
    pub ai_score: Option<Decimal>,
    pub ai_summary: Option<String>,
    pub technical_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub problem_solving_rating: Option<i32>,
    pub feedback_comment: Option<String>,
    pub interviewer_id: Option<Uuid>,
    pub feedback_submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InterviewRow> for Interview {
    type Error = Error;

    fn try_from(row: InterviewRow) -> Result<Self, Self::Error> {
        let status = InterviewStatus::parse(&row.status).ok_or_else(|| {
            Error::Internal(format!(
                "interview {} has unknown status {}",
                row.id, row.status
            ))
        })?;

        let ai_result = row.ai_score.map(|score| AiResult {
            score: score_from_column(score).unwrap_or(0.0),
            summary: row.ai_summary.clone(),
        });

        let feedback = match (
            row.technical_rating,
            row.communication_rating,
            row.problem_solving_rating,
            row.feedback_submitted_at,
        ) {
            (Some(technical), Some(communication), Some(problem_solving), Some(submitted_at)) => {
                Some(InterviewFeedback {
                    technical_rating: technical,
                    communication_rating: communication,
                    problem_solving_rating: problem_solving,
                    comment: row.feedback_comment,
                    interviewer_id: row.interviewer_id,
                    submitted_at,
                })
            }
            _ => None,
        };

        Ok(Self {
            id: row.id,
            application_id: row.application_id,
            scheduled_at: row.scheduled_at,
            duration_minutes: row.duration_minutes,
            status,
            ai_result,
            feedback,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> InterviewRow {
        let now = Utc::now();
        InterviewRow {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            scheduled_at: now,
            duration_minutes: 45,
            status: "scheduled".into(),
            ai_score: None,
            ai_summary: None,
            technical_rating: None,
            communication_rating: None,
            problem_solving_rating: None,
            feedback_comment: None,
            interviewer_id: None,
            feedback_submitted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn scheduled_row_has_no_sub_records() {
        let interview = Interview::try_from(row()).unwrap();
        assert_eq!(interview.status, InterviewStatus::Scheduled);
        assert!(interview.ai_result.is_none());
        assert!(interview.feedback.is_none());
    }

    #[test]
    fn completed_row_carries_feedback() {
        let mut completed = row();
        completed.status = "completed".into();
        completed.technical_rating = Some(4);
        completed.communication_rating = Some(5);
        completed.problem_solving_rating = Some(3);
        completed.feedback_submitted_at = Some(Utc::now());
        completed.ai_score = Some(Decimal::new(72, 0));

        let interview = Interview::try_from(completed).unwrap();
        let feedback = interview.feedback.unwrap();
        assert_eq!(feedback.communication_rating, 5);
        assert_eq!(interview.ai_result.unwrap().score, 72.0);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut bad = row();
        bad.status = "postponed".into();
        assert!(Interview::try_from(bad).is_err());
    }
}
