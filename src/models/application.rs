use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::Error;
use crate::models::score::{score_from_column, AggregatedScore, ScoreBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Pending,
    Shortlisted,
    InterviewScheduled,
    Interviewed,
    Offered,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Interviewed,
        ApplicationStatus::Offered,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Hired | ApplicationStatus::Rejected)
    }

    /// The next step along the hiring pipeline, if any.
    pub fn next(&self) -> Option<ApplicationStatus> {
        match self {
            ApplicationStatus::Applied => Some(ApplicationStatus::Pending),
            ApplicationStatus::Pending => Some(ApplicationStatus::Shortlisted),
            ApplicationStatus::Shortlisted => Some(ApplicationStatus::InterviewScheduled),
            ApplicationStatus::InterviewScheduled => Some(ApplicationStatus::Interviewed),
            ApplicationStatus::Interviewed => Some(ApplicationStatus::Offered),
            ApplicationStatus::Offered => Some(ApplicationStatus::Hired),
            ApplicationStatus::Hired | ApplicationStatus::Rejected => None,
        }
    }

    /// Forward moves go one step at a time; rejection is open to any
    /// application that has not reached a terminal state.
    pub fn can_transition_to(&self, target: ApplicationStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == ApplicationStatus::Rejected || self.next() == Some(target)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::BadRequest(format!("Unknown application status: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CandidateSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    /// `None` when the candidate reference is null or no longer resolves.
    pub candidate: Option<CandidateSummary>,
    pub status: ApplicationStatus,
    pub ranking_score: i32,
    pub score_breakdown: ScoreBreakdown,
    pub cover_note: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// The scores as currently stored, the expected state for a guarded write.
    pub fn stored_score(&self) -> AggregatedScore {
        AggregatedScore {
            ranking_score: self.ranking_score,
            breakdown: self.score_breakdown,
        }
    }
}

/// Flat row as selected by `APPLICATION_SELECT`, candidate columns come from a
/// left join on users.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Option<Uuid>,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub status: String,
    pub ranking_score: i32,
    pub ai_score: Option<Decimal>,
    pub manual_score: Option<Decimal>,
    pub cover_note: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = Error;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            Error::Internal(format!(
                "application {} has unknown status {}",
                row.id, row.status
            ))
        })?;

        let candidate = match (row.candidate_id, row.candidate_name, row.candidate_email) {
            (Some(id), Some(name), email) => Some(CandidateSummary {
                id,
                name,
                email: email.unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(Self {
            id: row.id,
            job_id: row.job_id,
            candidate,
            status,
            ranking_score: row.ranking_score,
            score_breakdown: ScoreBreakdown {
                ai_score: row.ai_score.and_then(score_from_column),
                manual_score: row.manual_score.and_then(score_from_column),
            },
            cover_note: row.cover_note,
            applied_at: row.applied_at,
            updated_at: row.updated_at,
        })
    }
}
