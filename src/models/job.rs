use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::score::ScoreWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Ordered focus areas the interviewers cover.
    pub requirements: Vec<String>,
    pub status: String,
    pub applicant_count: i32,
    pub ai_weight: Option<Decimal>,
    pub manual_weight: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Per-job weights, when the job overrides the global default.
    pub fn weights(&self) -> Option<ScoreWeights> {
        weights_from_columns(self.ai_weight, self.manual_weight)
    }
}

pub fn weights_from_columns(
    ai_weight: Option<Decimal>,
    manual_weight: Option<Decimal>,
) -> Option<ScoreWeights> {
    match (ai_weight, manual_weight) {
        (Some(ai), Some(manual)) => Some(ScoreWeights::new(
            ai.to_f64().unwrap_or(0.0),
            manual.to_f64().unwrap_or(0.0),
        )),
        _ => None,
    }
}

/// What the scoring path needs to know about a job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobScoring {
    pub job_id: Uuid,
    pub title: String,
    pub weights: Option<ScoreWeights>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_require_both_columns() {
        assert!(weights_from_columns(Some(Decimal::new(7, 1)), None).is_none());
        let weights = weights_from_columns(Some(Decimal::new(7, 1)), Some(Decimal::new(3, 1)))
            .unwrap();
        assert!((weights.ai() - 0.7).abs() < 1e-9);
    }
}
