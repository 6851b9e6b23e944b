use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{Application, ApplicationStatus};
use crate::utils::validation::lenient_score;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ApplyPayload {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    #[validate(length(max = 4000))]
    pub cover_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    pub status: ApplicationStatus,
}

/// Posted by the AI evaluator when it finishes with an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AiEvaluationPayload {
    #[serde(default, deserialize_with = "lenient_score")]
    pub ai_score: Option<f64>,
    #[validate(length(max = 8000))]
    pub summary: Option<String>,
    /// Interview the evaluation was produced from, if any.
    pub interview_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationListResponse {
    pub items: Vec<Application>,
    pub total: usize,
}

impl From<Vec<Application>> for ApplicationListResponse {
    fn from(items: Vec<Application>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}
