use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::services::scoring_service::InterviewerRatings;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ScheduleInterviewPayload {
    pub scheduled_at: DateTime<Utc>,
    #[validate(range(min = 10, max = 480))]
    #[serde(default = "default_duration")]
    pub duration_minutes: i32,
}

fn default_duration() -> i32 {
    60
}

/// Interviewer feedback, each rating on the 1-5 scale.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FeedbackPayload {
    #[validate(range(min = 1, max = 5))]
    pub technical_rating: i32,
    #[validate(range(min = 1, max = 5))]
    pub communication_rating: i32,
    #[validate(range(min = 1, max = 5))]
    pub problem_solving_rating: i32,
    #[validate(length(max = 8000))]
    pub comment: Option<String>,
    pub interviewer_id: Option<Uuid>,
}

impl FeedbackPayload {
    pub fn ratings(&self) -> InterviewerRatings {
        InterviewerRatings {
            technical: f64::from(self.technical_rating),
            communication: f64::from(self.communication_rating),
            problem_solving: f64::from(self.problem_solving_rating),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InterviewListResponse {
    pub items: Vec<Interview>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    pub interview: Interview,
    pub application: Application,
}
