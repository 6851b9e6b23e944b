use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::ranking_dto::WeightsResponse;
use crate::models::job::{Job, JobStatus};
use crate::services::job_service::JobList;
use crate::utils::validation::non_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WeightsPayload {
    #[validate(range(min = 0.0))]
    pub ai: f64,
    #[validate(range(min = 0.0))]
    pub manual: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 200), custom(function = "non_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub status: Option<JobStatus>,
    #[validate(nested)]
    pub weights: Option<WeightsPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 200), custom(function = "non_blank"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub status: Option<JobStatus>,
    #[validate(nested)]
    pub weights: Option<WeightsPayload>,
    /// Drop the job's own weights and fall back to the global default.
    #[serde(default)]
    pub reset_weights: bool,
}

impl UpdateJobPayload {
    pub fn changes_weights(&self) -> bool {
        self.weights.is_some() || self.reset_weights
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Vec<String>,
    pub status: String,
    pub applicant_count: i32,
    /// Absent when the job uses the global default weights.
    pub weights: Option<WeightsResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobListResponse {
    pub items: Vec<JobResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<JobStatus>,
    pub search: Option<String>,
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        let weights = value.weights().map(|w| WeightsResponse {
            ai: w.ai(),
            manual: w.manual(),
        });
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            requirements: value.requirements,
            status: value.status,
            applicant_count: value.applicant_count,
            weights,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<JobList> for JobListResponse {
    fn from(value: JobList) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payload_rejects_blank_title_and_negative_weights() {
        let payload: CreateJobPayload = serde_json::from_value(json!({
            "title": "   ",
            "weights": { "ai": -1.0, "manual": 1.0 }
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("weights"));
    }

    #[test]
    fn requirements_keep_their_order() {
        let payload: CreateJobPayload = serde_json::from_value(json!({
            "title": "Site Reliability Engineer",
            "requirements": ["Linux", "Kubernetes", "Incident response"]
        }))
        .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.requirements[1], "Kubernetes");
    }

    #[test]
    fn reset_counts_as_weight_change() {
        let update = UpdateJobPayload {
            reset_weights: true,
            ..Default::default()
        };
        assert!(update.changes_weights());
        assert!(!UpdateJobPayload::default().changes_weights());
    }
}
