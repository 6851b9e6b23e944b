use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::application::{ApplicationStatus, CandidateSummary};
use crate::models::score::ScoreBreakdown;
use crate::services::ranking_service::{JobRanking, RankedApplication};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeightsResponse {
    pub ai: f64,
    pub manual: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankingItem {
    pub rank: usize,
    pub application_id: Uuid,
    pub candidate: CandidateSummary,
    pub status: ApplicationStatus,
    pub ranking_score: i32,
    pub score_breakdown: ScoreBreakdown,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankingResponse {
    pub job_id: Uuid,
    pub job_title: String,
    pub weights: WeightsResponse,
    pub total: usize,
    pub items: Vec<RankingItem>,
}

impl RankingItem {
    /// `None` for entries without a candidate; the ranking filter already
    /// drops those.
    fn from_ranked(value: RankedApplication) -> Option<Self> {
        let application = value.application;
        let candidate = application.candidate?;
        Some(Self {
            rank: value.rank,
            application_id: application.id,
            candidate,
            status: application.status,
            ranking_score: application.ranking_score,
            score_breakdown: application.score_breakdown,
            applied_at: application.applied_at,
        })
    }
}

impl From<JobRanking> for RankingResponse {
    fn from(value: JobRanking) -> Self {
        let items: Vec<RankingItem> = value
            .items
            .into_iter()
            .filter_map(RankingItem::from_ranked)
            .collect();
        Self {
            job_id: value.job_id,
            job_title: value.job_title,
            weights: WeightsResponse {
                ai: value.weights.ai(),
                manual: value.weights.manual(),
            },
            total: items.len(),
            items,
        }
    }
}
