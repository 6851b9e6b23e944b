use axum::Json;
use utoipa::OpenApi;

use crate::{
    dto::{
        application_dto::{
            AiEvaluationPayload, ApplicationListResponse, ApplyPayload, UpdateStatusPayload,
        },
        interview_dto::{
            FeedbackPayload, FeedbackResponse, InterviewListResponse, ScheduleInterviewPayload,
        },
        job_dto::{CreateJobPayload, JobListResponse, JobResponse, UpdateJobPayload, WeightsPayload},
        ranking_dto::{RankingItem, RankingResponse, WeightsResponse},
        user_dto::{CreateUserPayload, UpdateUserPayload, UserResponse},
    },
    models::{
        application::{Application, ApplicationStatus, CandidateSummary},
        interview::{AiResult, Interview, InterviewFeedback, InterviewStatus},
        job::JobStatus,
        score::ScoreBreakdown,
        user::UserRole,
    },
    routes,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::ranking::get_ranking,
        routes::ranking::export_ranking,
        routes::job::create_job,
        routes::job::update_job,
        routes::job::delete_job,
        routes::job::list_jobs,
        routes::job::get_job,
        routes::job::list_job_applications,
        routes::application::apply,
        routes::application::get_application,
        routes::application::update_status,
        routes::application::record_ai_evaluation,
        routes::application::schedule_interview,
        routes::application::list_interviews,
        routes::interview::get_interview,
        routes::interview::cancel_interview,
        routes::interview::submit_feedback,
        routes::user::create_user,
        routes::user::get_user,
        routes::user::update_user,
    ),
    components(schemas(
        RankingResponse,
        RankingItem,
        WeightsResponse,
        WeightsPayload,
        CreateJobPayload,
        UpdateJobPayload,
        JobResponse,
        JobListResponse,
        JobStatus,
        ApplyPayload,
        UpdateStatusPayload,
        AiEvaluationPayload,
        ApplicationListResponse,
        Application,
        ApplicationStatus,
        CandidateSummary,
        ScoreBreakdown,
        ScheduleInterviewPayload,
        FeedbackPayload,
        FeedbackResponse,
        InterviewListResponse,
        Interview,
        InterviewStatus,
        InterviewFeedback,
        AiResult,
        CreateUserPayload,
        UpdateUserPayload,
        UserResponse,
        UserRole,
    )),
    tags(
        (name = "hiring-ranking", description = "Candidate scoring and job ranking API")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
