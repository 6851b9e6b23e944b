use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        application_dto::{AiEvaluationPayload, ApplyPayload, UpdateStatusPayload},
        interview_dto::{InterviewListResponse, ScheduleInterviewPayload},
    },
    error::Result,
    models::{application::Application, interview::Interview},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 404, description = "Job or candidate not found"),
        (status = 409, description = "Job closed or duplicate application")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.application_service.apply(payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found", body = Application),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get(id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status changed", body = Application),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .update_status(id, payload.status)
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/ai-evaluation",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = AiEvaluationPayload,
    responses(
        (status = 200, description = "AI score recorded and ranking score recomputed", body = Application),
        (status = 404, description = "Application or interview not found")
    )
)]
#[axum::debug_handler]
pub async fn record_ai_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AiEvaluationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if let Some(interview_id) = payload.interview_id {
        state
            .interview_service
            .record_ai_result(interview_id, id, payload.ai_score, payload.summary.as_deref())
            .await?;
    }
    let application = state
        .scoring_service
        .record_ai_score(id, payload.ai_score)
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/interviews",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = ScheduleInterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Interview),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application already closed")
    )
)]
#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state.interview_service.schedule(id, payload).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}/interviews",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Interviews for the application", body = InterviewListResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let items = state.interview_service.list_for_application(id).await?;
    Ok(Json(InterviewListResponse { items }))
}
