use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interview_dto::{FeedbackPayload, FeedbackResponse},
    error::Result,
    models::interview::Interview,
    services::scoring_service::RatingScale,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview found", body = Interview),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.get(id).await?;
    Ok(Json(interview))
}

#[utoipa::path(
    post,
    path = "/api/interviews/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview cancelled", body = Interview),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview already completed or cancelled")
    )
)]
#[axum::debug_handler]
pub async fn cancel_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.cancel(id).await?;
    Ok(Json(interview))
}

#[utoipa::path(
    post,
    path = "/api/interviews/{id}/feedback",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    request_body = FeedbackPayload,
    responses(
        (status = 200, description = "Feedback stored and ranking score recomputed", body = FeedbackResponse),
        (status = 400, description = "Ratings outside 1-5"),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview was cancelled")
    )
)]
#[axum::debug_handler]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeedbackPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state.interview_service.submit_feedback(id, &payload).await?;
    let application = state
        .scoring_service
        .record_manual_ratings(
            interview.application_id,
            &payload.ratings(),
            RatingScale::FivePoint,
        )
        .await?;
    Ok(Json(FeedbackResponse {
        interview,
        application,
    }))
}
