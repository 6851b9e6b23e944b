use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::ranking_dto::RankingResponse,
    error::Result,
    services::export_service::{ExportService, XLSX_CONTENT_TYPE},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/ranking/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Candidates ordered by ranking score", body = RankingResponse),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_ranking(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let ranking = state.ranking_service.rank(job_id).await?;
    Ok(Json(RankingResponse::from(ranking)))
}

#[utoipa::path(
    get,
    path = "/api/ranking/{job_id}/export",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Ranking as an XLSX workbook"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn export_ranking(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let ranking = state.ranking_service.rank(job_id).await?;
    let buffer = ExportService::generate_ranking_xlsx(&ranking)?;

    let filename = format!(
        "ranking_{}_{}.xlsx",
        ranking.job_title.replace(|c: char| !c.is_ascii_alphanumeric(), "_"),
        chrono::Utc::now().format("%Y%m%d")
    );
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
