pub mod application;
pub mod health;
pub mod interview;
pub mod job;
pub mod ranking;
pub mod user;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    docs,
    middleware::{cors::permissive_cors, rate_limit},
    AppState,
};

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn router(state: AppState, api_rps: u32) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api-docs/openapi.json", get(docs::openapi_json));

    let api = Router::new()
        .route("/api/ranking/:job_id", get(ranking::get_ranking))
        .route("/api/ranking/:job_id/export", get(ranking::export_ranking))
        .route("/api/jobs", get(job::list_jobs).post(job::create_job))
        .route(
            "/api/jobs/:id",
            get(job::get_job)
                .patch(job::update_job)
                .delete(job::delete_job),
        )
        .route(
            "/api/jobs/:id/applications",
            get(job::list_job_applications),
        )
        .route("/api/applications", post(application::apply))
        .route("/api/applications/:id", get(application::get_application))
        .route(
            "/api/applications/:id/status",
            post(application::update_status),
        )
        .route(
            "/api/applications/:id/ai-evaluation",
            post(application::record_ai_evaluation),
        )
        .route(
            "/api/applications/:id/interviews",
            get(application::list_interviews).post(application::schedule_interview),
        )
        .route("/api/interviews/:id", get(interview::get_interview))
        .route(
            "/api/interviews/:id/cancel",
            post(interview::cancel_interview),
        )
        .route(
            "/api/interviews/:id/feedback",
            post(interview::submit_feedback),
        )
        .route("/api/users", post(user::create_user))
        .route(
            "/api/users/:id",
            get(user::get_user).patch(user::update_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(api_rps),
            rate_limit::rps_middleware,
        ));

    base_routes
        .merge(api)
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
