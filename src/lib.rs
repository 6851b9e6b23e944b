pub mod config;
pub mod database;
pub mod docs;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::application_store::{ApplicationStore, PgApplicationStore};
use crate::models::score::ScoreWeights;
use crate::services::{
    application_service::ApplicationService, interview_service::InterviewService,
    job_service::JobService, ranking_service::RankingService, scoring_service::ScoringService,
    user_service::UserService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub job_service: JobService,
    pub user_service: UserService,
    pub application_service: ApplicationService,
    pub interview_service: InterviewService,
    pub scoring_service: ScoringService,
    pub ranking_service: RankingService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let store = Arc::new(PgApplicationStore::new(pool.clone()));
        Self::with_store(pool, store, config.default_weights)
    }

    /// Wires the services around a specific application store. The scoring
    /// and ranking paths read and write only through `store`.
    pub fn with_store(
        pool: PgPool,
        store: Arc<dyn ApplicationStore>,
        default_weights: ScoreWeights,
    ) -> Self {
        Self {
            job_service: JobService::new(pool.clone()),
            user_service: UserService::new(pool.clone()),
            application_service: ApplicationService::new(pool.clone()),
            interview_service: InterviewService::new(pool.clone()),
            scoring_service: ScoringService::new(store.clone(), default_weights),
            ranking_service: RankingService::new(store, default_weights),
            pool,
        }
    }
}
