pub mod application_service;
pub mod export_service;
pub mod interview_service;
pub mod job_service;
pub mod ranking_service;
pub mod scoring_service;
pub mod user_service;
