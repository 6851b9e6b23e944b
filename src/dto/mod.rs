pub mod application_dto;
pub mod interview_dto;
pub mod job_dto;
pub mod ranking_dto;
pub mod user_dto;
