pub mod application;
pub mod interview;
pub mod job;
pub mod score;
pub mod user;
