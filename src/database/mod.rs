pub mod application_store;
pub mod pool;
