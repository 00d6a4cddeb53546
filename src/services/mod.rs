// Services module
// Persistence and identity collaborators

pub mod auth;
pub mod database;
pub mod storage;
