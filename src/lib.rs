// Weekplan Library
// Scheduling core: entity model, time-grid geometry, schedule store,
// drag/drop resolution and view orchestration.

pub mod config;
pub mod geometry;
pub mod interaction;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
pub mod view;
