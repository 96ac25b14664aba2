pub mod app;
pub mod auth_handlers;
pub mod auth_service;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod metrics;
pub mod task_handlers;
pub mod tasks;
pub mod user_handlers;
pub mod users;

pub use app::AppState;
