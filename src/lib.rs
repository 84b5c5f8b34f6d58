// Library crate for the authentication service
// This file exposes the public API for integration tests

pub mod auth;
pub mod config;
pub mod routes;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use auth::service::AuthService;
pub use config::AppConfig;
pub use routes::user_routes;
pub use shared::{AppError, AppState};
pub use user::{models::UserModel, repository::UserRepository};
