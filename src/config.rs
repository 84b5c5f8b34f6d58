//! Process configuration, loaded once at startup.
//!
//! Missing or empty `JWT_SECRET` is a hard error here, before the listener
//! binds, so a misconfigured process never gets to sign its first token.

use std::fmt;
use std::time::Duration;

use crate::shared::AppError;

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    /// When unset the in-memory user repository is used instead of Postgres.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_hours: i64,
    pub repository_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config("JWT_SECRET must be set to a non-empty value".to_string())
            })?;

        Ok(Self {
            port: env_or("PORT", 8000),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            jwt_secret,
            access_token_ttl_hours: env_or("ACCESS_TOKEN_TTL_HOURS", 24),
            refresh_token_ttl_hours: env_or("REFRESH_TOKEN_TTL_HOURS", 168),
            repository_timeout_secs: env_or("REPOSITORY_TIMEOUT_SECS", 100),
        })
    }

    pub fn repository_timeout(&self) -> Duration {
        Duration::from_secs(self.repository_timeout_secs)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

// The signing secret must never reach logs, so Debug redacts it.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl_hours", &self.access_token_ttl_hours)
            .field("refresh_token_ttl_hours", &self.refresh_token_ttl_hours)
            .field("repository_timeout_secs", &self.repository_timeout_secs)
            .finish()
    }
}
