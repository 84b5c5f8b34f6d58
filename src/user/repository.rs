use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user storage operations
///
/// Email uniqueness is enforced here, at the storage boundary, so that two
/// concurrent signups for the same address cannot both succeed.
#[async_trait]
pub trait UserRepository {
    async fn count_by_email(&self, email: &str) -> Result<i64, AppError>;
    async fn insert_user(&self, user: &UserModel) -> Result<String, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    async fn update_tokens(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<UserModel, AppError>;
}

/// In-memory implementation of UserRepository for development and testing
///
/// This provides a realistic implementation that can be used in development
/// without requiring a real database connection. Data is stored in memory
/// and will be lost when the application restarts.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        let mut user_map = HashMap::new();
        for user in users {
            user_map.insert(user.id.clone(), user);
        }

        Self {
            users: Mutex::new(user_map),
        }
    }

    /// Returns the current number of users in the repository
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Checks if a user exists by id (useful for debugging)
    pub fn has_user(&self, user_id: &str) -> bool {
        self.users.lock().unwrap().contains_key(user_id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn count_by_email(&self, email: &str) -> Result<i64, AppError> {
        debug!(email = %email, "Counting users by email in memory");

        let users = self.users.lock().unwrap();
        let count = users.values().filter(|user| user.email == email).count();

        Ok(count as i64)
    }

    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &UserModel) -> Result<String, AppError> {
        debug!(user_id = %user.id, email = %user.email, "Inserting user in memory");

        let mut users = self.users.lock().unwrap();
        // Same check-and-insert under one lock as the unique index gives us
        // in Postgres.
        if users.values().any(|existing| existing.email == user.email) {
            warn!(email = %user.email, "Email already registered in memory");
            return Err(AppError::DuplicateEmail);
        }
        if users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User id already exists in memory");
            return Err(AppError::Database("user already exists".to_string()));
        }
        users.insert(user.id.clone(), user.clone());

        debug!(user_id = %user.id, "User inserted successfully in memory");
        Ok(user.id.clone())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!(email = %email, "Fetching user by email from memory");

        let users = self.users.lock().unwrap();
        let user = users.values().find(|user| user.email == email).cloned();

        match &user {
            Some(found) => debug!(user_id = %found.id, "User found in memory"),
            None => debug!(email = %email, "User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self, access_token, refresh_token))]
    async fn update_tokens(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<UserModel, AppError> {
        debug!(user_id = %user_id, "Updating tokens in memory");

        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(user_id).ok_or_else(|| {
            warn!(user_id = %user_id, "User not found for token update in memory");
            AppError::NotFound("user not found".to_string())
        })?;

        user.rotate_tokens(
            access_token.to_string(),
            refresh_token.to_string(),
            updated_at,
        );

        debug!(user_id = %user_id, "Tokens updated successfully in memory");
        Ok(user.clone())
    }
}

/// PostgreSQL implementation of the user repository
///
/// Expects a `users` table with a unique index on `email`; the insert relies
/// on that index for its duplicate check.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> UserModel {
    UserModel {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        phone: row.get("phone"),
        access_token: row.get("access_token"),
        refresh_token: row.get("refresh_token"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self))]
    async fn count_by_email(&self, email: &str) -> Result<i64, AppError> {
        debug!(email = %email, "Counting users by email in database");

        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to count users by email");
                AppError::Database(e.to_string())
            })?;

        Ok(row.get("count"))
    }

    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &UserModel) -> Result<String, AppError> {
        debug!(user_id = %user.id, email = %user.email, "Inserting user in database");

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, phone, access_token, refresh_token, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.access_token)
        .bind(&user.refresh_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                warn!(email = %user.email, "Email already registered");
                AppError::DuplicateEmail
            }
            other => {
                warn!(error = %other, "Failed to insert user in database");
                AppError::Database(other.to_string())
            }
        })?;

        debug!(user_id = %user.id, "User inserted successfully in database");
        Ok(user.id.clone())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!(email = %email, "Fetching user by email from database");

        let row = sqlx::query(
            "SELECT id, email, password_hash, first_name, last_name, phone, access_token, refresh_token, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user from database");
            AppError::Database(e.to_string())
        })?;

        let user = match row {
            Some(row) => {
                let user = row_to_user(&row);
                debug!(user_id = %user.id, "User found in database");
                Some(user)
            }
            None => {
                debug!(email = %email, "User not found in database");
                None
            }
        };

        Ok(user)
    }

    #[instrument(skip(self, access_token, refresh_token))]
    async fn update_tokens(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<UserModel, AppError> {
        debug!(user_id = %user_id, "Updating tokens in database");

        // Update-only: an unknown id is an error, not an upsert.
        let row = sqlx::query(
            "UPDATE users SET access_token = $2, refresh_token = $3, updated_at = $4 WHERE id = $1 \
             RETURNING id, email, password_hash, first_name, last_name, phone, access_token, refresh_token, created_at, updated_at",
        )
        .bind(user_id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to update tokens in database");
            AppError::Database(e.to_string())
        })?;

        let user = row.map(|row| row_to_user(&row)).ok_or_else(|| {
            warn!(user_id = %user_id, "User not found for token update");
            AppError::NotFound("user not found".to_string())
        })?;

        debug!(user_id = %user_id, "Tokens updated successfully in database");
        Ok(user)
    }
}
