//! Core business logic for signup and login.
//!
//! The service owns no global state: every collaborator is injected at
//! construction, and repository calls run under a bounded deadline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use super::{
    password::{BcryptPasswordHasher, PasswordHasher},
    token::{TokenIssuer, TokenValidator},
    types::{LoginRequest, SignupRequest, TokenClaims, TokenKind, UserResponse},
};
use crate::{
    config::AppConfig,
    shared::AppError,
    user::{models::UserModel, repository::UserRepository},
};

/// Service for handling authentication business logic
pub struct AuthService {
    users: Arc<dyn UserRepository + Send + Sync>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: TokenIssuer,
    token_validator: TokenValidator,
    repository_timeout: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository + Send + Sync>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_issuer: TokenIssuer,
        token_validator: TokenValidator,
        repository_timeout: Duration,
    ) -> Self {
        Self {
            users,
            password_hasher,
            token_issuer,
            token_validator,
            repository_timeout,
        }
    }

    /// Builds the service from startup configuration.
    ///
    /// Fails with a config error on an empty signing secret.
    pub fn from_config(
        config: &AppConfig,
        users: Arc<dyn UserRepository + Send + Sync>,
    ) -> Result<Self, AppError> {
        let token_issuer = TokenIssuer::new(
            &config.jwt_secret,
            config.access_token_ttl_hours,
            config.refresh_token_ttl_hours,
        )?;
        let token_validator = TokenValidator::new(&config.jwt_secret)?;

        Ok(Self::new(
            users,
            Arc::new(BcryptPasswordHasher::new()),
            token_issuer,
            token_validator,
            config.repository_timeout(),
        ))
    }

    /// Registers a new account and returns it with freshly issued tokens
    #[instrument(name = "signup", skip_all, fields(email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> Result<UserResponse, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let count = self
            .with_timeout(self.users.count_by_email(&request.email))
            .await?;
        if count > 0 {
            warn!(email = %request.email, "Signup rejected, email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self.password_hasher.hash(&request.password)?;

        // The id is assigned here so the tokens can embed it before the row
        // exists.
        let user_id = Uuid::new_v4().to_string();
        let access_token = self.token_issuer.issue_access_token(
            &user_id,
            &request.email,
            &request.first_name,
            &request.last_name,
        )?;
        let refresh_token = self.token_issuer.issue_refresh_token(&user_id)?;

        let user = UserModel::new(
            user_id,
            request.email,
            password_hash,
            request.first_name,
            request.last_name,
            request.phone,
            access_token,
            refresh_token,
        );

        // The insert re-checks uniqueness, so a racing signup still loses.
        self.with_timeout(self.users.insert_user(&user)).await?;

        info!(user_id = %user.id, "Account created");
        Ok(UserResponse::from(user))
    }

    /// Verifies credentials and reissues both tokens
    #[instrument(name = "login", skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<UserResponse, AppError> {
        let found = self
            .with_timeout(self.users.find_by_email(&request.email))
            .await?
            .ok_or_else(|| {
                warn!(email = %request.email, "Login failed, email not registered");
                AppError::InvalidCredentials
            })?;

        if !self
            .password_hasher
            .verify(&request.password, &found.password_hash)
        {
            warn!(user_id = %found.id, "Login failed, password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.token_issuer.issue_access_token(
            &found.id,
            &found.email,
            &found.first_name,
            &found.last_name,
        )?;
        let refresh_token = self.token_issuer.issue_refresh_token(&found.id)?;

        let updated = self
            .with_timeout(self.users.update_tokens(
                &found.id,
                &access_token,
                &refresh_token,
                Utc::now(),
            ))
            .await?;

        info!(user_id = %updated.id, "Login succeeded, tokens rotated");
        Ok(UserResponse::from(updated))
    }

    /// Validates a bearer token for resource access.
    ///
    /// Refresh tokens verify like any other but do not grant access.
    pub fn authenticate(&self, token: &str) -> Result<TokenClaims, AppError> {
        let claims = self.token_validator.validate(token)?;

        if claims.kind != TokenKind::Access {
            warn!(sub = %claims.sub, "Refresh token presented for resource access");
            return Err(AppError::Unauthorized(
                "refresh tokens cannot be used to access resources".to_string(),
            ));
        }

        Ok(claims)
    }

    /// Runs a repository call under the configured deadline
    async fn with_timeout<T>(
        &self,
        operation: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        match timeout(self.repository_timeout, operation).await {
            Ok(result) => result,
            Err(_) => {
                warn!("User repository call exceeded deadline");
                Err(AppError::Timeout(
                    "user repository call exceeded deadline".to_string(),
                ))
            }
        }
    }
}
