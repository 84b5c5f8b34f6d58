use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::{TokenClaims, TokenKind};
use crate::shared::AppError;

/// Signs access and refresh tokens with a shared HMAC secret.
///
/// Construction fails on an empty secret, so a misconfigured process is
/// rejected at startup instead of on its first signing call.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        secret: &str,
        access_ttl_hours: i64,
        refresh_ttl_hours: i64,
    ) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Config(
                "signing secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            access_ttl: Duration::hours(access_ttl_hours),
            refresh_ttl: Duration::hours(refresh_ttl_hours),
        })
    }

    /// Creates a signed access token carrying the full identity claims
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub fn issue_access_token(
        &self,
        user_id: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            email: Some(email.to_string()),
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            kind: TokenKind::Access,
            exp: (now + self.access_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        debug!(exp = claims.exp, "Signing access token");
        self.sign(&claims)
    }

    /// Creates a signed refresh token carrying only the subject id
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            email: None,
            first_name: None,
            last_name: None,
            kind: TokenKind::Refresh,
            exp: (now + self.refresh_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        debug!(exp = claims.exp, "Signing refresh token");
        self.sign(&claims)
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            debug!(error = %e, "Failed to encode token");
            AppError::Internal
        })
    }
}

/// Verifies token signatures and expiry against the shared secret.
///
/// Claims are only handed out after the signature check passes; there is no
/// decode-without-verify path.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Config(
                "signing secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation: Validation::default(),
        })
    }

    /// Validates a signed token and returns the claims if valid
    #[instrument(skip_all)]
    pub fn validate(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| {
                debug!(sub = %data.claims.sub, exp = data.claims.exp, "Token validated");
                data.claims
            })
            .map_err(|e| {
                debug!(error = %e, "Failed to validate token");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidSignature(e.to_string()),
                }
            })
    }
}
