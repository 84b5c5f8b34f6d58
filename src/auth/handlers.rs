use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::{info, instrument};

use super::types::{LoginRequest, SignupRequest, TokenClaims, UserResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for account registration
///
/// POST /users/signup
/// Returns the created account with freshly issued tokens
#[instrument(name = "signup_handler", skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    info!(email = %request.email, "Signup requested");

    let account = state.auth_service.signup(request).await?;

    info!(user_id = %account.id, "Signup completed");
    Ok((StatusCode::CREATED, Json(account)))
}

/// HTTP handler for credential login
///
/// POST /users/login
/// Returns the account with rotated tokens
#[instrument(name = "login_handler", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    info!(email = %request.email, "Login requested");

    let account = state.auth_service.login(request).await?;

    info!(user_id = %account.id, "Login completed");
    Ok(Json(account))
}

/// HTTP handler returning the authenticated caller's claims
///
/// GET /users/me, behind the bearer-token middleware
#[instrument(name = "me_handler", skip_all)]
pub async fn me(Extension(claims): Extension<TokenClaims>) -> Json<TokenClaims> {
    Json(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::BcryptPasswordHasher;
    use crate::auth::service::AuthService;
    use crate::auth::token::{TokenIssuer, TokenValidator};
    use crate::user::repository::InMemoryUserRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt; // for `oneshot`

    fn test_state() -> AppState {
        let users = Arc::new(InMemoryUserRepository::new());
        let service = AuthService::new(
            users,
            Arc::new(BcryptPasswordHasher::with_cost(4)),
            TokenIssuer::new("handler-test-secret", 24, 168).unwrap(),
            TokenValidator::new("handler-test-secret").unwrap(),
            Duration::from_secs(5),
        );
        AppState::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_signup_handler() {
        let app = Router::new()
            .route("/users/signup", axum::routing::post(signup))
            .with_state(test_state());

        let request_body = r#"{"email": "a@x.com", "password": "secret1", "first_name": "A", "last_name": "B", "phone": "555-0100"}"#;
        let request = Request::builder()
            .method("POST")
            .uri("/users/signup")
            .header("content-type", "application/json")
            .body(Body::from(request_body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let account: UserResponse = serde_json::from_slice(&body).unwrap();

        assert!(!account.id.is_empty());
        assert!(!account.access_token.is_empty());
        assert!(account.access_token.contains('.')); // JWT has dots
    }

    #[tokio::test]
    async fn test_signup_handler_rejects_bad_email() {
        let app = Router::new()
            .route("/users/signup", axum::routing::post(signup))
            .with_state(test_state());

        let request_body = r#"{"email": "nope", "password": "secret1", "first_name": "A", "last_name": "B", "phone": "555-0100"}"#;
        let request = Request::builder()
            .method("POST")
            .uri("/users/signup")
            .header("content-type", "application/json")
            .body(Body::from(request_body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_handler_unknown_email() {
        let app = Router::new()
            .route("/users/login", axum::routing::post(login))
            .with_state(test_state());

        let request_body = r#"{"email": "a@x.com", "password": "secret1"}"#;
        let request = Request::builder()
            .method("POST")
            .uri("/users/login")
            .header("content-type", "application/json")
            .body(Body::from(request_body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
