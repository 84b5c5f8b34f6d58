use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use crate::shared::{AppError, AppState};

/// JWT authentication middleware - validates Authorization Bearer header and adds TokenClaims to request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::jwt_auth))
/// Handlers can then extract Extension(claims): Extension<TokenClaims>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract token from Authorization Bearer header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("invalid authorization header format".to_string())
    })?;

    // Signature and expiry are checked before any claim is trusted.
    let claims = match state.auth_service.authenticate(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Bearer authentication failed: {}", e);
            return Err(e);
        }
    };

    info!(sub = %claims.sub, "Authentication successful, adding claims to request");

    // Add claims to request extensions for handlers to use
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
