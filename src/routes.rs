use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, shared::AppState};

/// Builds the user-facing router.
///
/// `/users/me` sits behind the bearer-token middleware; signup and login are
/// public.
pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::jwt_auth))
        .route("/users/signup", post(auth::signup))
        .route("/users/login", post(auth::login))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
