use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authgate::{
    auth::service::AuthService,
    config::AppConfig,
    routes::user_routes,
    shared::AppState,
    user::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting authentication service");

    // Configuration problems are fatal here, before any request is accepted.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    let user_repository: Arc<dyn UserRepository + Send + Sync> = match config.database_url.as_deref()
    {
        Some(url) => {
            let pool = sqlx::PgPool::connect(url)
                .await
                .expect("Failed to connect to database");
            info!("Using PostgreSQL user repository");
            Arc::new(PostgresUserRepository::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory user repository");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let auth_service = match AuthService::from_config(&config, user_repository) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(auth_service);
    let app = user_routes(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}
