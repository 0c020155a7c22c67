//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{
    AuthConfig, GithubConfig, GithubIdentityBroker, PgAuthRepository, TokenIssuer, auth_router,
    resolve_identity,
};
use axum::{
    Json, Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use engagement::{EngagementConfig, PgEngagementRepository, engagement_router};
use platform::clock::{Clock, SystemClock};
use platform::config::{env_or, env_parse, require_env};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,engagement=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration
    let auth_config = AuthConfig::from_env()?;
    let engagement_config = EngagementConfig::from_env();
    let github_config = GithubConfig::from_env();
    let port: u16 = env_parse("PORT", 8080)?;

    // Database connection
    let database_url = require_env("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(env_parse("DATABASE_MAX_CONNECTIONS", 10)?)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Startup cleanup: remove expired refresh tokens
    // Errors here should not prevent server startup
    let auth_repo = PgAuthRepository::new(pool.clone(), auth_config.store_timeout);
    match auth_repo.cleanup_expired(clock.now()).await {
        Ok(tokens_deleted) => {
            tracing::info!(tokens_deleted, "Refresh token cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Refresh token cleanup failed, continuing anyway"
            );
        }
    }

    let tokens = Arc::new(TokenIssuer::new(&auth_config, clock.clone()));
    let broker = GithubIdentityBroker::new(github_config)?;
    let engagement_repo = PgEngagementRepository::new(pool.clone(), engagement_config.store_timeout);

    // CORS configuration
    let frontend_origins = env_or(
        "FRONTEND_ORIGINS",
        "http://localhost:3000,http://127.0.0.1:3000",
    );

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .nest(
            "/api/auth",
            auth_router(auth_repo, broker, tokens.clone(), auth_config),
        )
        .nest(
            "/api/engagement",
            engagement_router(engagement_repo, clock, engagement_config),
        )
        .layer(middleware::from_fn_with_state(tokens, resolve_identity))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
