//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::presentation::dto::{ApiResponse, AuthData, UserDto};
use auth::{AuthConfig, InMemoryDirectoryStore, LogNotifier, auth_router};
use axum::{
    Json, Router, http,
    http::{Method, header},
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 4000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let auth_config = load_auth_config()?;
    tracing::info!(?auth_config, "Auth configuration loaded");

    let store = InMemoryDirectoryStore::new();
    let notifier = LogNotifier::new(auth_config.email_from.clone());

    // Periodic sweep of expired reset tokens
    let sweeper = {
        let store = store.clone();
        let period = auth_config.reset_token_sweep_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if let Err(e) = store.cleanup_expired().await {
                    tracing::warn!(error = %e, "Reset token cleanup failed, continuing anyway");
                }
            }
        })
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:4200,http://127.0.0.1:4200".to_string());

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
    let app = app_router(store, notifier, auth_config).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    // Start server
    let port = read_port()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.abort();
    Ok(())
}

fn app_router(store: InMemoryDirectoryStore, notifier: LogNotifier, config: AuthConfig) -> Router {
    Router::new()
        .route("/api/test", get(server_test))
        .nest("/api/auth", auth_router(store, notifier, config))
        .fallback(route_not_found)
}

/// GET /api/test
///
/// Liveness check carrying a fixed sample user, so clients can exercise
/// their response handling without an account.
async fn server_test() -> Json<ApiResponse<AuthData>> {
    Json(ApiResponse::with_data(
        "Server is running!",
        AuthData {
            user: UserDto {
                id: "test".to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: "test@example.com".to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
            token: "test-token".to_string(),
        },
    ))
}

async fn route_not_found() -> AppError {
    AppError::new(ErrorKind::NotFound, "Route not found")
}

fn read_port() -> anyhow::Result<u16> {
    match env::var("PORT") {
        Ok(port) => port
            .trim()
            .parse()
            .with_context(|| format!("PORT must be a port number, got {:?}", port)),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

/// Auth settings from the environment
///
/// `AUTH_TOKEN_SECRET` is mandatory in release builds; debug builds fall
/// back to a random secret, so tokens do not survive a restart.
fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let base = match env::var("AUTH_TOKEN_SECRET") {
        Ok(secret_b64) => AuthConfig {
            token_secret: decode_secret(&secret_b64)?,
            ..AuthConfig::default()
        },
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_TOKEN_SECRET not set, using a random secret");
            AuthConfig::with_random_secret()
        }
        Err(_) => anyhow::bail!("AUTH_TOKEN_SECRET must be set in production"),
    };

    let defaults = AuthConfig::default();

    Ok(AuthConfig {
        password_pepper: env::var("AUTH_PASSWORD_PEPPER")
            .ok()
            .filter(|p| !p.is_empty())
            .map(String::into_bytes),
        reset_url_base: env::var("RESET_URL_BASE").unwrap_or(defaults.reset_url_base),
        email_from: env::var("EMAIL_FROM").unwrap_or(defaults.email_from),
        ..base
    })
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let secret_bytes = Engine::decode(&general_purpose::STANDARD, secret_b64.trim())
        .context("AUTH_TOKEN_SECRET must be base64")?;

    <[u8; 32]>::try_from(secret_bytes.as_slice()).map_err(|_| {
        anyhow::anyhow!(
            "AUTH_TOKEN_SECRET must decode to 32 bytes, got {}",
            secret_bytes.len()
        )
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
