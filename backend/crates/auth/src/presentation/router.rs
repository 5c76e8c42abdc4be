//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::DirectoryStore;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router, to be nested under `/api/auth`
pub fn auth_router<S, N>(store: S, notifier: N, config: AuthConfig) -> Router
where
    S: DirectoryStore + Clone + Send + Sync + 'static,
    N: EmailNotifier + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        store: Arc::new(store),
        notifier: Arc::new(notifier),
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<S, N>))
        .route("/login", post(handlers::login::<S, N>))
        .route("/forgot-password", post(handlers::forgot_password::<S, N>))
        .route("/reset-password", post(handlers::reset_password::<S, N>))
        .route("/verify-token", get(handlers::verify_token::<S, N>))
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

async fn method_not_allowed() -> AppError {
    AppError::new(ErrorKind::MethodNotAllowed, "Method not allowed")
}
