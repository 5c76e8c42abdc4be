//! HTTP Handlers
//!
//! Every failure of an endpoint carries that endpoint's status (400 or 401),
//! except server faults which stay 500.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use kernel::error::kind::ErrorKind;
use std::sync::Arc;

use platform::bearer::extract_bearer_token;

use crate::application::config::AuthConfig;
use crate::application::{
    ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase, SignInInput, SignInUseCase,
    SignUpInput, SignUpUseCase, VerifyTokenUseCase,
};
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::DirectoryStore;
use crate::error::{AuthError, EndpointRejection};
use crate::presentation::dto::{
    ApiResponse, AuthData, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
    SignUpRequest,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<S, N>
where
    S: DirectoryStore + Clone + Send + Sync + 'static,
    N: EmailNotifier + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub notifier: Arc<N>,
    pub config: Arc<AuthConfig>,
}

/// Body that failed to parse is treated like an empty one
fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable request body");
            T::default()
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<S, N>(
    State(state): State<AuthAppState<S, N>>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<impl IntoResponse, EndpointRejection>
where
    S: DirectoryStore + Clone + Send + Sync + 'static,
    N: EmailNotifier + Clone + Send + Sync + 'static,
{
    let req = body_or_default(body);
    let use_case = SignUpUseCase::new(state.store.clone(), state.config.clone());

    let input = SignUpInput {
        first_name: req.first_name.unwrap_or_default(),
        last_name: req.last_name.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
    };

    let output = use_case
        .execute(input)
        .await
        .map_err(|e| e.reject_as(ErrorKind::BadRequest))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            "User registered successfully",
            AuthData {
                user: output.user.into(),
                token: output.token,
            },
        )),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<S, N>(
    State(state): State<AuthAppState<S, N>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, EndpointRejection>
where
    S: DirectoryStore + Clone + Send + Sync + 'static,
    N: EmailNotifier + Clone + Send + Sync + 'static,
{
    let req = body_or_default(body);
    let use_case = SignInUseCase::new(state.store.clone(), state.config.clone());

    let input = SignInInput {
        email: req.email.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
    };

    let output = use_case
        .execute(input)
        .await
        .map_err(|e| e.reject_as(ErrorKind::Unauthorized))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_data(
            "Login successful",
            AuthData {
                user: output.user.into(),
                token: output.token,
            },
        )),
    ))
}

// ============================================================================
// Forgot Password
// ============================================================================

/// POST /api/auth/forgot-password
pub async fn forgot_password<S, N>(
    State(state): State<AuthAppState<S, N>>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, EndpointRejection>
where
    S: DirectoryStore + Clone + Send + Sync + 'static,
    N: EmailNotifier + Clone + Send + Sync + 'static,
{
    let req = body_or_default(body);
    let use_case = ForgotPasswordUseCase::new(
        state.store.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let message = use_case
        .execute(req.email.unwrap_or_default())
        .await
        .map_err(|e| e.reject_as(ErrorKind::BadRequest))?;

    Ok((StatusCode::OK, Json(ApiResponse::message(message))))
}

// ============================================================================
// Reset Password
// ============================================================================

/// POST /api/auth/reset-password
pub async fn reset_password<S, N>(
    State(state): State<AuthAppState<S, N>>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, EndpointRejection>
where
    S: DirectoryStore + Clone + Send + Sync + 'static,
    N: EmailNotifier + Clone + Send + Sync + 'static,
{
    let req = body_or_default(body);
    let use_case = ResetPasswordUseCase::new(state.store.clone(), state.config.clone());

    let input = ResetPasswordInput {
        token: req.token.unwrap_or_default(),
        new_password: req.new_password.unwrap_or_default(),
    };

    use_case
        .execute(input)
        .await
        .map_err(|e| e.reject_as(ErrorKind::BadRequest))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::message("Password reset successfully")),
    ))
}

// ============================================================================
// Verify Token
// ============================================================================

/// GET /api/auth/verify-token
pub async fn verify_token<S, N>(
    State(state): State<AuthAppState<S, N>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, EndpointRejection>
where
    S: DirectoryStore + Clone + Send + Sync + 'static,
    N: EmailNotifier + Clone + Send + Sync + 'static,
{
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| AuthError::MissingToken.reject_as(ErrorKind::Unauthorized))?;

    let use_case = VerifyTokenUseCase::new(state.store.clone(), state.config.clone());

    let user = use_case
        .execute(&token)
        .await
        .map_err(|e| e.reject_as(ErrorKind::Unauthorized))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_data(
            "Token verified successfully",
            AuthData {
                user: user.into(),
                token,
            },
        )),
    ))
}
