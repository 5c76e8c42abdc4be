//! Auth Error Types
//!
//! Auth-specific error variants. At the HTTP boundary each endpoint picks the
//! status its clients expect (`reject_as`), and the body is rendered by
//! `kernel::error::AppError` as the failure envelope.

use std::borrow::Cow;
use std::fmt;

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Which kind of token an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Bearer,
    PasswordReset,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Bearer => write!(f, "bearer"),
            TokenKind::PasswordReset => write!(f, "password reset"),
        }
    }
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed input; carries the client-facing message
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Email already registered
    #[error("User already exists with this email")]
    EmailTaken,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token supplied
    #[error("No token provided")]
    MissingToken,

    /// Bearer token could not be decoded
    #[error("Malformed token")]
    MalformedToken,

    /// Unknown reset token, or bearer tag mismatch
    #[error("Invalid {0} token")]
    InvalidToken(TokenKind),

    /// Token past its expiry
    #[error("Expired {0} token")]
    ExpiredToken(TokenKind),

    /// Token refers to a user that does not exist
    #[error("User not found")]
    UserNotFound,

    /// Notifier could not deliver an email
    #[error("Email dispatch failed: {0}")]
    EmailDispatch(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Natural classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::InvalidToken(_) => ErrorKind::Unauthorized,
            AuthError::ExpiredToken(_) => ErrorKind::Gone,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailDispatch(_) => ErrorKind::BadGateway,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to show to clients
    pub fn public_message(&self) -> Cow<'static, str> {
        match self {
            AuthError::Validation(msg) => Cow::Owned(msg.clone()),
            AuthError::EmailTaken => "User already exists with this email".into(),
            AuthError::InvalidCredentials => "Invalid email or password".into(),
            AuthError::MissingToken => "No token provided".into(),
            AuthError::MalformedToken => "Malformed token".into(),
            AuthError::InvalidToken(TokenKind::Bearer) => "Invalid token".into(),
            AuthError::InvalidToken(TokenKind::PasswordReset) => {
                "Invalid or expired reset token".into()
            }
            AuthError::ExpiredToken(TokenKind::Bearer) => "Token has expired".into(),
            AuthError::ExpiredToken(TokenKind::PasswordReset) => "Reset token has expired".into(),
            AuthError::UserNotFound => "User not found".into(),
            AuthError::EmailDispatch(_) => "Failed to send reset email".into(),
            AuthError::Internal(_) => "Internal server error".into(),
        }
    }

    /// Bind this error to the failure status of the endpoint that produced it
    ///
    /// Client errors take the endpoint's kind; server errors keep their own.
    pub fn reject_as(self, kind: ErrorKind) -> EndpointRejection {
        let kind = if self.kind().is_server_error() {
            self.kind()
        } else {
            kind
        };
        EndpointRejection { kind, error: self }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::EmailDispatch(msg) => {
                tracing::error!(message = %msg, "Email dispatch error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken(kind) | AuthError::ExpiredToken(kind) => {
                tracing::warn!(token_kind = %kind, error = %self, "Token rejected");
            }
            AuthError::MalformedToken => {
                tracing::warn!("Malformed bearer token presented");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

/// An [`AuthError`] bound to an HTTP status
#[derive(Debug)]
pub struct EndpointRejection {
    kind: ErrorKind,
    error: AuthError,
}

impl EndpointRejection {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind, self.error.public_message())
    }
}

impl IntoResponse for EndpointRejection {
    fn into_response(self) -> Response {
        self.error.log();
        self.to_app_error().into_response()
    }
}
