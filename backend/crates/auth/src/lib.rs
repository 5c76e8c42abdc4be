//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, directory state, store and notifier traits
//! - `application/` - Use cases, configuration, bearer token signing
//! - `infra/` - In-memory store and development email notifier
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Signup / login with email + password
//! - Stateless HMAC-signed bearer tokens
//! - Forgot / reset password with single-use, time-bounded reset tokens
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, verified in constant time
//! - Bearer tokens carry their own expiry and an HMAC-SHA256 tag
//! - Reset tokens are stored by SHA-256 digest, never in clear
//! - Forgot-password answers identically whether or not the account exists

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult, EndpointRejection};
pub use infra::memory::InMemoryDirectoryStore;
pub use infra::notifier::LogNotifier;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
