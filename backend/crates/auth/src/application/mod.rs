//! Application Layer
//!
//! Use cases and application services.

pub mod bearer_token;
pub mod config;
pub mod forgot_password;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;
pub mod verify_token;

// Re-exports
pub use bearer_token::{BearerClaims, BearerTokenSigner, IssuedToken};
pub use config::AuthConfig;
pub use forgot_password::{ForgotPasswordUseCase, RESET_REQUESTED_MESSAGE};
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{AuthenticatedOutput, SignUpInput, SignUpUseCase};
pub use verify_token::VerifyTokenUseCase;
