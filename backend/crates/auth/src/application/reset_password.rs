//! Reset Password Use Case
//!
//! Redeems a reset token and replaces the user's password.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::repository::DirectoryStore;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Reset password input
pub struct ResetPasswordInput {
    pub token: String,
    pub new_password: String,
}

/// Reset password use case
pub struct ResetPasswordUseCase<S>
where
    S: DirectoryStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> ResetPasswordUseCase<S>
where
    S: DirectoryStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<()> {
        if input.token.trim().is_empty() || input.new_password.trim().is_empty() {
            return Err(AuthError::Validation(
                "Token and new password are required".to_string(),
            ));
        }

        let raw_password = RawPassword::new(input.new_password)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        // Hash outside the lock; the token is checked and consumed in one step below
        let password = UserPassword::from_raw(
            &raw_password,
            self.config.pepper(),
            self.config.password_cost,
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        let token = input.token;
        let user_id = self
            .store
            .with_directory(move |dir| {
                dir.redeem_reset_token(&token, password, Utc::now().timestamp_millis())
            })
            .await?;

        tracing::info!(user_id = %user_id, "Password reset");

        Ok(())
    }
}
