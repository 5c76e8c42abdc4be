//! Sign In Use Case
//!
//! Checks email and password, then issues a bearer token.

use std::sync::Arc;

use crate::application::bearer_token::BearerTokenSigner;
use crate::application::config::AuthConfig;
use crate::application::sign_up::AuthenticatedOutput;
use crate::domain::repository::DirectoryStore;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<S>
where
    S: DirectoryStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignInUseCase<S>
where
    S: DirectoryStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<AuthenticatedOutput> {
        if input.email.trim().is_empty() || input.password.trim().is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        // Anything that cannot belong to a stored account is just a failed login
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .store
            .with_directory(move |dir| Ok(dir.find_user_by_email(&email).cloned()))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.password.verify(&raw_password, self.config.pepper()) {
            tracing::debug!(user_id = %user.user_id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = BearerTokenSigner::new(&self.config).issue(user.user_id)?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(AuthenticatedOutput {
            user: user.to_public(),
            token: issued.token,
        })
    }
}
