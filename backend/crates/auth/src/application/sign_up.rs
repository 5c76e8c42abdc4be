//! Sign Up Use Case
//!
//! Registers a new user and issues a bearer token.

use std::sync::Arc;

use crate::application::bearer_token::BearerTokenSigner;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::{PublicUser, User};
use crate::domain::repository::DirectoryStore;
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Sign up input
pub struct SignUpInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// User and a fresh bearer token (sign up, sign in)
#[derive(Debug, Clone)]
pub struct AuthenticatedOutput {
    pub user: PublicUser,
    pub token: String,
}

/// Sign up use case
pub struct SignUpUseCase<S>
where
    S: DirectoryStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignUpUseCase<S>
where
    S: DirectoryStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<AuthenticatedOutput> {
        if [&input.first_name, &input.last_name, &input.email, &input.password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(AuthError::Validation(ALL_FIELDS_REQUIRED.to_string()));
        }

        let first_name = PersonName::new(input.first_name)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;
        let last_name = PersonName::new(input.last_name)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;
        let email =
            Email::new(input.email).map_err(|e| AuthError::Validation(e.message().to_string()))?;
        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        // Fail fast before spending time on hashing
        let lookup = email.clone();
        let taken = self
            .store
            .with_directory(move |dir| Ok(dir.contains_email(&lookup)))
            .await?;
        if taken {
            return Err(AuthError::EmailTaken);
        }

        let password = UserPassword::from_raw(
            &raw_password,
            self.config.pepper(),
            self.config.password_cost,
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(first_name, last_name, email, password);
        let public = user.to_public();

        // Insert re-checks the email under the same lock
        self.store
            .with_directory(move |dir| dir.insert_user(user))
            .await?;

        let issued = BearerTokenSigner::new(&self.config).issue(public.user_id)?;

        tracing::info!(
            user_id = %public.user_id,
            email = %public.email,
            "User signed up"
        );

        Ok(AuthenticatedOutput {
            user: public,
            token: issued.token,
        })
    }
}
