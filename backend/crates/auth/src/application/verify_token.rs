//! Verify Token Use Case
//!
//! Resolves a bearer token to the user it was issued for.

use std::sync::Arc;

use crate::application::bearer_token::BearerTokenSigner;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::PublicUser;
use crate::domain::repository::DirectoryStore;
use crate::error::{AuthError, AuthResult};

/// Verify token use case
pub struct VerifyTokenUseCase<S>
where
    S: DirectoryStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> VerifyTokenUseCase<S>
where
    S: DirectoryStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<PublicUser> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = BearerTokenSigner::new(&self.config).verify(token)?;

        let user_id = claims.user_id;
        self.store
            .with_directory(move |dir| {
                dir.find_user_by_id(&user_id)
                    .map(|user| user.to_public())
                    .ok_or(AuthError::UserNotFound)
            })
            .await
    }
}
