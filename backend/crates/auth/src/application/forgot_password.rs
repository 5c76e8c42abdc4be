//! Forgot Password Use Case
//!
//! Stores a reset token for a known email and mails the reset link. The
//! caller always gets the same acknowledgement, so the endpoint does not
//! reveal whether an account exists.

use std::sync::Arc;
use std::time::Duration;

use crate::application::config::AuthConfig;
use crate::domain::entity::reset_token::ResetToken;
use crate::domain::notifier::{EmailMessage, EmailNotifier};
use crate::domain::repository::DirectoryStore;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Acknowledgement returned for every well-formed request
pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent";

const RESET_EMAIL_SUBJECT: &str = "Password Reset Request";

/// Forgot password use case
pub struct ForgotPasswordUseCase<S, N>
where
    S: DirectoryStore,
    N: EmailNotifier,
{
    store: Arc<S>,
    notifier: Arc<N>,
    config: Arc<AuthConfig>,
}

impl<S, N> ForgotPasswordUseCase<S, N>
where
    S: DirectoryStore,
    N: EmailNotifier,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Returns the acknowledgement message
    pub async fn execute(&self, email: String) -> AuthResult<&'static str> {
        if email.trim().is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }

        // Over-long input cannot match any account
        let Ok(email) = Email::new(email) else {
            return Ok(RESET_REQUESTED_MESSAGE);
        };

        let secret = ResetToken::generate_secret();
        let ttl = self.config.reset_token_ttl_chrono();

        // Token is stored before any email goes out
        let key_secret = secret.clone();
        let recipient = self
            .store
            .with_directory(move |dir| {
                let Some(user) = dir.find_user_by_email(&email) else {
                    return Ok(None);
                };
                let token = ResetToken::new(user.user_id, user.email.clone(), ttl);
                let user_id = user.user_id;
                dir.insert_reset_token(&key_secret, token);
                Ok(Some((user_id, email)))
            })
            .await?;

        let Some((user_id, email)) = recipient else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(RESET_REQUESTED_MESSAGE);
        };

        let message = self.reset_email(&email, &secret);
        match self.notifier.send(&message).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, "Password reset email sent");
            }
            Err(e) => {
                // The stored token stays redeemable
                tracing::warn!(user_id = %user_id, error = %e, "Password reset email not delivered");
            }
        }

        Ok(RESET_REQUESTED_MESSAGE)
    }

    fn reset_email(&self, email: &Email, secret: &str) -> EmailMessage {
        let reset_url = self.config.reset_url(secret);
        let html_body = format!(
            "<h2>Password Reset Request</h2>\
             <p>You requested a password reset. Click the link below to reset your password:</p>\
             <a href=\"{url}\">{url}</a>\
             <p>This link will expire in {expiry}.</p>\
             <p>If you didn't request this, please ignore this email.</p>",
            url = reset_url,
            expiry = expiry_phrase(self.config.reset_token_ttl),
        );

        EmailMessage {
            to: email.to_string(),
            subject: RESET_EMAIL_SUBJECT.to_string(),
            html_body,
        }
    }
}

/// Largest whole unit that divides the TTL, e.g. "1 hour" or "90 seconds"
fn expiry_phrase(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    let (count, unit) = match secs {
        s if s >= 3600 && s % 3600 == 0 => (s / 3600, "hour"),
        s if s >= 60 && s % 60 == 0 => (s / 60, "minute"),
        s => (s, "second"),
    };

    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
