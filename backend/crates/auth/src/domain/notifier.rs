//! Outgoing Email
//!
//! The directory never talks to a mail server itself; it hands messages to
//! an [`EmailNotifier`].

use crate::error::AuthResult;

/// One outgoing email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Email delivery collaborator
#[trait_variant::make(EmailNotifier: Send)]
pub trait LocalEmailNotifier {
    /// Deliver `message`; failures are reported as `AuthError::EmailDispatch`
    async fn send(&self, message: &EmailMessage) -> AuthResult<()>;
}
