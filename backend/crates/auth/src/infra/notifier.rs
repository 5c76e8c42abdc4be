//! Logging Email Notifier
//!
//! Development stand-in for a mail service: messages are written to the log
//! instead of being delivered.

use crate::domain::notifier::{EmailMessage, EmailNotifier};
use crate::error::AuthResult;

#[derive(Debug, Clone)]
pub struct LogNotifier {
    from: String,
}

impl LogNotifier {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }
}

impl EmailNotifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> AuthResult<()> {
        tracing::info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            "Email queued (log delivery)"
        );
        // The body carries the reset link
        tracing::debug!(body = %message.html_body, "Email body");
        Ok(())
    }
}
