//! Password Reset Token Entity
//!
//! The secret handed to the user is 32 random bytes, hex-encoded. The
//! directory only keeps its SHA-256 digest as the map key, so a dump of the
//! directory does not contain redeemable tokens.

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{random_hex, sha256_hex};

use crate::domain::value_object::{email::Email, user_id::UserId};

/// Random bytes per reset secret
pub const RESET_SECRET_BYTES: usize = 32;

/// Pending password reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub user_id: UserId,
    pub email: Email,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
}

impl ResetToken {
    /// TTL is provided by the application layer (config), not hard-coded here.
    /// An expiry past chrono's range saturates at its bounds.
    pub fn new(user_id: UserId, email: Email, ttl: Duration) -> Self {
        let expires_at = Utc::now().checked_add_signed(ttl).unwrap_or(if ttl < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });

        Self {
            user_id,
            email,
            expires_at_ms: expires_at.timestamp_millis(),
        }
    }

    /// Fresh secret to send to the user
    pub fn generate_secret() -> String {
        random_hex(RESET_SECRET_BYTES)
    }

    /// Map key for a secret
    pub fn key_for(secret: &str) -> String {
        sha256_hex(secret.as_bytes())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }
}
