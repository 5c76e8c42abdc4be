//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

pub use platform::password::HashingCost;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret key for HMAC signing of bearer tokens (32 bytes)
    pub token_secret: [u8; 32],
    /// Bearer token lifetime (24 hours)
    pub token_ttl: Duration,
    /// Password reset token lifetime (1 hour)
    pub reset_token_ttl: Duration,
    /// How often expired reset tokens are swept
    pub reset_token_sweep_interval: Duration,
    /// Front-end page that receives `?token=<reset token>`
    pub reset_url_base: String,
    /// Sender address for outgoing email
    pub email_from: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id parameters for new hashes
    pub password_cost: HashingCost,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            token_ttl: Duration::from_secs(24 * 3600), // 24 hours
            reset_token_ttl: Duration::from_secs(3600), // 1 hour
            reset_token_sweep_interval: Duration::from_secs(600),
            reset_url_base: "http://localhost:4200/reset-password".to_string(),
            email_from: "noreply@example.com".to_string(),
            password_pepper: None,
            password_cost: HashingCost::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (random secret, cheap hashing)
    pub fn development() -> Self {
        Self {
            password_cost: HashingCost::minimal(),
            ..Self::with_random_secret()
        }
    }

    /// Bearer token TTL in milliseconds
    pub fn token_ttl_ms(&self) -> i64 {
        i64::try_from(self.token_ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Reset token TTL as a chrono duration
    pub fn reset_token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.reset_token_ttl).unwrap_or(chrono::Duration::MAX)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Link sent in the reset email
    pub fn reset_url(&self, secret: &str) -> String {
        format!("{}?token={}", self.reset_url_base, secret)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("reset_token_ttl", &self.reset_token_ttl)
            .field("reset_token_sweep_interval", &self.reset_token_sweep_interval)
            .field("reset_url_base", &self.reset_url_base)
            .field("email_from", &self.email_from)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("password_cost", &self.password_cost)
            .finish()
    }
}
