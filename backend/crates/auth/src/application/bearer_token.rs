//! Bearer Token Signer
//!
//! Stateless tokens of the form `base64url(payload).base64url(tag)` where
//! `payload = "<user_id>:<expires_at_ms>:<nonce_hex>"` and `tag` is
//! HMAC-SHA256 of the payload under `AuthConfig::token_secret`.

use chrono::Utc;
use hmac::{Hmac, Mac};
use platform::crypto::{from_base64url, random_hex, to_base64url};
use sha2::Sha256;

use crate::application::config::AuthConfig;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult, TokenKind};

type HmacSha256 = Hmac<Sha256>;

/// Random bytes mixed into every payload so two tokens never collide
const NONCE_BYTES: usize = 8;

/// A freshly issued token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at_ms: i64,
}

/// Decoded and verified token contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerClaims {
    pub user_id: UserId,
    pub expires_at_ms: i64,
}

/// Issues and verifies bearer tokens
#[derive(Clone)]
pub struct BearerTokenSigner {
    secret: [u8; 32],
    ttl_ms: i64,
}

impl BearerTokenSigner {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.token_secret,
            ttl_ms: config.token_ttl_ms(),
        }
    }

    pub fn issue(&self, user_id: UserId) -> AuthResult<IssuedToken> {
        self.issue_at(user_id, Utc::now().timestamp_millis())
    }

    pub fn issue_at(&self, user_id: UserId, now_ms: i64) -> AuthResult<IssuedToken> {
        let expires_at_ms = now_ms.saturating_add(self.ttl_ms);
        let payload = format!("{}:{}:{}", user_id, expires_at_ms, random_hex(NONCE_BYTES));

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let tag = mac.finalize().into_bytes();

        Ok(IssuedToken {
            token: format!("{}.{}", to_base64url(payload.as_bytes()), to_base64url(&tag)),
            expires_at_ms,
        })
    }

    pub fn verify(&self, token: &str) -> AuthResult<BearerClaims> {
        self.verify_at(token, Utc::now().timestamp_millis())
    }

    /// Checks run in order: structure, tag, expiry
    pub fn verify_at(&self, token: &str, now_ms: i64) -> AuthResult<BearerClaims> {
        let (payload_b64, tag_b64) = token.split_once('.').ok_or(AuthError::MalformedToken)?;
        let payload = from_base64url(payload_b64).map_err(|_| AuthError::MalformedToken)?;
        let tag = from_base64url(tag_b64).map_err(|_| AuthError::MalformedToken)?;
        let claims = parse_payload(&payload)?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&tag)
            .map_err(|_| AuthError::InvalidToken(TokenKind::Bearer))?;

        if now_ms > claims.expires_at_ms {
            return Err(AuthError::ExpiredToken(TokenKind::Bearer));
        }

        Ok(claims)
    }

    fn mac(&self) -> AuthResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| AuthError::Internal(e.to_string()))
    }
}

fn parse_payload(payload: &[u8]) -> AuthResult<BearerClaims> {
    let payload = std::str::from_utf8(payload).map_err(|_| AuthError::MalformedToken)?;

    let mut parts = payload.split(':');
    let (Some(user_id), Some(expires_at_ms), Some(nonce), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::MalformedToken);
    };

    if nonce.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    Ok(BearerClaims {
        user_id: user_id.parse().map_err(|_| AuthError::MalformedToken)?,
        expires_at_ms: expires_at_ms.parse().map_err(|_| AuthError::MalformedToken)?,
    })
}
