//! Directory State
//!
//! Users and pending password resets. Every method is synchronous; callers
//! reach a `Directory` only through `DirectoryStore::with_directory`, which
//! gives each operation exclusive access for its whole read/modify sequence.

use std::collections::HashMap;

use crate::domain::entity::{reset_token::ResetToken, user::User};
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::{AuthError, AuthResult, TokenKind};

#[derive(Debug, Default)]
pub struct Directory {
    users: HashMap<UserId, User>,
    /// Email -> user index, keeps emails unique
    emails: HashMap<Email, UserId>,
    /// SHA-256(secret) -> pending reset
    reset_tokens: HashMap<String, ResetToken>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn reset_token_count(&self) -> usize {
        self.reset_tokens.len()
    }

    pub fn contains_email(&self, email: &Email) -> bool {
        self.emails.contains_key(email)
    }

    pub fn find_user_by_email(&self, email: &Email) -> Option<&User> {
        self.emails.get(email).and_then(|id| self.users.get(id))
    }

    pub fn find_user_by_id(&self, user_id: &UserId) -> Option<&User> {
        self.users.get(user_id)
    }

    /// Add a user; fails if the email is already registered
    pub fn insert_user(&mut self, user: User) -> AuthResult<()> {
        if self.emails.contains_key(&user.email) {
            return Err(AuthError::EmailTaken);
        }

        self.emails.insert(user.email.clone(), user.user_id);
        self.users.insert(user.user_id, user);
        Ok(())
    }

    /// Store a pending reset under the digest of `secret`
    pub fn insert_reset_token(&mut self, secret: &str, token: ResetToken) {
        self.reset_tokens.insert(ResetToken::key_for(secret), token);
    }

    /// Whether `secret` is a pending (possibly expired) reset
    pub fn has_reset_token(&self, secret: &str) -> bool {
        self.reset_tokens.contains_key(&ResetToken::key_for(secret))
    }

    /// Consume a reset secret and set the user's new password
    ///
    /// - unknown secret: `InvalidToken`, nothing changes
    /// - expired: the entry is removed, `ExpiredToken`
    /// - user gone: `UserNotFound`, the entry stays
    /// - otherwise the password is replaced and the entry removed
    pub fn redeem_reset_token(
        &mut self,
        secret: &str,
        new_password: UserPassword,
        now_ms: i64,
    ) -> AuthResult<UserId> {
        let key = ResetToken::key_for(secret);

        let (user_id, expired) = self
            .reset_tokens
            .get(&key)
            .map(|token| (token.user_id, token.is_expired_at(now_ms)))
            .ok_or(AuthError::InvalidToken(TokenKind::PasswordReset))?;

        if expired {
            self.reset_tokens.remove(&key);
            return Err(AuthError::ExpiredToken(TokenKind::PasswordReset));
        }

        let user = self
            .users
            .get_mut(&user_id)
            .ok_or(AuthError::UserNotFound)?;

        user.set_password(new_password);
        self.reset_tokens.remove(&key);

        Ok(user_id)
    }

    /// Drop every reset entry past its expiry; returns how many were removed
    pub fn purge_expired_reset_tokens(&mut self, now_ms: i64) -> usize {
        let before = self.reset_tokens.len();
        self.reset_tokens.retain(|_, token| !token.is_expired_at(now_ms));
        before - self.reset_tokens.len()
    }
}
