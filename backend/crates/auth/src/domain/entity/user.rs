//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_id::UserId, user_password::UserPassword,
};

/// User entity
///
/// The only mutable field after creation is `password`.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    /// Unique across the directory (exact match)
    pub email: Email,
    /// Argon2id hash; never leaves the directory
    pub password: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(
        first_name: PersonName,
        last_name: PersonName,
        email: Email,
        password: UserPassword,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            first_name,
            last_name,
            email,
            password,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the password hash
    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }

    /// Public projection (everything but the credential)
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            user_id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// User without its credential, safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub user_id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}
