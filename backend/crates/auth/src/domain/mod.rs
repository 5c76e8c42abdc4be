//! Domain Layer
//!
//! Contains entities, value objects, the directory state and the traits
//! for its store and the outgoing email notifier.

pub mod directory;
pub mod entity;
pub mod notifier;
pub mod repository;
pub mod value_object;

// Re-exports
pub use directory::Directory;
pub use entity::{reset_token::ResetToken, user::PublicUser, user::User};
pub use notifier::{EmailMessage, EmailNotifier};
pub use repository::DirectoryStore;
