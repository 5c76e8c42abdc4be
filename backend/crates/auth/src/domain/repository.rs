//! Store Trait
//!
//! Interface for owning the directory. Implementations live in infra.

use crate::domain::directory::Directory;
use crate::error::AuthResult;

/// Owner of the [`Directory`]
#[trait_variant::make(DirectoryStore: Send)]
pub trait LocalDirectoryStore {
    /// Run `f` with exclusive access to the directory
    ///
    /// No other operation observes or mutates the directory while `f` runs.
    /// Mutations made by `f` persist even when it returns an error.
    async fn with_directory<F, T>(&self, f: F) -> AuthResult<T>
    where
        F: FnOnce(&mut Directory) -> AuthResult<T> + Send,
        T: Send;
}
