//! In-Memory Directory Store
//!
//! Process-local state; everything is lost on restart.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::directory::Directory;
use crate::domain::repository::DirectoryStore;
use crate::error::AuthResult;

/// Directory behind a single async mutex
#[derive(Clone, Default)]
pub struct InMemoryDirectoryStore {
    inner: Arc<Mutex<Directory>>,
}

impl InMemoryDirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean up expired reset tokens
    pub async fn cleanup_expired(&self) -> AuthResult<usize> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = self
            .with_directory(move |dir| Ok(dir.purge_expired_reset_tokens(now_ms)))
            .await?;

        if deleted > 0 {
            tracing::info!(reset_tokens_deleted = deleted, "Cleaned up expired reset tokens");
        } else {
            tracing::debug!("No expired reset tokens to clean up");
        }

        Ok(deleted)
    }
}

impl DirectoryStore for InMemoryDirectoryStore {
    async fn with_directory<F, T>(&self, f: F) -> AuthResult<T>
    where
        F: FnOnce(&mut Directory) -> AuthResult<T> + Send,
        T: Send,
    {
        let mut directory = self.inner.lock().await;
        f(&mut *directory)
    }
}
