//! Infrastructure Layer
//!
//! Store and notifier implementations.

pub mod memory;
pub mod notifier;

pub use memory::InMemoryDirectoryStore;
pub use notifier::LogNotifier;
