//! Directory access used by [`EntryManager`](crate::EntryManager).

pub mod memory;

use async_trait::async_trait;

pub use memory::MemoryDirectory;

use crate::entry::Entry;

/// Errors a [`Directory`] reports.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("entry already exists: {dn}")]
    AlreadyExists { dn: String },

    #[error("no such entry: {dn}")]
    NoSuchEntry { dn: String },

    #[error("directory backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Entry-level directory operations.
///
/// Implementations own connection handling; callers see one request per
/// call.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Object-scope search: every entry whose DN is `dn`.
    async fn search(&self, dn: &str) -> Result<Vec<Entry>, DirectoryError>;

    /// Creates `entry`. Fails if its DN already exists.
    async fn add(&self, entry: &Entry) -> Result<(), DirectoryError>;

    /// Makes the stored entry equal to `entry`, creating it if absent.
    /// Attributes missing from `entry` are removed.
    async fn merge(&self, entry: &Entry) -> Result<(), DirectoryError>;

    /// Removes the entry at `dn`.
    async fn delete(&self, dn: &str) -> Result<(), DirectoryError>;
}
