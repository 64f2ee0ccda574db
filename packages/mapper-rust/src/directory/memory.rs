//! In-memory [`Directory`] backed by [`DashMap`].

use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use tracing::debug;

use super::{Directory, DirectoryError};
use crate::entry::Entry;

/// Directory held entirely in memory, keyed by normalized DN.
///
/// DNs compare case-insensitively with whitespace around RDN separators
/// ignored.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    entries: DashMap<String, Entry>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stored entry at `dn`.
    #[must_use]
    pub fn get(&self, dn: &str) -> Option<Entry> {
        self.entries.get(&normalize(dn)).map(|e| e.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(dn: &str) -> String {
    dn.split(',')
        .map(|rdn| rdn.trim().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn search(&self, dn: &str) -> Result<Vec<Entry>, DirectoryError> {
        Ok(self.get(dn).into_iter().collect())
    }

    async fn add(&self, entry: &Entry) -> Result<(), DirectoryError> {
        match self.entries.entry(normalize(&entry.dn)) {
            MapEntry::Occupied(_) => Err(DirectoryError::AlreadyExists {
                dn: entry.dn.clone(),
            }),
            MapEntry::Vacant(slot) => {
                slot.insert(entry.clone());
                debug!(dn = %entry.dn, attributes = entry.attributes.len(), "added entry");
                Ok(())
            }
        }
    }

    async fn merge(&self, entry: &Entry) -> Result<(), DirectoryError> {
        match self.entries.entry(normalize(&entry.dn)) {
            MapEntry::Occupied(mut slot) => {
                let stored = slot.get_mut();
                if stored.attributes == entry.attributes {
                    debug!(dn = %entry.dn, "merge found no changes");
                } else {
                    stored.attributes.clone_from(&entry.attributes);
                    debug!(dn = %entry.dn, "merged entry");
                }
            }
            MapEntry::Vacant(slot) => {
                slot.insert(entry.clone());
                debug!(dn = %entry.dn, "merge added entry");
            }
        }
        Ok(())
    }

    async fn delete(&self, dn: &str) -> Result<(), DirectoryError> {
        if self.entries.remove(&normalize(dn)).is_none() {
            return Err(DirectoryError::NoSuchEntry { dn: dn.to_string() });
        }
        debug!(dn, "deleted entry");
        Ok(())
    }
}
