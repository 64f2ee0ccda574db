//! Bean-level directory operations.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::bean::Bean;
use crate::directory::Directory;
use crate::error::ManagerError;
use crate::mapper::EntryMapper;

/// Finds, adds, merges, and deletes beans of type `T` in a directory.
///
/// The bean type is described when the manager is created, so an
/// unsupported property type fails here rather than on first use.
pub struct EntryManager<T, D: ?Sized> {
    mapper: EntryMapper,
    directory: Arc<D>,
    _bean: PhantomData<fn() -> T>,
}

impl<T: Bean, D: Directory + ?Sized> EntryManager<T, D> {
    /// # Errors
    ///
    /// Returns [`ManagerError::Mapping`] if `T` cannot be described.
    pub fn new(mapper: EntryMapper, directory: Arc<D>) -> Result<Self, ManagerError> {
        mapper.register::<T>()?;
        Ok(Self {
            mapper,
            directory,
            _bean: PhantomData,
        })
    }

    #[must_use]
    pub fn mapper(&self) -> &EntryMapper {
        &self.mapper
    }

    #[must_use]
    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    /// Loads the entry at the DN held by `bean` into `bean`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NotFound`] or [`ManagerError::MultipleEntries`]
    /// unless exactly one entry matches, or any mapping or directory error.
    pub async fn find(&self, mut bean: T) -> Result<T, ManagerError> {
        let dn = self.mapper.dn(&bean)?;
        let mut entries = self.directory.search(&dn).await?;
        let entry = match entries.len() {
            0 => return Err(ManagerError::NotFound { dn }),
            1 => entries.remove(0),
            count => return Err(ManagerError::MultipleEntries { dn, count }),
        };
        self.mapper.map_from_entry(&entry, &mut bean)?;
        debug!(%dn, "found entry");
        Ok(bean)
    }

    /// # Errors
    ///
    /// Returns a mapping error, or the directory's error if the DN exists.
    pub async fn add(&self, bean: &T) -> Result<(), ManagerError> {
        let entry = self.mapper.map_to_entry(bean)?;
        self.directory.add(&entry).await?;
        Ok(())
    }

    /// Writes `bean` over the stored entry, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns any mapping or directory error.
    pub async fn merge(&self, bean: &T) -> Result<(), ManagerError> {
        let entry = self.mapper.map_to_entry(bean)?;
        self.directory.merge(&entry).await?;
        Ok(())
    }

    /// Deletes the entry at the DN held by `bean`.
    ///
    /// # Errors
    ///
    /// Returns a mapping error if `bean` has no DN, or the directory's error.
    pub async fn delete(&self, bean: &T) -> Result<(), ManagerError> {
        let dn = self.mapper.dn(bean)?;
        self.directory.delete(&dn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use attrbind_core::{AttributeValues, Value};

    use super::*;
    use crate::bean::BeanSchema;
    use crate::config::MapperConfig;
    use crate::directory::{DirectoryError, MemoryDirectory};
    use crate::entry::Entry;
    use crate::error::{MappingError, PropertyError};
    use crate::test_support::Person;

    fn manager() -> EntryManager<Person, MemoryDirectory> {
        EntryManager::new(EntryMapper::default(), Arc::new(MemoryDirectory::new())).unwrap()
    }

    fn lookup(dn: &str) -> Person {
        Person {
            dn: dn.to_string(),
            ..Person::default()
        }
    }

    #[tokio::test]
    async fn add_then_find() {
        let manager = manager();
        let alice = Person::alice();
        manager.add(&alice).await.unwrap();

        let found = manager.find(lookup(&alice.dn)).await.unwrap();
        assert_eq!(found, alice);
    }

    #[tokio::test]
    async fn find_missing_entry() {
        let manager = manager();
        let err = manager.find(lookup("uid=ghost")).await.unwrap_err();
        assert!(matches!(err, ManagerError::NotFound { ref dn } if dn == "uid=ghost"));
    }

    #[tokio::test]
    async fn add_twice_is_a_directory_error() {
        let manager = manager();
        manager.add(&Person::alice()).await.unwrap();
        assert!(matches!(
            manager.add(&Person::alice()).await,
            Err(ManagerError::Directory(DirectoryError::AlreadyExists { .. }))
        ));
    }

    #[tokio::test]
    async fn merge_updates_and_clears() {
        let manager = manager();
        let mut alice = Person::alice();
        manager.add(&alice).await.unwrap();

        alice.cn = "Alice Smith".to_string();
        alice.photo = None;
        manager.merge(&alice).await.unwrap();

        let stored = manager.directory().get(&alice.dn).unwrap();
        assert_eq!(stored.attribute("cn"), Some(&AttributeValues::text(["Alice Smith"])));
        assert!(stored.attribute("jpegPhoto").is_none());
        assert_eq!(manager.find(lookup(&alice.dn)).await.unwrap(), alice);
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let manager = manager();
        let alice = Person::alice();
        manager.add(&alice).await.unwrap();
        manager.delete(&alice).await.unwrap();
        assert!(manager.directory().is_empty());
        assert!(matches!(
            manager.find(lookup(&alice.dn)).await,
            Err(ManagerError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn bean_without_dn_is_rejected() {
        let manager = manager();
        assert!(matches!(
            manager.delete(&Person::default()).await,
            Err(ManagerError::Mapping(MappingError::MissingDn { .. }))
        ));
    }

    /// Answers every search with two copies of the same entry.
    struct Aliased;

    #[async_trait]
    impl Directory for Aliased {
        async fn search(&self, dn: &str) -> Result<Vec<Entry>, DirectoryError> {
            Ok(vec![Entry::new(dn), Entry::new(dn)])
        }

        async fn add(&self, _entry: &Entry) -> Result<(), DirectoryError> {
            Ok(())
        }

        async fn merge(&self, _entry: &Entry) -> Result<(), DirectoryError> {
            Ok(())
        }

        async fn delete(&self, _dn: &str) -> Result<(), DirectoryError> {
            Err(DirectoryError::Backend(anyhow::anyhow!("read-only")))
        }
    }

    #[tokio::test]
    async fn find_with_several_matches() {
        let manager: EntryManager<Person, dyn Directory> =
            EntryManager::new(EntryMapper::default(), Arc::new(Aliased) as Arc<dyn Directory>)
                .unwrap();
        let err = manager.find(lookup("uid=twin")).await.unwrap_err();
        assert!(matches!(err, ManagerError::MultipleEntries { count: 2, .. }));

        let err = manager.delete(&lookup("uid=twin")).await.unwrap_err();
        assert_eq!(err.to_string(), "directory backend error: read-only");
    }

    struct Unmappable;

    impl Bean for Unmappable {
        fn schema() -> BeanSchema {
            BeanSchema::new("Unmappable").dn("dn").property("nested", "List<List<String>>")
        }

        fn get(&self, _property: &str) -> Option<Value> {
            None
        }

        fn set(&mut self, _property: &str, _value: Value) -> Result<(), PropertyError> {
            Ok(())
        }
    }

    #[test]
    fn unsupported_bean_fails_at_creation() {
        let result = EntryManager::<Unmappable, MemoryDirectory>::new(
            EntryMapper::new(MapperConfig::default()),
            Arc::new(MemoryDirectory::new()),
        );
        assert!(matches!(
            result,
            Err(ManagerError::Mapping(MappingError::Construction { .. }))
        ));
    }
}
