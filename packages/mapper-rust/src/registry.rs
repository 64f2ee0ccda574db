use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use attrbind_core::{Codec, CodecResolver, ConstructionError, TypeDescriptor};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::bean::Bean;
use crate::config::MapperConfig;
use crate::descriptor::ClassDescriptor;
use crate::error::MappingError;

// ---------------------------------------------------------------------------
// CodecCache
// ---------------------------------------------------------------------------

/// Resolved codecs keyed by type descriptor, shared between classes.
#[derive(Debug, Default)]
pub struct CodecCache {
    resolver: CodecResolver,
    codecs: DashMap<TypeDescriptor, Arc<Codec>>,
}

impl CodecCache {
    #[must_use]
    pub fn new(resolver: CodecResolver) -> Self {
        Self {
            resolver,
            codecs: DashMap::new(),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &CodecResolver {
        &self.resolver
    }

    /// Returns the cached codec for `descriptor`, resolving it on first use.
    ///
    /// Failures are not cached.
    ///
    /// # Errors
    ///
    /// Returns the resolver's [`ConstructionError`].
    pub fn get_or_resolve(&self, descriptor: &TypeDescriptor) -> Result<Arc<Codec>, ConstructionError> {
        if let Some(codec) = self.codecs.get(descriptor) {
            return Ok(Arc::clone(codec.value()));
        }
        match self.codecs.entry(descriptor.clone()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let codec = Arc::new(self.resolver.resolve(descriptor)?);
                entry.insert(Arc::clone(&codec));
                Ok(codec)
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DescriptorRegistry
// ---------------------------------------------------------------------------

/// Class descriptors keyed by bean type.
///
/// The presence check and the insert happen under one lock, so concurrent
/// first use of a type builds its descriptor exactly once and every caller
/// observes the same instance. Descriptors are never evicted.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    config: MapperConfig,
    codecs: CodecCache,
    classes: Mutex<HashMap<TypeId, Arc<ClassDescriptor>>>,
}

impl DescriptorRegistry {
    #[must_use]
    pub fn new(resolver: CodecResolver, config: MapperConfig) -> Self {
        Self {
            config,
            codecs: CodecCache::new(resolver),
            classes: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    #[must_use]
    pub fn codecs(&self) -> &CodecCache {
        &self.codecs
    }

    /// Returns the descriptor for `T`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`MappingError`] if any property of `T` cannot be resolved.
    /// Nothing is cached in that case.
    pub fn descriptor<T: Bean>(&self) -> Result<Arc<ClassDescriptor>, MappingError> {
        let mut classes = self.classes.lock();
        if let Some(descriptor) = classes.get(&TypeId::of::<T>()) {
            return Ok(Arc::clone(descriptor));
        }
        let descriptor = Arc::new(ClassDescriptor::build(&T::schema(), &self.config, |d| {
            self.codecs.get_or_resolve(d)
        })?);
        debug!(
            class = descriptor.class_name(),
            properties = descriptor.properties().len(),
            "built class descriptor"
        );
        classes.insert(TypeId::of::<T>(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Returns the descriptor for `T` if it was already built.
    pub fn get<T: Bean>(&self) -> Option<Arc<ClassDescriptor>> {
        self.classes.lock().get(&TypeId::of::<T>()).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.lock().is_empty()
    }
}
