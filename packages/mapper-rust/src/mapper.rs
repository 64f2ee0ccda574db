//! Moves beans to and from directory entries.

use std::sync::Arc;

use attrbind_core::{AttributeValues, CodecResolver, ConversionError, Value};
use tracing::warn;

use crate::bean::Bean;
use crate::config::MapperConfig;
use crate::descriptor::{ClassDescriptor, PropertyDescriptor};
use crate::entry::Entry;
use crate::error::MappingError;
use crate::registry::DescriptorRegistry;

/// Converts beans to entries and back using cached class descriptors.
///
/// Cloning is cheap; clones share one [`DescriptorRegistry`].
#[derive(Debug, Clone, Default)]
pub struct EntryMapper {
    registry: Arc<DescriptorRegistry>,
}

impl EntryMapper {
    /// A mapper over the built-in scalar codecs.
    #[must_use]
    pub fn new(config: MapperConfig) -> Self {
        Self::with_resolver(CodecResolver::new(), config)
    }

    /// A mapper over `resolver`, which may carry custom scalar codecs.
    #[must_use]
    pub fn with_resolver(resolver: CodecResolver, config: MapperConfig) -> Self {
        Self {
            registry: Arc::new(DescriptorRegistry::new(resolver, config)),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<DescriptorRegistry> {
        &self.registry
    }

    /// Describes `T`, resolving codecs for all its properties.
    ///
    /// # Errors
    ///
    /// Returns a [`MappingError`] if any property type is unsupported.
    pub fn register<T: Bean>(&self) -> Result<Arc<ClassDescriptor>, MappingError> {
        self.registry.descriptor::<T>()
    }

    /// The distinguished name held by `bean`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::MissingDn`] if `T` declares no DN property or
    /// its value is not a string.
    pub fn dn<T: Bean>(&self, bean: &T) -> Result<String, MappingError> {
        let descriptor = self.register::<T>()?;
        Self::dn_of(&descriptor, bean)
    }

    /// Encodes every mapped property of `bean` into an entry.
    ///
    /// Properties whose encoding is empty are skipped unless
    /// `write_empty_attributes` is set.
    ///
    /// # Errors
    ///
    /// Returns a [`MappingError`] if the bean has no DN or a property value
    /// does not fit its codec.
    pub fn map_to_entry<T: Bean>(&self, bean: &T) -> Result<Entry, MappingError> {
        let descriptor = self.register::<T>()?;
        let mut entry = Entry::new(Self::dn_of(&descriptor, bean)?);
        let write_empty = self.registry.config().write_empty_attributes;

        for property in descriptor.properties() {
            let value = bean.get(property.name()).unwrap_or(Value::Null);
            let values = property
                .codec()
                .encode(&value, property.is_binary())
                .map_err(|source| conversion(&descriptor, property, source))?;
            if values.is_empty() && !write_empty {
                continue;
            }
            entry.set_attribute(property.attribute(), values);
        }
        Ok(entry)
    }

    /// Decodes `entry` into `bean`.
    ///
    /// Every mapped property is assigned; an absent attribute decodes as no
    /// values, giving the codec's default.
    ///
    /// # Errors
    ///
    /// Returns a [`MappingError`] if an attribute cannot be decoded or the
    /// bean rejects a value.
    pub fn map_from_entry<T: Bean>(&self, entry: &Entry, bean: &mut T) -> Result<(), MappingError> {
        let descriptor = self.register::<T>()?;

        if let Some(dn_property) = descriptor.dn_property() {
            bean.set(dn_property, Value::String(entry.dn.clone()))
                .map_err(|source| MappingError::Property {
                    class: descriptor.class_name().to_string(),
                    property: dn_property.to_string(),
                    source,
                })?;
        }

        let absent = AttributeValues::empty();
        for property in descriptor.properties() {
            let values = entry.attribute(property.attribute()).unwrap_or(&absent);
            let value = property
                .codec()
                .decode(values)
                .map_err(|source| conversion(&descriptor, property, source))?;
            bean.set(property.name(), value)
                .map_err(|source| MappingError::Property {
                    class: descriptor.class_name().to_string(),
                    property: property.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    fn dn_of<T: Bean>(descriptor: &ClassDescriptor, bean: &T) -> Result<String, MappingError> {
        let missing = || MappingError::MissingDn {
            class: descriptor.class_name().to_string(),
        };
        let property = descriptor.dn_property().ok_or_else(missing)?;
        match bean.get(property) {
            Some(Value::String(dn)) if !dn.is_empty() => Ok(dn),
            _ => Err(missing()),
        }
    }
}

fn conversion(
    descriptor: &ClassDescriptor,
    property: &PropertyDescriptor,
    source: ConversionError,
) -> MappingError {
    warn!(
        class = descriptor.class_name(),
        property = property.name(),
        attribute = property.attribute(),
        error = %source,
        "attribute conversion failed"
    );
    MappingError::Conversion {
        class: descriptor.class_name().to_string(),
        property: property.name().to_string(),
        source,
    }
}
