use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use attrbind_core::{Codec, ConstructionError, TypeDescriptor};

use crate::bean::BeanSchema;
use crate::config::MapperConfig;
use crate::error::MappingError;

/// A bean property with its resolved codec.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    attribute: String,
    descriptor: TypeDescriptor,
    codec: Arc<Codec>,
    binary: bool,
}

impl PropertyDescriptor {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn codec(&self) -> &Arc<Codec> {
        &self.codec
    }

    /// Whether values are written in binary form.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.binary
    }
}

/// Everything the mapper needs to know about one bean type.
///
/// Built once per type and immutable afterwards.
#[derive(Debug)]
pub struct ClassDescriptor {
    class_name: String,
    dn_property: Option<String>,
    properties: Vec<PropertyDescriptor>,
}

impl ClassDescriptor {
    /// Resolves a codec for every property in `schema`.
    ///
    /// `codec_for` supplies codecs, so callers can share them between
    /// classes. The first failing property aborts the build.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Construction`] naming the failing property, or
    /// [`MappingError::DuplicateAttribute`].
    pub fn build<F>(
        schema: &BeanSchema,
        config: &MapperConfig,
        mut codec_for: F,
    ) -> Result<Self, MappingError>
    where
        F: FnMut(&TypeDescriptor) -> Result<Arc<Codec>, ConstructionError>,
    {
        let class = schema.class_name();
        let mut seen = HashSet::new();
        let mut properties = Vec::with_capacity(schema.properties().len());

        for property in schema.properties() {
            if !seen.insert(property.attribute.to_ascii_lowercase()) {
                return Err(MappingError::DuplicateAttribute {
                    class: class.to_string(),
                    attribute: property.attribute.clone(),
                });
            }
            let construction = |source| MappingError::Construction {
                class: class.to_string(),
                property: property.name.clone(),
                source,
            };
            let descriptor = TypeDescriptor::parse(&property.signature).map_err(construction)?;
            let codec = codec_for(&descriptor).map_err(construction)?;
            let binary = codec.prefers_binary() || config.is_binary(&property.attribute);
            properties.push(PropertyDescriptor {
                name: property.name.clone(),
                attribute: property.attribute.clone(),
                descriptor,
                codec,
                binary,
            });
        }

        Ok(Self {
            class_name: class.to_string(),
            dn_property: schema.dn_property().map(ToString::to_string),
            properties,
        })
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn dn_property(&self) -> Option<&str> {
        self.dn_property.as_deref()
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.class_name)?;
        for (i, property) in self.properties.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{}: {}", property.name, property.codec)?;
        }
        write!(f, " }}")
    }
}
