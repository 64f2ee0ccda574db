//! Application types that map onto directory entries.

use attrbind_core::Value;

use crate::error::PropertyError;

/// One mapped property: its name on the bean, the attribute it is stored
/// in, and its declared type signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySchema {
    pub name: String,
    pub attribute: String,
    pub signature: String,
}

/// Declared shape of a bean type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanSchema {
    class_name: String,
    dn_property: Option<String>,
    properties: Vec<PropertySchema>,
}

impl BeanSchema {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            dn_property: None,
            properties: Vec::new(),
        }
    }

    /// Marks `property` as holding the entry's distinguished name.
    #[must_use]
    pub fn dn(mut self, property: impl Into<String>) -> Self {
        self.dn_property = Some(property.into());
        self
    }

    /// Adds a property stored in an attribute of the same name.
    #[must_use]
    pub fn property(self, name: impl Into<String>, signature: impl Into<String>) -> Self {
        let name = name.into();
        self.attribute(name.clone(), name, signature)
    }

    /// Adds a property stored in attribute `attribute`.
    #[must_use]
    pub fn attribute(
        mut self,
        name: impl Into<String>,
        attribute: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        self.properties.push(PropertySchema {
            name: name.into(),
            attribute: attribute.into(),
            signature: signature.into(),
        });
        self
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
    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }
}

/// A type the mapper can move to and from directory entries.
///
/// Property values cross the boundary as [`Value`]s shaped by the codec the
/// property's signature resolves to: a `List<String>` property is read and
/// written as `Value::List` of `Value::String`, a nullable scalar as either
/// the scalar or `Value::Null`.
pub trait Bean: Send + Sync + 'static {
    /// The schema of this type. Called once per registry.
    fn schema() -> BeanSchema
    where
        Self: Sized;

    /// Current value of `property`, or `None` for an unknown property.
    fn get(&self, property: &str) -> Option<Value>;

    /// Stores a decoded value.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] for an unknown property or a value the
    /// field cannot hold.
    fn set(&mut self, property: &str, value: Value) -> Result<(), PropertyError>;
}
