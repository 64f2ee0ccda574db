//! Directory entries as seen by the mapper: a DN and named attributes.

use std::collections::BTreeMap;

use attrbind_core::AttributeValues;
use serde::{Deserialize, Serialize};

/// A directory entry.
///
/// Attribute names are matched case-insensitively, as directories do, but
/// stored with the spelling they were first written with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Distinguished name.
    pub dn: String,
    /// Attribute name -> raw values.
    pub attributes: BTreeMap<String, AttributeValues>,
}

impl Entry {
    #[must_use]
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style [`set_attribute`](Self::set_attribute).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, values: AttributeValues) -> Self {
        self.set_attribute(name, values);
        self
    }

    /// Looks up an attribute by case-insensitive name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValues> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values)
    }

    /// Sets an attribute, replacing any existing one with the same name
    /// regardless of case.
    pub fn set_attribute(&mut self, name: impl Into<String>, values: AttributeValues) {
        let name = name.into();
        let existing = self
            .attributes
            .keys()
            .find(|key| key.eq_ignore_ascii_case(&name))
            .cloned();
        let key = existing.unwrap_or(name);
        self.attributes.insert(key, values);
    }

    /// Removes an attribute by case-insensitive name.
    pub fn remove_attribute(&mut self, name: &str) -> Option<AttributeValues> {
        let key = self
            .attributes
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()?;
        self.attributes.remove(&key)
    }
}
