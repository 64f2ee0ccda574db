//! Errors raised while describing, mapping, and storing beans.

use attrbind_core::{ConstructionError, ConversionError};

use crate::directory::DirectoryError;

/// A bean rejected a property value handed to it by the mapper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    #[error("unknown property")]
    Unknown,
    #[error("expected {expected}, found {found}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },
}

/// Failure to describe a bean type or to move a bean to or from an entry.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// A property's declared type has no codec. Raised at registration.
    #[error("cannot build codec for {class}.{property}: {source}")]
    Construction {
        class: String,
        property: String,
        #[source]
        source: ConstructionError,
    },

    /// Two properties of one class map to the same attribute.
    #[error("{class}: attribute {attribute} is mapped more than once")]
    DuplicateAttribute { class: String, attribute: String },

    /// A raw attribute or property value could not be converted.
    #[error("cannot convert {class}.{property}: {source}")]
    Conversion {
        class: String,
        property: String,
        #[source]
        source: ConversionError,
    },

    #[error("{class}.{property}: {source}")]
    Property {
        class: String,
        property: String,
        #[source]
        source: PropertyError,
    },

    /// The bean declares no DN property, or its DN property is not a string.
    #[error("{class} has no distinguished name")]
    MissingDn { class: String },
}

/// Errors surfaced by [`EntryManager`](crate::EntryManager).
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("no entry found for {dn}")]
    NotFound { dn: String },

    #[error("expected one entry for {dn}, found {count}")]
    MultipleEntries { dn: String, count: usize },
}
