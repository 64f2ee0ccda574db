//! Error taxonomy for codec construction and value conversion.
//!
//! The two types never overlap: [`ConstructionError`] is only produced while
//! parsing a type signature or resolving a codec, [`ConversionError`] only
//! while a resolved codec decodes or encodes values.

use thiserror::Error;

/// Failure to build a codec for a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("invalid type arguments for {raw}: expected exactly one, found {count}")]
    InvalidTypeArguments { raw: String, count: usize },

    #[error("unsupported collection type: {0}")]
    UnsupportedCollection(String),

    #[error("unresolvable generic element type: {0}")]
    UnresolvableElement(String),

    #[error("nested container element is not supported: {0}")]
    NestingTooDeep(String),

    #[error("invalid type signature {input:?} at offset {offset}: {reason}")]
    Signature {
        input: String,
        offset: usize,
        reason: &'static str,
    },

    #[error("a scalar codec is already registered for {0}")]
    DuplicateScalar(String),
}

/// Failure to convert a specific value with an already resolved codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("malformed {target} value {input:?}: {reason}")]
    Malformed {
        target: String,
        input: String,
        reason: String,
    },

    #[error("expected at most one value for {target}, found {count}")]
    MultipleValues { target: String, count: usize },

    #[error("cannot encode a {found} value as {target}")]
    TypeMismatch { target: String, found: &'static str },

    #[error("value for {target} is not valid UTF-8")]
    InvalidUtf8 { target: String },

    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    /// Tags this error with the position of the failing element.
    #[must_use]
    pub fn at(self, index: usize) -> Self {
        Self::Element {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping element position wrappers.
    #[must_use]
    pub fn root(&self) -> &ConversionError {
        match self {
            Self::Element { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_wrapping_keeps_root_cause() {
        let err = ConversionError::InvalidUtf8 {
            target: "String".to_string(),
        }
        .at(3)
        .at(0);
        assert_eq!(
            err.root(),
            &ConversionError::InvalidUtf8 {
                target: "String".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "element 0: element 3: value for String is not valid UTF-8"
        );
    }

    #[test]
    fn construction_error_messages() {
        let err = ConstructionError::InvalidTypeArguments {
            raw: "List".to_string(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "invalid type arguments for List: expected exactly one, found 2"
        );
    }
}
