use std::fmt;

use super::array::ArrayCodec;
use super::scalar::ScalarCodec;
use super::RawForm;
use crate::class::{CollectionVariant, ContainerClass, ScalarType};
use crate::error::{ConstructionError, ConversionError};
use crate::types::Value;

/// Codec for the elements of a collection.
#[derive(Debug, Clone)]
pub enum ElementCodec {
    /// One raw value per element.
    Scalar(ScalarCodec),
    /// All raw values form a single array element.
    Array(ArrayCodec),
}

impl ElementCodec {
    #[must_use]
    pub fn target_type(&self) -> &ScalarType {
        match self {
            Self::Scalar(codec) => codec.target(),
            Self::Array(codec) => codec.target_type(),
        }
    }
}

impl fmt::Display for ElementCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(codec) => write!(f, "{codec}"),
            Self::Array(codec) => write!(f, "{codec}"),
        }
    }
}

/// Maps a multi-valued attribute onto a list or set.
///
/// List-like containers decode to [`Value::List`] in source order. Set-like
/// containers decode to [`Value::Set`]; duplicates collapse and iteration
/// follows value order, not source order.
#[derive(Debug, Clone)]
pub struct CollectionCodec {
    container: ContainerClass,
    variant: CollectionVariant,
    element: ElementCodec,
}

impl CollectionCodec {
    /// # Errors
    ///
    /// Returns [`ConstructionError::UnsupportedCollection`] unless the
    /// container is list- or set-like.
    pub fn new(container: ContainerClass, element: ElementCodec) -> Result<Self, ConstructionError> {
        let variant = container.variant();
        if variant == CollectionVariant::Unspecified {
            return Err(ConstructionError::UnsupportedCollection(format!(
                "{}<{element}>",
                container.name()
            )));
        }
        Ok(Self {
            container,
            variant,
            element,
        })
    }

    #[must_use]
    pub fn container(&self) -> ContainerClass {
        self.container
    }

    #[must_use]
    pub fn variant(&self) -> CollectionVariant {
        self.variant
    }

    #[must_use]
    pub fn element(&self) -> &ElementCodec {
        &self.element
    }

    #[must_use]
    pub fn target_type(&self) -> &ScalarType {
        self.element.target_type()
    }

    /// # Errors
    ///
    /// Fails if any element fails.
    pub fn decode_text(&self, values: &[String]) -> Result<Value, ConversionError> {
        self.decode(values)
    }

    /// # Errors
    ///
    /// Fails if any element fails.
    pub fn decode_binary(&self, values: &[Vec<u8>]) -> Result<Value, ConversionError> {
        self.decode(values)
    }

    /// # Errors
    ///
    /// Fails if the value is not a list or set, or any element fails.
    pub fn encode_text(&self, value: &Value) -> Result<Vec<String>, ConversionError> {
        self.encode(value)
    }

    /// # Errors
    ///
    /// Fails if the value is not a list or set, or any element fails.
    pub fn encode_binary(&self, value: &Value) -> Result<Vec<Vec<u8>>, ConversionError> {
        self.encode(value)
    }

    pub(crate) fn decode<R: RawForm>(&self, values: &[R]) -> Result<Value, ConversionError> {
        let items = match &self.element {
            ElementCodec::Scalar(codec) => values
                .iter()
                .enumerate()
                .map(|(i, raw)| R::decode_with(codec, raw).map_err(|e| e.at(i)))
                .collect::<Result<Vec<_>, _>>()?,
            ElementCodec::Array(_) if values.is_empty() => Vec::new(),
            ElementCodec::Array(codec) => vec![codec.decode(values)?],
        };
        Ok(match self.variant {
            CollectionVariant::Set => Value::Set(items.into_iter().collect()),
            CollectionVariant::List | CollectionVariant::Unspecified => Value::List(items),
        })
    }

    pub(crate) fn encode<R: RawForm>(&self, value: &Value) -> Result<Vec<R>, ConversionError> {
        let items: Vec<&Value> = match value {
            Value::Null => return Ok(Vec::new()),
            Value::List(items) => items.iter().collect(),
            Value::Set(items) => items.iter().collect(),
            other => {
                return Err(ConversionError::TypeMismatch {
                    target: self.to_string(),
                    found: other.kind_name(),
                })
            }
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            let encoded = match &self.element {
                ElementCodec::Scalar(codec) => codec.encode_element::<R>(item),
                ElementCodec::Array(codec) => codec.encode::<R>(item),
            };
            out.extend(encoded.map_err(|e| e.at(i))?);
        }
        Ok(out)
    }
}

impl fmt::Display for CollectionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.container.name(), self.element)
    }
}
