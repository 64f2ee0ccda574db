//! Attribute value codecs.
//!
//! A [`Codec`] is a closed tree: a scalar leaf, an array of scalars, or a
//! collection of scalars or arrays. Trees are built by the
//! [`CodecResolver`](crate::CodecResolver), never mutated afterwards, and
//! are safe to share across threads.

pub mod array;
pub mod collection;
pub mod scalar;

use std::fmt;

pub use array::ArrayCodec;
pub use collection::{CollectionCodec, ElementCodec};
pub use scalar::{ScalarCatalog, ScalarCodec, ValueTranscoder};

use crate::class::ScalarType;
use crate::error::ConversionError;
use crate::types::{AttributeValues, Value};

/// Raw value representation a codec reads and writes: text or binary.
pub(crate) trait RawForm: Sized {
    fn decode_with(codec: &ScalarCodec, raw: &Self) -> Result<Value, ConversionError>;
    fn encode_with(codec: &ScalarCodec, value: &Value) -> Result<Self, ConversionError>;
}

impl RawForm for String {
    fn decode_with(codec: &ScalarCodec, raw: &Self) -> Result<Value, ConversionError> {
        codec.decode_text_value(raw)
    }

    fn encode_with(codec: &ScalarCodec, value: &Value) -> Result<Self, ConversionError> {
        codec.encode_text_value(value)
    }
}

impl RawForm for Vec<u8> {
    fn decode_with(codec: &ScalarCodec, raw: &Self) -> Result<Value, ConversionError> {
        codec.decode_binary_value(raw)
    }

    fn encode_with(codec: &ScalarCodec, value: &Value) -> Result<Self, ConversionError> {
        codec.encode_binary_value(value)
    }
}

/// A resolved, immutable attribute codec.
#[derive(Debug, Clone)]
pub enum Codec {
    Scalar(ScalarCodec),
    Array(ArrayCodec),
    Collection(CollectionCodec),
}

impl Codec {
    /// The scalar type at the leaves of this codec tree.
    ///
    /// Callers use it to pick the attribute syntax, e.g. binary for `u8[]`.
    #[must_use]
    pub fn target_type(&self) -> &ScalarType {
        match self {
            Self::Scalar(codec) => codec.target(),
            Self::Array(codec) => codec.target_type(),
            Self::Collection(codec) => codec.target_type(),
        }
    }

    /// Whether values of this codec are naturally written as binary.
    #[must_use]
    pub fn prefers_binary(&self) -> bool {
        *self.target_type() == ScalarType::Bytes
    }

    /// # Errors
    ///
    /// Returns a [`ConversionError`] if any raw value cannot be decoded.
    pub fn decode_text(&self, values: &[String]) -> Result<Value, ConversionError> {
        self.decode_form(values)
    }

    /// # Errors
    ///
    /// Returns a [`ConversionError`] if any raw value cannot be decoded.
    pub fn decode_binary(&self, values: &[Vec<u8>]) -> Result<Value, ConversionError> {
        self.decode_form(values)
    }

    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the value does not fit this codec.
    pub fn encode_text(&self, value: &Value) -> Result<Vec<String>, ConversionError> {
        self.encode_form(value)
    }

    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the value does not fit this codec.
    pub fn encode_binary(&self, value: &Value) -> Result<Vec<Vec<u8>>, ConversionError> {
        self.encode_form(value)
    }

    /// Decodes whichever form the attribute carries.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if any raw value cannot be decoded.
    pub fn decode(&self, values: &AttributeValues) -> Result<Value, ConversionError> {
        match values {
            AttributeValues::Text(values) => self.decode_text(values),
            AttributeValues::Binary(values) => self.decode_binary(values),
        }
    }

    /// Encodes into the requested form.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the value does not fit this codec.
    pub fn encode(&self, value: &Value, binary: bool) -> Result<AttributeValues, ConversionError> {
        if binary {
            self.encode_binary(value).map(AttributeValues::Binary)
        } else {
            self.encode_text(value).map(AttributeValues::Text)
        }
    }

    fn decode_form<R: RawForm>(&self, values: &[R]) -> Result<Value, ConversionError> {
        match self {
            Self::Scalar(codec) => codec.decode(values),
            Self::Array(codec) => codec.decode(values),
            Self::Collection(codec) => codec.decode(values),
        }
    }

    fn encode_form<R: RawForm>(&self, value: &Value) -> Result<Vec<R>, ConversionError> {
        match self {
            Self::Scalar(codec) => codec.encode(value),
            Self::Array(codec) => codec.encode(value),
            Self::Collection(codec) => codec.encode(value),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(codec) => write!(f, "{codec}"),
            Self::Array(codec) => write!(f, "{codec}"),
            Self::Collection(codec) => write!(f, "{codec}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn codec_is_shareable() {
        assert_send_sync::<Codec>();
        assert_send_sync::<Arc<Codec>>();
    }

    #[test]
    fn decode_dispatches_on_form() {
        let codec = Codec::Scalar(ScalarCatalog::new().lookup(&ScalarType::Object).unwrap());
        assert_eq!(
            codec.decode(&AttributeValues::text(["x"])).unwrap(),
            Value::from("x")
        );
        assert_eq!(
            codec.decode(&AttributeValues::binary([vec![1u8]])).unwrap(),
            Value::Bytes(vec![1])
        );
    }

    #[test]
    fn encode_selects_form() {
        let codec = Codec::Scalar(ScalarCatalog::new().lookup(&ScalarType::String).unwrap());
        assert_eq!(
            codec.encode(&Value::from("v"), true).unwrap(),
            AttributeValues::binary([b"v".to_vec()])
        );
        assert_eq!(
            codec.encode(&Value::from("v"), false).unwrap(),
            AttributeValues::text(["v"])
        );
        assert!(codec.encode(&Value::Null, false).unwrap().is_empty());
    }

    #[test]
    fn bytes_codec_prefers_binary() {
        let catalog = ScalarCatalog::new();
        assert!(Codec::Scalar(catalog.lookup(&ScalarType::Bytes).unwrap()).prefers_binary());
        assert!(!Codec::Scalar(catalog.lookup(&ScalarType::Chars).unwrap()).prefers_binary());
    }
}
