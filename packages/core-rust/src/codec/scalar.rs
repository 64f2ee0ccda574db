//! Scalar codecs and the catalog that serves them.
//!
//! Numeric and boolean scalars use their textual form in both text and
//! binary attributes (the binary form is the UTF-8 encoding of the text).
//! Booleans are written as `TRUE`/`FALSE` and read case-insensitively.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ordered_float::OrderedFloat;
use tracing::debug;

use super::RawForm;
use crate::class::{Nullability, RawClass, ScalarType};
use crate::error::{ConstructionError, ConversionError};
use crate::types::Value;

/// Single-value transcoder for an application-defined scalar.
///
/// Registered in a [`ScalarCatalog`] under [`class_name`](Self::class_name);
/// signatures naming that class then resolve to it. Binary forms default to
/// the UTF-8 encoding of the text form.
pub trait ValueTranscoder: Send + Sync + fmt::Debug {
    /// Class name this transcoder serves.
    fn class_name(&self) -> &str;

    /// Decodes one text value.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] when the text cannot be parsed.
    fn decode_text(&self, value: &str) -> Result<Value, ConversionError>;

    /// Encodes one value as text.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] when the value has the wrong shape.
    fn encode_text(&self, value: &Value) -> Result<String, ConversionError>;

    /// Decodes one binary value.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] on invalid UTF-8 or unparsable text.
    fn decode_binary(&self, value: &[u8]) -> Result<Value, ConversionError> {
        let text = std::str::from_utf8(value).map_err(|_| ConversionError::InvalidUtf8 {
            target: self.class_name().to_string(),
        })?;
        self.decode_text(text)
    }

    /// Encodes one value as binary.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] when the value has the wrong shape.
    fn encode_binary(&self, value: &Value) -> Result<Vec<u8>, ConversionError> {
        self.encode_text(value).map(String::into_bytes)
    }
}

#[derive(Debug, Clone)]
enum Conversion {
    Builtin,
    Custom(Arc<dyn ValueTranscoder>),
}

/// Converts between one raw attribute value and one scalar [`Value`].
#[derive(Debug, Clone)]
pub struct ScalarCodec {
    target: ScalarType,
    conversion: Conversion,
}

impl ScalarCodec {
    fn builtin(target: ScalarType) -> Self {
        Self {
            target,
            conversion: Conversion::Builtin,
        }
    }

    fn custom(transcoder: Arc<dyn ValueTranscoder>) -> Self {
        Self {
            target: ScalarType::Named(Arc::from(transcoder.class_name())),
            conversion: Conversion::Custom(transcoder),
        }
    }

    /// The scalar type this codec produces and consumes.
    #[must_use]
    pub fn target(&self) -> &ScalarType {
        &self.target
    }

    /// Value substituted for an absent attribute.
    ///
    /// Non-nullable primitives get their zero value; everything else is
    /// [`Value::Null`].
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self.target {
            ScalarType::Bool(Nullability::Primitive) => Value::Bool(false),
            ScalarType::Short(Nullability::Primitive) => Value::Short(0),
            ScalarType::Int(Nullability::Primitive) => Value::Int(0),
            ScalarType::Long(Nullability::Primitive) => Value::Long(0),
            ScalarType::Float(Nullability::Primitive) => Value::Float(OrderedFloat(0.0)),
            ScalarType::Double(Nullability::Primitive) => Value::Double(OrderedFloat(0.0)),
            _ => Value::Null,
        }
    }

    /// Decodes an attribute's text values into one scalar.
    ///
    /// # Errors
    ///
    /// Fails on malformed text or on more than one value.
    pub fn decode_text(&self, values: &[String]) -> Result<Value, ConversionError> {
        self.decode(values)
    }

    /// Decodes an attribute's binary values into one scalar.
    ///
    /// # Errors
    ///
    /// Fails on malformed input or on more than one value.
    pub fn decode_binary(&self, values: &[Vec<u8>]) -> Result<Value, ConversionError> {
        self.decode(values)
    }

    /// Encodes one scalar as zero (absent) or one text value.
    ///
    /// # Errors
    ///
    /// Fails when the value does not match the target type.
    pub fn encode_text(&self, value: &Value) -> Result<Vec<String>, ConversionError> {
        self.encode(value)
    }

    /// Encodes one scalar as zero (absent) or one binary value.
    ///
    /// # Errors
    ///
    /// Fails when the value does not match the target type.
    pub fn encode_binary(&self, value: &Value) -> Result<Vec<Vec<u8>>, ConversionError> {
        self.encode(value)
    }

    pub(crate) fn decode<R: RawForm>(&self, values: &[R]) -> Result<Value, ConversionError> {
        match values {
            [] => Ok(self.default_value()),
            [single] => R::decode_with(self, single),
            _ => Err(ConversionError::MultipleValues {
                target: self.target.to_string(),
                count: values.len(),
            }),
        }
    }

    pub(crate) fn encode<R: RawForm>(&self, value: &Value) -> Result<Vec<R>, ConversionError> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(vec![R::encode_with(self, value)?])
    }

    /// Encodes one element of an array or collection.
    ///
    /// A null element has no raw form. Nullable targets drop it; primitive
    /// targets reject it, since dropping would shift every later element.
    pub(crate) fn encode_element<R: RawForm>(&self, value: &Value) -> Result<Vec<R>, ConversionError> {
        if value.is_null() && self.target.is_primitive() {
            return Err(self.mismatch(value));
        }
        self.encode(value)
    }

    /// Decodes a single text value.
    ///
    /// # Errors
    ///
    /// Fails when the text cannot be parsed as the target type.
    pub fn decode_text_value(&self, raw: &str) -> Result<Value, ConversionError> {
        if let Conversion::Custom(transcoder) = &self.conversion {
            return transcoder.decode_text(raw);
        }
        Ok(match self.target {
            ScalarType::Bool(_) => Value::Bool(self.parse_bool(raw)?),
            ScalarType::Short(_) => Value::Short(self.parse(raw)?),
            ScalarType::Int(_) => Value::Int(self.parse(raw)?),
            ScalarType::Long(_) => Value::Long(self.parse(raw)?),
            ScalarType::Float(_) => Value::Float(OrderedFloat(self.parse(raw)?)),
            ScalarType::Double(_) => Value::Double(OrderedFloat(self.parse(raw)?)),
            ScalarType::Bytes => Value::Bytes(raw.as_bytes().to_vec()),
            ScalarType::Chars => Value::Chars(raw.chars().collect()),
            // Named scalars always carry a custom transcoder.
            ScalarType::String | ScalarType::Object | ScalarType::Named(_) => {
                Value::String(raw.to_string())
            }
        })
    }

    /// Decodes a single binary value.
    ///
    /// # Errors
    ///
    /// Fails on invalid UTF-8 for textual targets or on unparsable text.
    pub fn decode_binary_value(&self, raw: &[u8]) -> Result<Value, ConversionError> {
        match (&self.conversion, &self.target) {
            (Conversion::Custom(transcoder), _) => transcoder.decode_binary(raw),
            (Conversion::Builtin, ScalarType::Bytes | ScalarType::Object) => {
                Ok(Value::Bytes(raw.to_vec()))
            }
            (Conversion::Builtin, _) => {
                let text = std::str::from_utf8(raw).map_err(|_| self.invalid_utf8())?;
                self.decode_text_value(text)
            }
        }
    }

    /// Encodes a single non-null value as text.
    ///
    /// # Errors
    ///
    /// Fails when the value does not match the target type.
    pub fn encode_text_value(&self, value: &Value) -> Result<String, ConversionError> {
        if let Conversion::Custom(transcoder) = &self.conversion {
            return transcoder.encode_text(value);
        }
        if !self.accepts(value) {
            return Err(self.mismatch(value));
        }
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Bool(true) => Ok("TRUE".to_string()),
            Value::Bool(false) => Ok("FALSE".to_string()),
            Value::Short(n) => Ok(n.to_string()),
            Value::Int(n) => Ok(n.to_string()),
            Value::Long(n) => Ok(n.to_string()),
            Value::Float(n) => Ok(n.to_string()),
            Value::Double(n) => Ok(n.to_string()),
            Value::Bytes(bytes) => String::from_utf8(bytes.clone()).map_err(|_| self.invalid_utf8()),
            Value::Chars(chars) => Ok(chars.iter().collect()),
            _ => Err(self.mismatch(value)),
        }
    }

    /// Encodes a single non-null value as binary.
    ///
    /// # Errors
    ///
    /// Fails when the value does not match the target type.
    pub fn encode_binary_value(&self, value: &Value) -> Result<Vec<u8>, ConversionError> {
        match (&self.conversion, value) {
            (Conversion::Custom(transcoder), _) => transcoder.encode_binary(value),
            (Conversion::Builtin, Value::Bytes(bytes)) if self.accepts(value) => Ok(bytes.clone()),
            (Conversion::Builtin, _) => self.encode_text_value(value).map(String::into_bytes),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match (&self.target, value) {
            (ScalarType::String, Value::String(_))
            | (ScalarType::Bool(_), Value::Bool(_))
            | (ScalarType::Short(_), Value::Short(_))
            | (ScalarType::Int(_), Value::Int(_))
            | (ScalarType::Long(_), Value::Long(_))
            | (ScalarType::Float(_), Value::Float(_))
            | (ScalarType::Double(_), Value::Double(_))
            | (ScalarType::Bytes, Value::Bytes(_))
            | (ScalarType::Chars, Value::Chars(_)) => true,
            (ScalarType::Object, v) => !matches!(
                v,
                Value::Null | Value::Array(_) | Value::List(_) | Value::Set(_)
            ),
            _ => false,
        }
    }

    fn parse<T>(&self, raw: &str) -> Result<T, ConversionError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        raw.parse::<T>().map_err(|e| self.malformed(raw, e.to_string()))
    }

    fn parse_bool(&self, raw: &str) -> Result<bool, ConversionError> {
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(self.malformed(raw, "expected TRUE or FALSE".to_string()))
        }
    }

    fn malformed(&self, raw: &str, reason: String) -> ConversionError {
        ConversionError::Malformed {
            target: self.target.to_string(),
            input: raw.to_string(),
            reason,
        }
    }

    fn mismatch(&self, value: &Value) -> ConversionError {
        ConversionError::TypeMismatch {
            target: self.target.to_string(),
            found: value.kind_name(),
        }
    }

    fn invalid_utf8(&self) -> ConversionError {
        ConversionError::InvalidUtf8 {
            target: self.target.to_string(),
        }
    }
}

impl fmt::Display for ScalarCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)
    }
}

/// Scalar codecs keyed by their exact target type.
///
/// Lookup is an exact match, so registration order never affects which
/// codec a type resolves to.
#[derive(Debug, Clone)]
pub struct ScalarCatalog {
    codecs: HashMap<ScalarType, ScalarCodec>,
}

impl ScalarCatalog {
    /// Creates a catalog holding every built-in scalar codec.
    #[must_use]
    pub fn new() -> Self {
        let codecs = ScalarType::builtins()
            .into_iter()
            .map(|ty| (ty.clone(), ScalarCodec::builtin(ty)))
            .collect();
        Self { codecs }
    }

    /// Registers a codec for an application-defined scalar.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::DuplicateScalar`] when the class name is
    /// built in or already registered.
    pub fn register(&mut self, transcoder: Arc<dyn ValueTranscoder>) -> Result<(), ConstructionError> {
        let name = transcoder.class_name();
        let is_named = matches!(
            RawClass::from_name(name, false),
            Ok(RawClass::Scalar(ScalarType::Named(_)))
        );
        let codec = ScalarCodec::custom(transcoder.clone());
        if !is_named || self.codecs.contains_key(codec.target()) {
            return Err(ConstructionError::DuplicateScalar(name.to_string()));
        }
        debug!(class = name, "registered custom scalar codec");
        self.codecs.insert(codec.target().clone(), codec);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, ty: &ScalarType) -> Option<&ScalarCodec> {
        self.codecs.get(ty)
    }

    /// Looks up the codec for `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::UnsupportedType`] when nothing is registered.
    pub fn lookup(&self, ty: &ScalarType) -> Result<ScalarCodec, ConstructionError> {
        self.get(ty)
            .cloned()
            .ok_or_else(|| ConstructionError::UnsupportedType(ty.to_string()))
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

impl Default for ScalarCatalog {
    fn default() -> Self {
        Self::new()
    }
}
