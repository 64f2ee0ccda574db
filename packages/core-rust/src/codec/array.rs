use std::fmt;

use super::scalar::ScalarCodec;
use super::RawForm;
use crate::class::ScalarType;
use crate::error::ConversionError;
use crate::types::Value;

/// Maps a multi-valued attribute onto a fixed-length array, one raw value
/// per element, in order.
#[derive(Debug, Clone)]
pub struct ArrayCodec {
    element: ScalarCodec,
}

impl ArrayCodec {
    #[must_use]
    pub fn new(element: ScalarCodec) -> Self {
        Self { element }
    }

    #[must_use]
    pub fn element(&self) -> &ScalarCodec {
        &self.element
    }

    #[must_use]
    pub fn target_type(&self) -> &ScalarType {
        self.element.target()
    }

    /// # Errors
    ///
    /// Fails if any element fails; no partial array is returned.
    pub fn decode_text(&self, values: &[String]) -> Result<Value, ConversionError> {
        self.decode(values)
    }

    /// # Errors
    ///
    /// Fails if any element fails; no partial array is returned.
    pub fn decode_binary(&self, values: &[Vec<u8>]) -> Result<Value, ConversionError> {
        self.decode(values)
    }

    /// # Errors
    ///
    /// Fails if the value is not an array or any element fails.
    pub fn encode_text(&self, value: &Value) -> Result<Vec<String>, ConversionError> {
        self.encode(value)
    }

    /// # Errors
    ///
    /// Fails if the value is not an array or any element fails.
    pub fn encode_binary(&self, value: &Value) -> Result<Vec<Vec<u8>>, ConversionError> {
        self.encode(value)
    }

    pub(crate) fn decode<R: RawForm>(&self, values: &[R]) -> Result<Value, ConversionError> {
        values
            .iter()
            .enumerate()
            .map(|(i, raw)| R::decode_with(&self.element, raw).map_err(|e| e.at(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    pub(crate) fn encode<R: RawForm>(&self, value: &Value) -> Result<Vec<R>, ConversionError> {
        let items = match value {
            Value::Null => return Ok(Vec::new()),
            Value::Array(items) => items,
            other => {
                return Err(ConversionError::TypeMismatch {
                    target: format!("{}[]", self.element.target()),
                    found: other.kind_name(),
                })
            }
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            out.extend(self.element.encode_element::<R>(item).map_err(|e| e.at(i))?);
        }
        Ok(out)
    }
}

impl fmt::Display for ArrayCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[]", self.element)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::class::Nullability;
    use crate::codec::ScalarCatalog;

    fn array_of(ty: ScalarType) -> ArrayCodec {
        ArrayCodec::new(ScalarCatalog::new().lookup(&ty).unwrap())
    }

    #[test]
    fn decodes_in_input_order() {
        let codec = array_of(ScalarType::Int(Nullability::Primitive));
        let values: Vec<String> = ["3", "1", "2", "1"].iter().map(ToString::to_string).collect();
        assert_eq!(
            codec.decode_text(&values).unwrap(),
            Value::Array(vec![Value::Int(3), Value::Int(1), Value::Int(2), Value::Int(1)])
        );
    }

    #[test]
    fn empty_input_is_zero_length_array() {
        let codec = array_of(ScalarType::String);
        assert_eq!(codec.decode_binary(&[]).unwrap(), Value::Array(Vec::new()));
    }

    #[test]
    fn null_array_encodes_to_nothing() {
        let codec = array_of(ScalarType::String);
        assert!(codec.encode_text(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn one_bad_element_fails_the_whole_array() {
        let codec = array_of(ScalarType::Long(Nullability::Primitive));
        let values: Vec<String> = ["1", "two", "3"].iter().map(ToString::to_string).collect();
        let err = codec.decode_text(&values).unwrap_err();
        assert!(matches!(err, ConversionError::Element { index: 1, .. }));
        assert!(matches!(err.root(), ConversionError::Malformed { .. }));
    }

    #[test]
    fn rejects_non_array_values() {
        let codec = array_of(ScalarType::String);
        assert_eq!(
            codec.encode_text(&Value::List(vec![])),
            Err(ConversionError::TypeMismatch {
                target: "String[]".to_string(),
                found: "list"
            })
        );
    }

    #[test]
    fn null_element_of_primitive_array_is_rejected() {
        let codec = array_of(ScalarType::Int(Nullability::Primitive));
        let value = Value::Array(vec![Value::Int(1), Value::Null, Value::Int(2)]);
        let err = codec.encode_text(&value).unwrap_err();
        assert!(matches!(err, ConversionError::Element { index: 1, .. }));
        assert_eq!(
            err.root(),
            &ConversionError::TypeMismatch {
                target: "i32".to_string(),
                found: "null"
            }
        );
    }

    #[test]
    fn null_element_of_nullable_array_is_skipped() {
        let codec = array_of(ScalarType::Int(Nullability::Nullable));
        let value = Value::Array(vec![Value::Int(1), Value::Null, Value::Int(2)]);
        assert_eq!(codec.encode_text(&value).unwrap(), ["1", "2"]);

        let strings = array_of(ScalarType::String);
        let value = Value::Array(vec![Value::Null, Value::from("a")]);
        assert_eq!(strings.encode_text(&value).unwrap(), ["a"]);
    }

    #[test]
    fn array_of_byte_arrays() {
        let codec = array_of(ScalarType::Bytes);
        let raw = vec![vec![1u8], vec![2, 3]];
        let decoded = codec.decode_binary(&raw).unwrap();
        assert_eq!(
            decoded,
            Value::Array(vec![Value::Bytes(vec![1]), Value::Bytes(vec![2, 3])])
        );
        assert_eq!(codec.encode_binary(&decoded).unwrap(), raw);
    }

    proptest! {
        #[test]
        fn order_preserved_across_roundtrip(raw in proptest::collection::vec(any::<i32>(), 0..32)) {
            let codec = array_of(ScalarType::Int(Nullability::Nullable));
            let values: Vec<String> = raw.iter().map(ToString::to_string).collect();
            let decoded = codec.decode_text(&values).unwrap();
            prop_assert_eq!(codec.encode_text(&decoded).unwrap(), values);
        }
    }
}
