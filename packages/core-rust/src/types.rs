use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Raw attribute values as stored in a directory entry.
///
/// An attribute carries either text values or binary values, never both.
/// Order is preserved and duplicates are allowed. An empty sequence means
/// the attribute is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValues {
    /// UTF-8 string values.
    Text(Vec<String>),
    /// Raw octet string values.
    Binary(Vec<Vec<u8>>),
}

impl AttributeValues {
    /// An absent attribute in text form.
    #[must_use]
    pub fn empty() -> Self {
        Self::Text(Vec::new())
    }

    /// Builds text values from anything string-like.
    pub fn text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Text(values.into_iter().map(Into::into).collect())
    }

    /// Builds binary values from anything byte-like.
    pub fn binary<I, B>(values: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        Self::Binary(values.into_iter().map(Into::into).collect())
    }

    /// Number of raw values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(values) => values.len(),
            Self::Binary(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }
}

/// Generic runtime value produced and consumed by attribute codecs.
///
/// Scalars mirror the codec catalog one-to-one. Floating-point values are
/// wrapped in [`OrderedFloat`] so every value is `Eq + Ord + Hash` and can
/// live inside a [`Value::Set`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Value {
    /// Absent value.
    Null,
    Bool(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    /// UTF-8 text.
    String(String),
    /// Raw octets, kept as a single scalar.
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
    /// Raw characters, kept as a single scalar.
    Chars(Vec<char>),
    /// Fixed-length homogeneous array.
    Array(Vec<Value>),
    /// List-like collection: source order is preserved.
    List(Vec<Value>),
    /// Set-like collection. `BTreeSet` gives a deterministic iteration order
    /// so encoding the same set always yields the same raw values.
    Set(BTreeSet<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Short(_) => "i16",
            Self::Int(_) => "i32",
            Self::Long(_) => "i64",
            Self::Float(_) => "f32",
            Self::Double(_) => "f64",
            Self::String(_) => "String",
            Self::Bytes(_) => "u8[]",
            Self::Chars(_) => "char[]",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Set(_) => "set",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string payload, if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Short(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(OrderedFloat(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(OrderedFloat(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
