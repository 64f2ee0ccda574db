//! Raw (erased) classes that appear in type signatures.
//!
//! A raw class is what remains of a declared type once its type arguments
//! are stripped: a scalar, a primitive array component, an array of some
//! other raw class, or a container.

use std::fmt;
use std::sync::Arc;

/// Whether a primitive scalar admits an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullability {
    /// Never absent; an empty attribute decodes to the type's default.
    Primitive,
    /// May be absent; an empty attribute decodes to [`Value::Null`](crate::Value::Null).
    Nullable,
}

/// Target type of a scalar codec. Doubles as the scalar catalog key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Bool(Nullability),
    Short(Nullability),
    Int(Nullability),
    Long(Nullability),
    Float(Nullability),
    Double(Nullability),
    /// Raw octets (`u8[]`).
    Bytes,
    /// Raw characters (`char[]`).
    Chars,
    /// Opaque fallback: text decodes to a string, binary to bytes.
    Object,
    /// Application-defined scalar served by a registered transcoder.
    Named(Arc<str>),
}

impl ScalarType {
    /// Every scalar type with a built-in codec.
    #[must_use]
    pub fn builtins() -> Vec<ScalarType> {
        use Nullability::{Nullable, Primitive};
        let mut types = vec![Self::String];
        for n in [Primitive, Nullable] {
            types.extend([
                Self::Bool(n),
                Self::Short(n),
                Self::Int(n),
                Self::Long(n),
                Self::Float(n),
                Self::Double(n),
            ]);
        }
        types.extend([Self::Bytes, Self::Chars, Self::Object]);
        types
    }

    /// Returns `true` for the non-nullable primitive variants.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Bool(Nullability::Primitive)
                | Self::Short(Nullability::Primitive)
                | Self::Int(Nullability::Primitive)
                | Self::Long(Nullability::Primitive)
                | Self::Float(Nullability::Primitive)
                | Self::Double(Nullability::Primitive)
        )
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, nullability) = match self {
            Self::String => return f.write_str("String"),
            Self::Bytes => return f.write_str("u8[]"),
            Self::Chars => return f.write_str("char[]"),
            Self::Object => return f.write_str("Object"),
            Self::Named(name) => return f.write_str(name),
            Self::Bool(n) => ("bool", n),
            Self::Short(n) => ("i16", n),
            Self::Int(n) => ("i32", n),
            Self::Long(n) => ("i64", n),
            Self::Float(n) => ("f32", n),
            Self::Double(n) => ("f64", n),
        };
        f.write_str(name)?;
        if *nullability == Nullability::Nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// Whether a collection preserves source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionVariant {
    /// Ordered, duplicates kept.
    List,
    /// Unordered membership, duplicates collapsed.
    Set,
    /// Not a collection, or a container that is neither list- nor set-like.
    Unspecified,
}

/// Well-known container classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerClass {
    Collection,
    List,
    Vec,
    LinkedList,
    Set,
    HashSet,
    BTreeSet,
    SortedSet,
    VecDeque,
    Queue,
    Deque,
    Map,
    HashMap,
    BTreeMap,
}

impl ContainerClass {
    const ALL: [ContainerClass; 14] = [
        Self::Collection,
        Self::List,
        Self::Vec,
        Self::LinkedList,
        Self::Set,
        Self::HashSet,
        Self::BTreeSet,
        Self::SortedSet,
        Self::VecDeque,
        Self::Queue,
        Self::Deque,
        Self::Map,
        Self::HashMap,
        Self::BTreeMap,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Collection => "Collection",
            Self::List => "List",
            Self::Vec => "Vec",
            Self::LinkedList => "LinkedList",
            Self::Set => "Set",
            Self::HashSet => "HashSet",
            Self::BTreeSet => "BTreeSet",
            Self::SortedSet => "SortedSet",
            Self::VecDeque => "VecDeque",
            Self::Queue => "Queue",
            Self::Deque => "Deque",
            Self::Map => "Map",
            Self::HashMap => "HashMap",
            Self::BTreeMap => "BTreeMap",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// List- or set-likeness of this container.
    ///
    /// A plain `Collection` is treated as a list since nothing in the
    /// attribute says otherwise.
    #[must_use]
    pub fn variant(self) -> CollectionVariant {
        match self {
            Self::Collection | Self::List | Self::Vec | Self::LinkedList => CollectionVariant::List,
            Self::Set | Self::HashSet | Self::BTreeSet | Self::SortedSet => CollectionVariant::Set,
            _ => CollectionVariant::Unspecified,
        }
    }
}

/// A type with its type arguments erased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawClass {
    Scalar(ScalarType),
    /// `u8`, only meaningful as an array component.
    Byte,
    /// `char`, only meaningful as an array component.
    Char,
    Array(Box<RawClass>),
    Container(ContainerClass),
}

impl RawClass {
    /// Maps a signature identifier to its raw class.
    ///
    /// Unknown identifiers become [`ScalarType::Named`]; whether they resolve
    /// depends on what is registered in the scalar catalog.
    ///
    /// # Errors
    ///
    /// Returns a reason string when `nullable` is set on a type that has no
    /// primitive form.
    pub fn from_name(name: &str, nullable: bool) -> Result<Self, &'static str> {
        let n = if nullable {
            Nullability::Nullable
        } else {
            Nullability::Primitive
        };
        let class = match name {
            "bool" => return Ok(Self::Scalar(ScalarType::Bool(n))),
            "i16" => return Ok(Self::Scalar(ScalarType::Short(n))),
            "i32" => return Ok(Self::Scalar(ScalarType::Int(n))),
            "i64" => return Ok(Self::Scalar(ScalarType::Long(n))),
            "f32" => return Ok(Self::Scalar(ScalarType::Float(n))),
            "f64" => return Ok(Self::Scalar(ScalarType::Double(n))),
            "String" => Self::Scalar(ScalarType::String),
            "Object" => Self::Scalar(ScalarType::Object),
            "u8" => Self::Byte,
            "char" => Self::Char,
            other => ContainerClass::from_name(other).map_or_else(
                || Self::Scalar(ScalarType::Named(Arc::from(other))),
                Self::Container,
            ),
        };
        if nullable {
            return Err("nullable marker applies only to primitive types");
        }
        Ok(class)
    }

    /// The scalar this raw class maps to when it names a whole value.
    ///
    /// `u8[]` and `char[]` are scalars, not arrays.
    #[must_use]
    pub fn as_scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(ty) => Some(ty.clone()),
            Self::Array(component) => match **component {
                Self::Byte => Some(ScalarType::Bytes),
                Self::Char => Some(ScalarType::Chars),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for RawClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ty) => write!(f, "{ty}"),
            Self::Byte => f.write_str("u8"),
            Self::Char => f.write_str("char"),
            Self::Array(component) => write!(f, "{component}[]"),
            Self::Container(c) => f.write_str(c.name()),
        }
    }
}
