//! Normalized type descriptors that drive codec resolution.
//!
//! A [`TypeDescriptor`] is built once per declared property and never from a
//! runtime value, so element types survive erasure: `List<i32>` and
//! `List<String>` produce different descriptors even though both decode into
//! a [`Value::List`](crate::Value::List).

use std::fmt;

use crate::class::{CollectionVariant, ContainerClass, RawClass, ScalarType};
use crate::error::ConstructionError;
use crate::signature::TypeSignature;

/// Shape of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Array,
    Collection,
}

/// Immutable, erasure-resistant description of a declared type.
///
/// Arrays carry their component as the single type argument. Collections
/// carry whatever arguments the source signature supplied; the resolver
/// rejects anything but exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    kind: TypeKind,
    raw_class: RawClass,
    arguments: Vec<TypeDescriptor>,
    variant: CollectionVariant,
}

impl TypeDescriptor {
    /// Descriptor for a scalar type.
    #[must_use]
    pub fn scalar(ty: ScalarType) -> Self {
        Self::leaf(RawClass::Scalar(ty))
    }

    /// Descriptor for an array of `component`.
    #[must_use]
    pub fn array(component: TypeDescriptor) -> Self {
        Self {
            kind: TypeKind::Array,
            raw_class: RawClass::Array(Box::new(component.raw_class.clone())),
            arguments: vec![component],
            variant: CollectionVariant::Unspecified,
        }
    }

    /// Descriptor for a container applied to `arguments`.
    #[must_use]
    pub fn collection(container: ContainerClass, arguments: Vec<TypeDescriptor>) -> Self {
        Self {
            kind: TypeKind::Collection,
            raw_class: RawClass::Container(container),
            arguments,
            variant: container.variant(),
        }
    }

    /// Descriptor for a non-generic class.
    ///
    /// A bare container is a raw collection of `Object`.
    #[must_use]
    pub fn of_class(raw: &RawClass) -> Self {
        match raw {
            RawClass::Array(component) => Self::array(Self::of_class(component)),
            RawClass::Container(container) => {
                Self::collection(*container, vec![Self::scalar(ScalarType::Object)])
            }
            other => Self::leaf(other.clone()),
        }
    }

    /// Normalizes a declared signature.
    ///
    /// # Errors
    ///
    /// Fails for wildcards, for type arguments applied to something that is
    /// not a container, and for unresolvable generic array components.
    pub fn from_signature(signature: &TypeSignature) -> Result<Self, ConstructionError> {
        match signature {
            TypeSignature::Class(raw) => Ok(Self::of_class(raw)),
            TypeSignature::Parameterized { raw, arguments } => {
                let RawClass::Container(container) = raw else {
                    if arguments.len() != 1 {
                        return Err(ConstructionError::InvalidTypeArguments {
                            raw: raw.to_string(),
                            count: arguments.len(),
                        });
                    }
                    return Err(ConstructionError::UnsupportedType(signature.to_string()));
                };
                let arguments = arguments
                    .iter()
                    .map(Self::from_argument)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::collection(*container, arguments))
            }
            TypeSignature::GenericArray(component) => {
                Ok(Self::array(Self::from_argument(component)?))
            }
            TypeSignature::Wildcard => Err(ConstructionError::UnsupportedType(signature.to_string())),
        }
    }

    /// Parses and normalizes a textual signature.
    ///
    /// # Errors
    ///
    /// See [`TypeSignature::parse`] and [`TypeDescriptor::from_signature`].
    pub fn parse(input: &str) -> Result<Self, ConstructionError> {
        Self::from_signature(&TypeSignature::parse(input)?)
    }

    fn from_argument(signature: &TypeSignature) -> Result<Self, ConstructionError> {
        match signature {
            TypeSignature::Wildcard => Err(ConstructionError::UnresolvableElement(signature.to_string())),
            other => Self::from_signature(other),
        }
    }

    fn leaf(raw_class: RawClass) -> Self {
        Self {
            kind: TypeKind::Scalar,
            raw_class,
            arguments: Vec::new(),
            variant: CollectionVariant::Unspecified,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[must_use]
    pub fn raw_class(&self) -> &RawClass {
        &self.raw_class
    }

    /// Type arguments as supplied by the source signature.
    #[must_use]
    pub fn arguments(&self) -> &[TypeDescriptor] {
        &self.arguments
    }

    /// The element type, present for arrays and well-formed collections.
    #[must_use]
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match (self.kind, self.arguments.as_slice()) {
            (TypeKind::Array | TypeKind::Collection, [element]) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn variant(&self) -> CollectionVariant {
        self.variant
    }

    /// The scalar this descriptor names as a whole, with `u8[]`/`char[]`
    /// counted as scalars.
    #[must_use]
    pub fn as_scalar(&self) -> Option<ScalarType> {
        match self.kind {
            TypeKind::Collection => None,
            TypeKind::Scalar | TypeKind::Array => self.raw_class.as_scalar(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TypeKind::Scalar => write!(f, "{}", self.raw_class),
            TypeKind::Array => match self.element() {
                Some(element) => write!(f, "{element}[]"),
                None => write!(f, "{}", self.raw_class),
            },
            TypeKind::Collection => {
                write!(f, "{}<", self.raw_class)?;
                for (i, arg) in self.arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::Nullability;

    #[test]
    fn scalar_descriptor() {
        let d = TypeDescriptor::parse("i64?").unwrap();
        assert_eq!(d.kind(), TypeKind::Scalar);
        assert!(d.element().is_none());
        assert_eq!(d.as_scalar(), Some(ScalarType::Long(Nullability::Nullable)));
        assert_eq!(d.variant(), CollectionVariant::Unspecified);
    }

    #[test]
    fn array_descriptor_carries_component() {
        let d = TypeDescriptor::parse("String[]").unwrap();
        assert_eq!(d.kind(), TypeKind::Array);
        assert_eq!(d.element(), Some(&TypeDescriptor::scalar(ScalarType::String)));
        assert_eq!(d.as_scalar(), None);
    }

    #[test]
    fn byte_array_is_scalar_shaped() {
        let d = TypeDescriptor::parse("u8[]").unwrap();
        assert_eq!(d.kind(), TypeKind::Array);
        assert_eq!(d.as_scalar(), Some(ScalarType::Bytes));
    }

    #[test]
    fn collection_descriptor() {
        let d = TypeDescriptor::parse("Set<String>").unwrap();
        assert_eq!(d.kind(), TypeKind::Collection);
        assert_eq!(d.variant(), CollectionVariant::Set);
        assert_eq!(d.raw_class(), &RawClass::Container(ContainerClass::Set));
        assert_eq!(d.element(), Some(&TypeDescriptor::scalar(ScalarType::String)));
    }

    #[test]
    fn raw_collection_defaults_to_object() {
        let d = TypeDescriptor::parse("Vec").unwrap();
        assert_eq!(d.variant(), CollectionVariant::List);
        assert_eq!(d.element(), Some(&TypeDescriptor::scalar(ScalarType::Object)));
    }

    #[test]
    fn collection_keeps_bad_argument_counts() {
        let none = TypeDescriptor::parse("List<>").unwrap();
        assert!(none.arguments().is_empty());
        assert!(none.element().is_none());

        let two = TypeDescriptor::parse("Set<String, i32>").unwrap();
        assert_eq!(two.arguments().len(), 2);
        assert!(two.element().is_none());
    }

    #[test]
    fn generic_array_normalizes_like_class_array() {
        let generic = TypeDescriptor::from_signature(&TypeSignature::GenericArray(Box::new(
            TypeSignature::parse("String").unwrap(),
        )))
        .unwrap();
        assert_eq!(generic, TypeDescriptor::parse("String[]").unwrap());
    }

    #[test]
    fn wildcards_are_unresolvable() {
        assert_eq!(
            TypeDescriptor::parse("List<?[]>"),
            Err(ConstructionError::UnresolvableElement("?".to_string()))
        );
        assert_eq!(
            TypeDescriptor::parse("List<?>"),
            Err(ConstructionError::UnresolvableElement("?".to_string()))
        );
        assert_eq!(
            TypeDescriptor::parse("?"),
            Err(ConstructionError::UnsupportedType("?".to_string()))
        );
    }

    #[test]
    fn parameterized_non_container_is_rejected() {
        assert_eq!(
            TypeDescriptor::parse("Uuid<String>"),
            Err(ConstructionError::UnsupportedType("Uuid<String>".to_string()))
        );
        assert_eq!(
            TypeDescriptor::parse("i32<String, String>"),
            Err(ConstructionError::InvalidTypeArguments {
                raw: "i32".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn display() {
        for text in ["List<String[]>", "i32?", "u8[][]", "Set<f64>", "Map<String, i32>"] {
            assert_eq!(TypeDescriptor::parse(text).unwrap().to_string(), text);
        }
        assert_eq!(TypeDescriptor::parse("List").unwrap().to_string(), "List<Object>");
    }
}
