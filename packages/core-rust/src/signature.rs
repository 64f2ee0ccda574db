//! Declared type signatures, as handed over by the property introspector.
//!
//! # Notation
//!
//! ```text
//! signature := name [ '<' [ signature ( ',' signature )* ] '>' ] ( '[]' )*
//!            | '?' ( '[]' )*
//! name      := identifier [ '?' ]
//! ```
//!
//! `i32?` is the nullable form of a primitive, `?` on its own is a wildcard.
//! An array of a plain class (`String[]`) stays a [`TypeSignature::Class`];
//! an array of a parameterized type or wildcard (`List<i32>[]`, `?[]`) is a
//! [`TypeSignature::GenericArray`].

use std::fmt;
use std::str::FromStr;

use crate::class::RawClass;
use crate::error::ConstructionError;

/// A declared type, before normalization into a [`TypeDescriptor`](crate::TypeDescriptor).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// A non-generic class, including arrays of non-generic classes.
    Class(RawClass),
    /// A generic class applied to type arguments.
    Parameterized {
        raw: RawClass,
        arguments: Vec<TypeSignature>,
    },
    /// An array whose component is itself generic.
    GenericArray(Box<TypeSignature>),
    /// An unbound type argument.
    Wildcard,
}

impl TypeSignature {
    /// Parses the textual notation described in the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::Signature`] pointing at the offending offset.
    pub fn parse(input: &str) -> Result<Self, ConstructionError> {
        let mut parser = Parser {
            input,
            pos: 0,
            depth: 0,
        };
        let signature = parser.signature()?;
        parser.skip_ws();
        if parser.pos != input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(signature)
    }

    /// Appends one array dimension.
    #[must_use]
    pub fn into_array(self) -> Self {
        match self {
            Self::Class(raw) => Self::Class(RawClass::Array(Box::new(raw))),
            other => Self::GenericArray(Box::new(other)),
        }
    }
}

impl FromStr for TypeSignature {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(raw) => write!(f, "{raw}"),
            Self::Parameterized { raw, arguments } => {
                write!(f, "{raw}<")?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::GenericArray(component) => write!(f, "{component}[]"),
            Self::Wildcard => f.write_str("?"),
        }
    }
}

/// Type arguments and array dimensions allowed on one path of a signature.
const MAX_DEPTH: usize = 32;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, reason: &'static str) -> ConstructionError {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, offset: usize, reason: &'static str) -> ConstructionError {
        ConstructionError::Signature {
            input: self.input.to_string(),
            offset,
            reason,
        }
    }

    fn signature(&mut self) -> Result<TypeSignature, ConstructionError> {
        self.skip_ws();
        let mut signature = if self.peek() == Some(b'?') {
            self.pos += 1;
            TypeSignature::Wildcard
        } else {
            self.class()?
        };
        let mut dimensions = 0;
        loop {
            self.skip_ws();
            if self.input[self.pos..].starts_with("[]") {
                dimensions += 1;
                if self.depth + dimensions > MAX_DEPTH {
                    return Err(self.error("type nesting too deep"));
                }
                self.pos += 2;
                signature = signature.into_array();
            } else if self.peek() == Some(b'[') {
                return Err(self.error_at(self.pos + 1, "expected ']'"));
            } else {
                return Ok(signature);
            }
        }
    }

    fn class(&mut self) -> Result<TypeSignature, ConstructionError> {
        let start = self.pos;
        let name = self.identifier()?;
        let nullable = self.peek() == Some(b'?');
        if nullable {
            self.pos += 1;
        }
        let raw = RawClass::from_name(name, nullable).map_err(|reason| self.error_at(start, reason))?;

        self.skip_ws();
        if self.peek() != Some(b'<') {
            return Ok(TypeSignature::Class(raw));
        }
        if self.depth == MAX_DEPTH {
            return Err(self.error("type nesting too deep"));
        }
        self.pos += 1;
        self.depth += 1;
        let arguments = self.arguments()?;
        self.depth -= 1;
        Ok(TypeSignature::Parameterized { raw, arguments })
    }

    /// Type arguments after an opening `<`, through the closing `>`.
    fn arguments(&mut self) -> Result<Vec<TypeSignature>, ConstructionError> {
        let mut arguments = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b'>') {
            self.pos += 1;
            return Ok(arguments);
        }
        loop {
            arguments.push(self.signature()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'>') => {
                    self.pos += 1;
                    return Ok(arguments);
                }
                _ => return Err(self.error("expected ',' or '>'")),
            }
        }
    }

    fn identifier(&mut self) -> Result<&'a str, ConstructionError> {
        let input = self.input;
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.pos += 1,
            _ => return Err(self.error("expected a type name")),
        }
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b':'))
        {
            self.pos += 1;
        }
        Ok(&input[start..self.pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ContainerClass, Nullability, ScalarType};

    fn int() -> RawClass {
        RawClass::Scalar(ScalarType::Int(Nullability::Primitive))
    }

    #[test]
    fn parses_scalars() {
        assert_eq!(TypeSignature::parse("i32").unwrap(), TypeSignature::Class(int()));
        assert_eq!(
            TypeSignature::parse("bool?").unwrap(),
            TypeSignature::Class(RawClass::Scalar(ScalarType::Bool(Nullability::Nullable)))
        );
    }

    #[test]
    fn parses_class_arrays() {
        assert_eq!(
            TypeSignature::parse("u8[]").unwrap(),
            TypeSignature::Class(RawClass::Array(Box::new(RawClass::Byte)))
        );
        assert_eq!(
            TypeSignature::parse("i32 [] []").unwrap(),
            TypeSignature::Class(RawClass::Array(Box::new(RawClass::Array(Box::new(int())))))
        );
    }

    #[test]
    fn parses_parameterized() {
        let sig = TypeSignature::parse("List< i32 >").unwrap();
        assert_eq!(
            sig,
            TypeSignature::Parameterized {
                raw: RawClass::Container(ContainerClass::List),
                arguments: vec![TypeSignature::Class(int())],
            }
        );
    }

    #[test]
    fn parses_empty_and_multiple_arguments() {
        let empty = TypeSignature::parse("List<>").unwrap();
        assert!(matches!(empty, TypeSignature::Parameterized { ref arguments, .. } if arguments.is_empty()));

        let two = TypeSignature::parse("Map<String, i32>").unwrap();
        assert!(matches!(two, TypeSignature::Parameterized { ref arguments, .. } if arguments.len() == 2));
    }

    #[test]
    fn generic_arrays() {
        assert_eq!(
            TypeSignature::parse("?[]").unwrap(),
            TypeSignature::GenericArray(Box::new(TypeSignature::Wildcard))
        );
        let sig = TypeSignature::parse("List<i32>[]").unwrap();
        assert!(matches!(sig, TypeSignature::GenericArray(_)));
    }

    #[test]
    fn display_roundtrips_text() {
        for text in ["List<String[]>", "Map<String, i64?>", "Set<?>", "u8[][]", "List<i32>[]"] {
            assert_eq!(TypeSignature::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn reports_offsets() {
        let err = TypeSignature::parse("List<i32").unwrap_err();
        assert_eq!(
            err,
            ConstructionError::Signature {
                input: "List<i32".to_string(),
                offset: 8,
                reason: "expected ',' or '>'",
            }
        );

        let err = TypeSignature::parse("i32[").unwrap_err();
        assert!(matches!(err, ConstructionError::Signature { offset: 4, .. }));

        let err = TypeSignature::parse("String?").unwrap_err();
        assert!(matches!(err, ConstructionError::Signature { offset: 0, .. }));

        let err = TypeSignature::parse("i32 x").unwrap_err();
        assert!(matches!(err, ConstructionError::Signature { reason: "unexpected trailing input", .. }));

        assert!(TypeSignature::parse("").is_err());
        assert!(TypeSignature::parse("<i32>").is_err());
    }

    #[test]
    fn deep_nesting_is_rejected_without_recursing() {
        let deep = "List<".repeat(20_000);
        let err = TypeSignature::parse(&deep).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::Signature { reason: "type nesting too deep", offset, .. }
                if offset == MAX_DEPTH * "List<".len() + "List".len()
        ));

        let dims = format!("i32{}", "[]".repeat(MAX_DEPTH + 1));
        assert!(matches!(
            TypeSignature::parse(&dims),
            Err(ConstructionError::Signature { reason: "type nesting too deep", .. })
        ));

        let nested = format!("{}i32{}", "List<".repeat(MAX_DEPTH), ">".repeat(MAX_DEPTH));
        assert!(TypeSignature::parse(&nested).is_ok());
    }

    #[test]
    fn qualified_names_are_named_scalars() {
        let sig: TypeSignature = "net::Uuid".parse().unwrap();
        assert!(matches!(sig, TypeSignature::Class(RawClass::Scalar(ScalarType::Named(ref n))) if &**n == "net::Uuid"));
    }
}
