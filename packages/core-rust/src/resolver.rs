//! Builds codec trees from type descriptors.
//!
//! Resolution is a single recursive pass with no deferred work: every
//! failure surfaces here as a [`ConstructionError`], before any value is
//! converted.

use std::sync::Arc;

use tracing::debug;

use crate::class::{CollectionVariant, RawClass};
use crate::codec::{
    ArrayCodec, Codec, CollectionCodec, ElementCodec, ScalarCatalog, ScalarCodec, ValueTranscoder,
};
use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::error::ConstructionError;
use crate::signature::TypeSignature;

/// Resolves declared types to codecs using a scalar catalog.
#[derive(Debug, Clone, Default)]
pub struct CodecResolver {
    catalog: ScalarCatalog,
}

impl CodecResolver {
    /// Creates a resolver over the built-in scalar catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_catalog(catalog: ScalarCatalog) -> Self {
        Self { catalog }
    }

    /// Adds an application-defined scalar codec.
    ///
    /// # Errors
    ///
    /// See [`ScalarCatalog::register`].
    pub fn register(&mut self, transcoder: Arc<dyn ValueTranscoder>) -> Result<(), ConstructionError> {
        self.catalog.register(transcoder)
    }

    #[must_use]
    pub fn catalog(&self) -> &ScalarCatalog {
        &self.catalog
    }

    /// Resolves a parsed textual signature.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if the signature is malformed or names
    /// an unsupported type.
    pub fn resolve_str(&self, signature: &str) -> Result<Codec, ConstructionError> {
        self.resolve(&TypeDescriptor::parse(signature)?)
    }

    /// Normalizes and resolves a signature.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if the signature names an unsupported type.
    pub fn resolve_signature(&self, signature: &TypeSignature) -> Result<Codec, ConstructionError> {
        self.resolve(&TypeDescriptor::from_signature(signature)?)
    }

    /// Builds the codec tree for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if any part of the tree is unsupported.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Result<Codec, ConstructionError> {
        let codec = match descriptor.kind() {
            TypeKind::Scalar => Codec::Scalar(self.scalar(descriptor)?),
            TypeKind::Array => self.array(descriptor)?,
            TypeKind::Collection => Codec::Collection(self.collection(descriptor)?),
        };
        debug!(%descriptor, %codec, "resolved codec");
        Ok(codec)
    }

    fn scalar(&self, descriptor: &TypeDescriptor) -> Result<ScalarCodec, ConstructionError> {
        match descriptor.raw_class() {
            RawClass::Scalar(ty) => self.catalog.lookup(ty),
            _ => Err(ConstructionError::UnsupportedType(descriptor.to_string())),
        }
    }

    /// `u8[]` and `char[]` stay scalar; any other array wraps its element.
    fn array(&self, descriptor: &TypeDescriptor) -> Result<Codec, ConstructionError> {
        if let Some(ty) = descriptor.as_scalar() {
            return Ok(Codec::Scalar(self.catalog.lookup(&ty)?));
        }
        let element = descriptor
            .element()
            .ok_or_else(|| ConstructionError::UnsupportedType(descriptor.to_string()))?;
        Ok(Codec::Array(ArrayCodec::new(self.element_scalar(element)?)))
    }

    /// Scalar codec for an array element. The element may itself be
    /// `u8[]`/`char[]`, never any other array or a collection.
    fn element_scalar(&self, element: &TypeDescriptor) -> Result<ScalarCodec, ConstructionError> {
        match element.kind() {
            TypeKind::Scalar => self.scalar(element),
            TypeKind::Array => match element.as_scalar() {
                Some(ty) => self.catalog.lookup(&ty),
                None => Err(ConstructionError::NestingTooDeep(element.to_string())),
            },
            TypeKind::Collection => Err(ConstructionError::NestingTooDeep(element.to_string())),
        }
    }

    fn collection(&self, descriptor: &TypeDescriptor) -> Result<CollectionCodec, ConstructionError> {
        let count = descriptor.arguments().len();
        let element = match descriptor.element() {
            Some(element) if count == 1 => element,
            _ => {
                return Err(ConstructionError::InvalidTypeArguments {
                    raw: descriptor.raw_class().to_string(),
                    count,
                })
            }
        };
        let RawClass::Container(container) = descriptor.raw_class() else {
            return Err(ConstructionError::UnsupportedType(descriptor.to_string()));
        };
        if descriptor.variant() == CollectionVariant::Unspecified {
            return Err(ConstructionError::UnsupportedCollection(descriptor.to_string()));
        }

        let inner = match element.kind() {
            TypeKind::Scalar => ElementCodec::Scalar(self.scalar(element)?),
            TypeKind::Array => match element.as_scalar() {
                Some(ty) => ElementCodec::Scalar(self.catalog.lookup(&ty)?),
                None => {
                    let component = element
                        .element()
                        .ok_or_else(|| ConstructionError::UnresolvableElement(element.to_string()))?;
                    ElementCodec::Array(ArrayCodec::new(self.element_scalar(component)?))
                }
            },
            TypeKind::Collection => {
                return Err(ConstructionError::NestingTooDeep(element.to_string()))
            }
        };
        CollectionCodec::new(*container, inner)
    }
}
