//! `attrbind` Core: type signatures, descriptors, and directory attribute value codecs.

pub mod class;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod resolver;
pub mod signature;
pub mod types;

pub use class::{CollectionVariant, ContainerClass, Nullability, RawClass, ScalarType};
pub use codec::{
    ArrayCodec, Codec, CollectionCodec, ElementCodec, ScalarCatalog, ScalarCodec, ValueTranscoder,
};
pub use descriptor::{TypeDescriptor, TypeKind};
pub use error::{ConstructionError, ConversionError};
pub use resolver::CodecResolver;
pub use signature::TypeSignature;
pub use types::{AttributeValues, Value};
