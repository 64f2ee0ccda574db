//! `attrbind` Mapper: bean descriptors, entry mapping, and directory managers.

pub mod bean;
pub mod config;
pub mod descriptor;
pub mod directory;
pub mod entry;
pub mod error;
pub mod logging;
pub mod manager;
pub mod mapper;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use bean::{Bean, BeanSchema, PropertySchema};
pub use config::{LogConfig, LogFormat, MapperConfig};
pub use descriptor::{ClassDescriptor, PropertyDescriptor};
pub use directory::{Directory, DirectoryError, MemoryDirectory};
pub use entry::Entry;
pub use error::{ManagerError, MappingError, PropertyError};
pub use manager::EntryManager;
pub use mapper::EntryMapper;
pub use registry::{CodecCache, DescriptorRegistry};
