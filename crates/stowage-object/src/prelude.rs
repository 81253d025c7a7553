//! Convenience re-exports.

pub use crate::client::{GetOutput, ObjectBackend, ObjectStoreClient, PutOutput};
pub use crate::content::FileType;
pub use crate::providers::{AzureProvider, GcsProvider, MemoryProvider, Provider, S3Provider};
pub use crate::{Error, ObjectStorage, ProviderConfig, Result, StorageConfig};
