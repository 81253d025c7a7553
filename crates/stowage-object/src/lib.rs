#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for [`ObjectStorage`] lifecycle and operations.
///
/// Use this target for logging initialization, writes, reads, probes and removals.
pub const TRACING_TARGET_STORAGE: &str = "stowage_object::storage";

/// Tracing target for backend client calls.
pub const TRACING_TARGET_CLIENT: &str = "stowage_object::client";

/// Tracing target for provider construction.
///
/// Use this target for logging credential resolution and builder failures.
pub const TRACING_TARGET_PROVIDER: &str = "stowage_object::provider";

/// Backend seam and the `object_store`-backed client.
pub mod client;
mod config;
/// Magic-byte content-type classification.
pub mod content;
mod error;
/// Provider trait and object storage provider factories.
pub mod providers;
mod storage;

#[doc(hidden)]
pub mod prelude;

pub use crate::client::{GetOutput, ObjectBackend, ObjectStoreClient, PutOutput};
pub use crate::config::{ProviderConfig, StorageConfig};
pub use crate::content::FileType;
pub use crate::error::{Error, Result};
pub use crate::storage::ObjectStorage;

#[cfg(test)]
pub(crate) mod testing;
