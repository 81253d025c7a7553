//! Provider trait and object storage providers.

mod azure;
mod gcs;
mod memory;
mod provider;
mod s3;

pub use azure::{AzureCredentials, AzureProvider};
pub use gcs::{GcsCredentials, GcsProvider};
pub use memory::{MemoryCredentials, MemoryProvider};
pub use provider::Provider;
pub use s3::{S3Credentials, S3Provider};
