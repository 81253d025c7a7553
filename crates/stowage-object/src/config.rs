//! Storage configuration.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::ObjectStoreClient;
use crate::providers::{
    AzureCredentials, AzureProvider, GcsCredentials, GcsProvider, MemoryCredentials,
    MemoryProvider, Provider, S3Credentials, S3Provider,
};
use crate::{Result, TRACING_TARGET_PROVIDER};

/// Which provider to connect to, with its credentials.
///
/// Serialized with a `kind` tag:
///
/// ```json
/// { "kind": "s3", "region": "eu-west-1", "endpoint": "http://localhost:9000" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// AWS S3 or any S3-compatible service.
    S3(S3Credentials),
    /// Azure Blob Storage.
    Azure(AzureCredentials),
    /// Google Cloud Storage.
    Gcs(GcsCredentials),
    /// In-process store.
    Memory(MemoryCredentials),
}

impl ProviderConfig {
    /// Returns the provider identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Self::S3(_) => S3Provider::ID,
            Self::Azure(_) => AzureProvider::ID,
            Self::Gcs(_) => GcsProvider::ID,
            Self::Memory(_) => MemoryProvider::ID,
        }
    }

    /// Checks the credentials without any I/O.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::S3(creds) => S3Provider::validate(creds),
            Self::Azure(creds) => AzureProvider::validate(creds),
            Self::Gcs(creds) => GcsProvider::validate(creds),
            Self::Memory(creds) => MemoryProvider::validate(creds),
        }
    }

    /// Builds a client for `bucket` through the matching [`Provider`].
    pub async fn connect(&self, bucket: &str) -> Result<ObjectStoreClient> {
        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            provider = self.id(),
            bucket,
            "building provider client"
        );

        let client: ObjectStoreClient = match self {
            Self::S3(creds) => S3Provider::connect(bucket, creds).await?.into(),
            Self::Azure(creds) => AzureProvider::connect(bucket, creds).await?.into(),
            Self::Gcs(creds) => GcsProvider::connect(bucket, creds).await?.into(),
            Self::Memory(creds) => MemoryProvider::connect(bucket, creds).await?.into(),
        };
        Ok(client)
    }
}

/// Configuration of an [`ObjectStorage`](crate::ObjectStorage).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// Provider and credentials.
    pub provider: ProviderConfig,

    /// Sniff the payload's content type on write and reject unknown types.
    #[serde(default = "default_true")]
    pub classify_content_type: bool,

    /// Answer `exists` with a metadata probe. When disabled, `exists` fails
    /// with [`Error::NotImplemented`](crate::Error::NotImplemented).
    #[serde(default = "default_true")]
    pub probe_existence: bool,

    /// Let `remove` delete objects. When disabled, `remove` fails with
    /// [`Error::NotImplemented`](crate::Error::NotImplemented).
    #[serde(default)]
    pub allow_remove: bool,
}

fn default_true() -> bool {
    true
}

impl StorageConfig {
    /// Creates a configuration for `provider` with default flags.
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            classify_content_type: true,
            probe_existence: true,
            allow_remove: false,
        }
    }

    /// Creates a configuration backed by the in-memory provider.
    pub fn memory() -> Self {
        Self::new(ProviderConfig::Memory(MemoryCredentials::default()))
    }

    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enables or disables content-type classification on write.
    #[must_use]
    pub fn with_classify_content_type(mut self, enabled: bool) -> Self {
        self.classify_content_type = enabled;
        self
    }

    /// Enables or disables the `exists` probe.
    #[must_use]
    pub fn with_probe_existence(mut self, enabled: bool) -> Self {
        self.probe_existence = enabled;
        self
    }

    /// Enables or disables deletion through `remove`.
    #[must_use]
    pub fn with_allow_remove(mut self, enabled: bool) -> Self {
        self.allow_remove = enabled;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()
    }
}
