//! Provider trait for creating bucket-scoped client connections.

use serde::de::DeserializeOwned;
use url::Url;

use crate::{Error, Result};

/// Factory for creating authenticated connections to an object-storage provider.
///
/// Implementations turn typed credentials plus a bucket (or container) name
/// into a connected [`ObjectStoreClient`](crate::ObjectStoreClient) wrapper.
#[async_trait::async_trait]
pub trait Provider: Sized + Send + Sync + 'static {
    /// Strongly-typed credentials for this provider.
    type Credentials: DeserializeOwned + Send + Sync;

    /// Unique identifier (e.g. "s3", "azure").
    const ID: &'static str;

    /// Check credentials for structural problems without any I/O.
    ///
    /// The default implementation accepts everything.
    fn validate(_creds: &Self::Credentials) -> Result<()> {
        Ok(())
    }

    /// Create a client scoped to `bucket`.
    async fn connect(bucket: &str, creds: &Self::Credentials) -> Result<Self>;
}

/// Rejects endpoint overrides that are not absolute URLs.
pub(crate) fn validate_endpoint(provider: &str, endpoint: Option<&str>) -> Result<()> {
    let Some(endpoint) = endpoint else {
        return Ok(());
    };

    Url::parse(endpoint).map_err(|e| {
        Error::config(format!("[{provider}] invalid endpoint `{endpoint}`: {e}"))
    })?;
    Ok(())
}

/// Wraps a builder failure as a configuration error.
pub(crate) fn builder_error(provider: &str, err: object_store::Error) -> Error {
    tracing::error!(
        target: crate::TRACING_TARGET_PROVIDER,
        provider,
        error = %err,
        "failed to build provider client"
    );
    Error::Config {
        message: format!("[{provider}] failed to build client"),
        source: Some(err),
    }
}
