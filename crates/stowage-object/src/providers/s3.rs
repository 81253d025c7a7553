//! S3-compatible provider using [`object_store::aws::AmazonS3Builder`].
//!
//! Works with AWS S3, MinIO, and any S3-compatible service.

use derive_more::{Deref, Into};
use object_store::aws::AmazonS3Builder;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Provider;
use super::provider::{builder_error, validate_endpoint};
use crate::client::ObjectStoreClient;
use crate::{Error, Result};

/// Typed credentials for S3-compatible providers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    /// AWS region (defaults to `us-east-1`).
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint URL (e.g. `http://localhost:9000` for MinIO).
    /// Required for non-AWS S3-compatible services.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key ID for static credentials.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Secret access key for static credentials.
    #[serde(default, skip_serializing)]
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials.
    #[serde(default, skip_serializing)]
    pub session_token: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for S3Credentials {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
        }
    }
}

/// S3-backed object storage client.
#[derive(Debug, Deref, Into)]
pub struct S3Provider(ObjectStoreClient);

#[async_trait::async_trait]
impl Provider for S3Provider {
    type Credentials = S3Credentials;

    const ID: &'static str = "s3";

    fn validate(creds: &Self::Credentials) -> Result<()> {
        if creds.region.trim().is_empty() {
            return Err(Error::config("[s3] region cannot be empty"));
        }

        if creds.access_key_id.is_some() != creds.secret_access_key.is_some() {
            return Err(Error::config(
                "[s3] access key id and secret access key must be set together",
            ));
        }

        validate_endpoint(Self::ID, creds.endpoint.as_deref())
    }

    async fn connect(bucket: &str, creds: &Self::Credentials) -> Result<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(&creds.region);

        if let Some(endpoint) = &creds.endpoint {
            builder = builder.with_endpoint(endpoint);
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }

        if let Some(access_key) = &creds.access_key_id {
            builder = builder.with_access_key_id(access_key);
        }

        if let Some(secret_key) = &creds.secret_access_key {
            builder = builder.with_secret_access_key(secret_key);
        }

        if let Some(token) = &creds.session_token {
            builder = builder.with_token(token);
        }

        let store = builder.build().map_err(|e| builder_error(Self::ID, e))?;

        Ok(Self(ObjectStoreClient::new(store)))
    }
}
