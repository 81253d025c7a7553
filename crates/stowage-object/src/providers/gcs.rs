//! Google Cloud Storage provider using [`object_store::gcp::GoogleCloudStorageBuilder`].
//!
//! A custom endpoint (e.g. a fake GCS server) is carried to the builder as
//! the `gcs_base_url` field of the service account key.

use derive_more::{Deref, Into};
use object_store::gcp::GoogleCloudStorageBuilder;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Provider;
use super::provider::{builder_error, validate_endpoint};
use crate::client::ObjectStoreClient;
use crate::{Error, Result};

/// Typed credentials for Google Cloud Storage.
///
/// With no key configured, application default credentials are used.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct GcsCredentials {
    /// Path to a JSON service account key file.
    #[serde(default)]
    pub service_account_path: Option<String>,
    /// Inline JSON service account key.
    #[serde(default, skip_serializing)]
    pub service_account_key: Option<String>,
    /// Custom endpoint URL (for testing with a fake GCS server).
    ///
    /// Without a service account key, requests go out unauthenticated.
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Google Cloud Storage-backed object storage client.
#[derive(Debug, Deref, Into)]
pub struct GcsProvider(ObjectStoreClient);

/// Returns the service account key document with `gcs_base_url` set to
/// `endpoint`, or an unauthenticated stub when there is no key.
fn key_with_base_url(key: Option<&str>, endpoint: &str) -> Result<String> {
    let mut doc = match key {
        Some(key) => serde_json::from_str::<Value>(key)?,
        None => json!({
            "private_key": "",
            "private_key_id": "",
            "client_email": "",
            "disable_oauth": true,
        }),
    };

    let Some(fields) = doc.as_object_mut() else {
        return Err(Error::config("[gcs] service account key must be a JSON object"));
    };
    fields.insert("gcs_base_url".to_string(), Value::from(endpoint));

    Ok(doc.to_string())
}

#[async_trait::async_trait]
impl Provider for GcsProvider {
    type Credentials = GcsCredentials;

    const ID: &'static str = "gcs";

    fn validate(creds: &Self::Credentials) -> Result<()> {
        if creds.service_account_path.is_some() && creds.service_account_key.is_some() {
            return Err(Error::config(
                "[gcs] service account path and key are mutually exclusive",
            ));
        }

        validate_endpoint(Self::ID, creds.endpoint.as_deref())
    }

    async fn connect(bucket: &str, creds: &Self::Credentials) -> Result<Self> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);

        match &creds.endpoint {
            Some(endpoint) => {
                let key = match &creds.service_account_path {
                    Some(path) => Some(tokio::fs::read_to_string(path).await.map_err(|e| {
                        Error::config(format!("[gcs] failed to read `{path}`: {e}"))
                    })?),
                    None => creds.service_account_key.clone(),
                };
                builder =
                    builder.with_service_account_key(key_with_base_url(key.as_deref(), endpoint)?);
            }
            None => {
                if let Some(path) = &creds.service_account_path {
                    builder = builder.with_service_account_path(path);
                }

                if let Some(key) = &creds.service_account_key {
                    builder = builder.with_service_account_key(key);
                }
            }
        }

        let store = builder.build().map_err(|e| builder_error(Self::ID, e))?;

        Ok(Self(ObjectStoreClient::new(store)))
    }
}
