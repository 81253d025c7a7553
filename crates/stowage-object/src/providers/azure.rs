//! Azure Blob Storage provider using [`object_store::azure::MicrosoftAzureBuilder`].
//!
//! The storage bucket maps to an Azure container.

use derive_more::{Deref, Into};
use object_store::azure::{AzureConfigKey, MicrosoftAzureBuilder};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Provider;
use super::provider::{builder_error, validate_endpoint};
use crate::client::ObjectStoreClient;
use crate::{Error, Result};

/// Typed credentials for Azure Blob Storage.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct AzureCredentials {
    /// Azure storage account name.
    pub account_name: String,
    /// Storage account access key.
    #[serde(default, skip_serializing)]
    pub access_key: Option<String>,
    /// Shared Access Signature token, as issued (`?sv=...&sig=...`).
    #[serde(default, skip_serializing)]
    pub sas_token: Option<String>,
    /// Custom endpoint URL (for Azure Stack or Azurite).
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Azure Blob Storage-backed object storage client.
#[derive(Debug, Deref, Into)]
pub struct AzureProvider(ObjectStoreClient);

#[async_trait::async_trait]
impl Provider for AzureProvider {
    type Credentials = AzureCredentials;

    const ID: &'static str = "azure";

    fn validate(creds: &Self::Credentials) -> Result<()> {
        if creds.account_name.trim().is_empty() {
            return Err(Error::config("[azure] account name cannot be empty"));
        }

        validate_endpoint(Self::ID, creds.endpoint.as_deref())
    }

    async fn connect(bucket: &str, creds: &Self::Credentials) -> Result<Self> {
        let mut builder = MicrosoftAzureBuilder::new()
            .with_container_name(bucket)
            .with_account(&creds.account_name);

        if let Some(key) = &creds.access_key {
            builder = builder.with_access_key(key);
        }

        // Percent-encoded as issued; the builder decodes it before use.
        if let Some(sas) = &creds.sas_token {
            builder = builder.with_config(AzureConfigKey::SasKey, sas);
        }

        if let Some(endpoint) = &creds.endpoint {
            builder = builder.with_endpoint(endpoint.clone());
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }

        let store = builder.build().map_err(|e| builder_error(Self::ID, e))?;

        Ok(Self(ObjectStoreClient::new(store)))
    }
}
