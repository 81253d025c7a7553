//! In-process provider using [`object_store::memory::InMemory`].
//!
//! Objects live as long as the client; useful for local runs and tests.

use derive_more::{Deref, Into};
use object_store::memory::InMemory;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Provider;
use crate::Result;
use crate::client::ObjectStoreClient;

/// The in-memory provider takes no credentials.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct MemoryCredentials {}

/// Memory-backed object storage client.
#[derive(Debug, Deref, Into)]
pub struct MemoryProvider(ObjectStoreClient);

#[async_trait::async_trait]
impl Provider for MemoryProvider {
    type Credentials = MemoryCredentials;

    const ID: &'static str = "memory";

    async fn connect(_bucket: &str, _creds: &Self::Credentials) -> Result<Self> {
        Ok(Self(ObjectStoreClient::new(InMemory::new())))
    }
}
