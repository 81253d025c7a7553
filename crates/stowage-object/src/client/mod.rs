//! Backend seam and the [`object_store`]-backed client.
//!
//! [`ObjectBackend`] is the collaborator [`ObjectStorage`](crate::ObjectStorage)
//! talks to. [`ObjectStoreClient`] is the production implementation: a thin,
//! cloneable wrapper around `Arc<dyn ObjectStore>`. Every call is
//! instrumented with [`tracing`].

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use object_store::path::Path;
use object_store::{Attribute, ObjectMeta, ObjectStore, PutOptions, PutPayload};

use crate::{Error, Result, TRACING_TARGET_CLIENT};

mod get_output;
mod put_output;

pub use get_output::GetOutput;
pub use put_output::PutOutput;

/// Operations the storage adapter needs from an object-storage provider.
///
/// Keys are human-readable strings scoped to the bucket the backend was
/// built for.
#[async_trait::async_trait]
pub trait ObjectBackend: fmt::Debug + Send + Sync + 'static {
    /// Upload `data` to `key`, overwriting any existing object.
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<PutOutput>;

    /// Download the full object stored at `key`.
    async fn get(&self, key: &str) -> Result<GetOutput>;

    /// Fetch object metadata without the body.
    async fn head(&self, key: &str) -> Result<ObjectMeta>;

    /// Delete the object at `key`.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Whether `err` is this provider's answer for a missing object.
    fn is_not_found(&self, err: &Error) -> bool {
        err.is_not_found()
    }
}

/// Cloneable handle to any [`ObjectStore`] backend (S3, Azure, GCS, memory).
///
/// All methods accept string keys and parse them into
/// [`object_store::path::Path`] internally.
#[derive(Clone, Debug)]
pub struct ObjectStoreClient(pub Arc<dyn ObjectStore>);

impl ObjectStoreClient {
    /// Wrap a concrete [`ObjectStore`] implementation.
    pub fn new(store: impl ObjectStore) -> Self {
        Self(Arc::new(store))
    }
}

#[async_trait::async_trait]
impl ObjectBackend for ObjectStoreClient {
    #[tracing::instrument(
        name = "object.put",
        target = TRACING_TARGET_CLIENT,
        skip(self, data),
        fields(size = data.len())
    )]
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<PutOutput> {
        let path = Path::parse(key)?;
        let mut opts = PutOptions::default();
        if let Some(ct) = content_type {
            opts.attributes
                .insert(Attribute::ContentType, ct.to_string().into());
        }
        let result = self
            .0
            .put_opts(&path, PutPayload::from(data), opts)
            .await?;
        Ok(result.into())
    }

    #[tracing::instrument(name = "object.get", target = TRACING_TARGET_CLIENT, skip(self))]
    async fn get(&self, key: &str) -> Result<GetOutput> {
        let path = Path::parse(key)?;
        let result = self.0.get(&path).await?;
        let meta = result.meta.clone();
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.to_string());
        let data = result.bytes().await?;
        Ok(GetOutput {
            data,
            content_type,
            meta,
        })
    }

    #[tracing::instrument(name = "object.head", target = TRACING_TARGET_CLIENT, skip(self))]
    async fn head(&self, key: &str) -> Result<ObjectMeta> {
        let path = Path::parse(key)?;
        Ok(self.0.head(&path).await?)
    }

    #[tracing::instrument(name = "object.delete", target = TRACING_TARGET_CLIENT, skip(self))]
    async fn delete(&self, key: &str) -> Result<()> {
        let path = Path::parse(key)?;
        Ok(self.0.delete(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use object_store::memory::InMemory;

    use super::*;

    fn test_client() -> ObjectStoreClient {
        ObjectStoreClient::new(InMemory::new())
    }

    #[tokio::test]
    async fn put_and_get() {
        let client = test_client();
        let data = Bytes::from("hello world");
        client
            .put("test.txt", data.clone(), Some("text/plain"))
            .await
            .unwrap();

        let result = client.get("test.txt").await.unwrap();
        assert_eq!(result.data, data);
        assert_eq!(result.content_type.as_deref(), Some("text/plain"));
        assert_eq!(result.meta.size, 11);
    }

    #[tokio::test]
    async fn put_without_content_type() {
        let client = test_client();
        client.put("raw.bin", Bytes::from("x"), None).await.unwrap();

        let result = client.get("raw.bin").await.unwrap();
        assert!(result.content_type.is_none());
    }

    #[tokio::test]
    async fn put_returns_etag() {
        let client = test_client();
        let result = client
            .put("etag.bin", Bytes::from("x"), None)
            .await
            .unwrap();
        assert!(result.e_tag.is_some());
    }

    #[tokio::test]
    async fn head() {
        let client = test_client();
        client
            .put("dir/head.bin", Bytes::from("data"), None)
            .await
            .unwrap();

        let meta = client.head("dir/head.bin").await.unwrap();
        assert_eq!(meta.size, 4);
        assert_eq!(meta.location, Path::from("dir/head.bin"));
    }

    #[tokio::test]
    async fn head_not_found() {
        let client = test_client();
        let err = client.head("missing").await.unwrap_err();
        assert!(client.is_not_found(&err));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn delete() {
        let client = test_client();
        client.put("del.bin", Bytes::from("x"), None).await.unwrap();
        client.delete("del.bin").await.unwrap();

        let err = client.get("del.bin").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn malformed_key_is_rejected() {
        let client = test_client();
        let err = client
            .put("a//b", Bytes::from("x"), None)
            .await
            .unwrap_err();
        assert!(err.is_validation_error());
    }
}
