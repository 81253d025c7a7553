//! Bucket-scoped object storage.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::client::ObjectBackend;
use crate::{Error, Result, StorageConfig, TRACING_TARGET_STORAGE, content};

/// An object-storage adapter bound to a single bucket.
///
/// The backend client is installed once, either by [`init`](Self::init)
/// or at construction through [`connect`](Self::connect) and
/// [`with_backend`](Self::with_backend). Nothing is mutated afterwards, so a
/// storage can be shared across tasks behind an [`Arc`] without locking.
///
/// # Examples
///
/// ```rust,no_run
/// use stowage_object::{ObjectStorage, StorageConfig};
///
/// # async fn run() -> stowage_object::Result<()> {
/// let storage = ObjectStorage::connect("test-bucket", StorageConfig::memory()).await?;
///
/// let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
/// storage.write("images/a.png", png.to_vec()).await?;
///
/// assert!(storage.exists("images/a.png").await?);
/// assert_eq!(storage.read("images/a.png").await?, png.as_slice());
/// # Ok(())
/// # }
/// ```
pub struct ObjectStorage {
    bucket: String,
    config: StorageConfig,
    backend: OnceCell<Arc<dyn ObjectBackend>>,
}

impl ObjectStorage {
    /// Creates an uninitialized storage. No I/O is performed.
    pub fn new(bucket: impl Into<String>, config: StorageConfig) -> Self {
        Self {
            bucket: bucket.into(),
            config,
            backend: OnceCell::new(),
        }
    }

    /// Creates a storage and initializes its backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the
    /// provider client cannot be built.
    pub async fn connect(bucket: impl Into<String>, config: StorageConfig) -> Result<Self> {
        let storage = Self::new(bucket, config);
        storage.init().await?;
        Ok(storage)
    }

    /// Creates an initialized storage around an existing backend.
    ///
    /// The provider section of `config` is not used to build anything.
    pub fn with_backend(
        bucket: impl Into<String>,
        config: StorageConfig,
        backend: impl ObjectBackend,
    ) -> Self {
        let backend: Arc<dyn ObjectBackend> = Arc::new(backend);
        Self {
            bucket: bucket.into(),
            config,
            backend: OnceCell::new_with(Some(backend)),
        }
    }

    /// Returns the bucket name.
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the storage configuration.
    #[inline]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Returns whether a backend has been installed.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.backend.initialized()
    }

    /// Returns the installed backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init).
    pub fn backend(&self) -> Result<&Arc<dyn ObjectBackend>> {
        self.backend.get().ok_or(Error::NotInitialized)
    }

    /// Builds the provider client from the stored configuration.
    ///
    /// Calling `init` on an initialized storage is a no-op. Concurrent
    /// first calls build the client once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if validation or client construction fails.
    /// The storage stays uninitialized and `init` may be called again.
    #[instrument(
        skip(self),
        target = TRACING_TARGET_STORAGE,
        fields(bucket = %self.bucket, provider = self.config.provider.id())
    )]
    pub async fn init(&self) -> Result<()> {
        if self.is_initialized() {
            debug!(target: TRACING_TARGET_STORAGE, "storage already initialized");
            return Ok(());
        }

        self.backend
            .get_or_try_init(|| async {
                self.config.validate()?;
                let client = self.config.provider.connect(&self.bucket).await?;
                info!(
                    target: TRACING_TARGET_STORAGE,
                    classify_content_type = self.config.classify_content_type,
                    probe_existence = self.config.probe_existence,
                    allow_remove = self.config.allow_remove,
                    "storage initialized"
                );
                Ok::<_, Error>(Arc::new(client) as Arc<dyn ObjectBackend>)
            })
            .await
            .inspect_err(|e| {
                warn!(target: TRACING_TARGET_STORAGE, error = %e, "storage initialization failed");
            })?;

        Ok(())
    }

    /// Uploads `payload` under `key`, overwriting any existing object.
    ///
    /// With content-type classification enabled, the payload's leading bytes
    /// decide the object's content type and unrecognized payloads are
    /// rejected before any network call.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before [`init`](Self::init).
    /// - [`Error::Validation`] for an empty key, or for an empty or
    ///   unrecognized payload when classification is enabled.
    /// - [`Error::Transport`] if the upload fails.
    #[instrument(
        skip(self, payload),
        target = TRACING_TARGET_STORAGE,
        fields(bucket = %self.bucket, size, content_type)
    )]
    pub async fn write(&self, key: &str, payload: impl Into<Bytes>) -> Result<()> {
        let payload = payload.into();
        let span = tracing::Span::current();
        span.record("size", payload.len());

        let backend = self.backend()?;
        validate_key(key)?;

        let content_type = if self.config.classify_content_type {
            let file_type = content::detect(&payload)?;
            if !file_type.is_known() {
                debug!(target: TRACING_TARGET_STORAGE, "rejecting unclassified payload");
                return Err(Error::validation("unknown file type"));
            }
            debug!(
                target: TRACING_TARGET_STORAGE,
                file_type = %file_type,
                extension = file_type.extension(),
                "payload classified"
            );
            span.record("content_type", file_type.mime());
            Some(file_type.mime())
        } else {
            None
        };

        let output = backend.put(key, payload, content_type).await?;
        debug!(
            target: TRACING_TARGET_STORAGE,
            e_tag = output.e_tag.as_deref(),
            version = output.version.as_deref(),
            "object written"
        );
        Ok(())
    }

    /// Downloads the full payload stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before [`init`](Self::init).
    /// - [`Error::Validation`] for an empty key.
    /// - [`Error::Transport`] if the download fails, including a missing key.
    #[instrument(skip(self), target = TRACING_TARGET_STORAGE, fields(bucket = %self.bucket))]
    pub async fn read(&self, key: &str) -> Result<Bytes> {
        let backend = self.backend()?;
        validate_key(key)?;

        let output = backend.get(key).await?;
        debug!(
            target: TRACING_TARGET_STORAGE,
            size = output.data.len(),
            content_type = output.content_type.as_deref(),
            "object read"
        );
        Ok(output.data)
    }

    /// Reports whether an object exists under `key`, using a metadata-only
    /// request.
    ///
    /// A missing object is `Ok(false)`, never an error.
    ///
    /// # Errors
    ///
    /// - [`Error::NotImplemented`] when existence probes are disabled.
    /// - [`Error::NotInitialized`] before [`init`](Self::init).
    /// - [`Error::Validation`] for an empty key.
    /// - [`Error::Transport`] for any provider failure other than not-found.
    #[instrument(skip(self), target = TRACING_TARGET_STORAGE, fields(bucket = %self.bucket))]
    pub async fn exists(&self, key: &str) -> Result<bool> {
        if !self.config.probe_existence {
            return Err(Error::NotImplemented {
                operation: "exists",
            });
        }

        let backend = self.backend()?;
        validate_key(key)?;

        match backend.head(key).await {
            Ok(_) => Ok(true),
            Err(e) if backend.is_not_found(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Deletes the object stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotImplemented`] unless removal is enabled in the
    ///   configuration; nothing is deleted in that case.
    /// - [`Error::NotInitialized`] before [`init`](Self::init).
    /// - [`Error::Validation`] for an empty key.
    /// - [`Error::Transport`] if the delete fails.
    #[instrument(skip(self), target = TRACING_TARGET_STORAGE, fields(bucket = %self.bucket))]
    pub async fn remove(&self, key: &str) -> Result<()> {
        if !self.config.allow_remove {
            return Err(Error::NotImplemented {
                operation: "remove",
            });
        }

        let backend = self.backend()?;
        validate_key(key)?;

        backend.delete(key).await?;
        info!(target: TRACING_TARGET_STORAGE, "object removed");
        Ok(())
    }
}

impl fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStorage")
            .field("bucket", &self.bucket)
            .field("provider", &self.config.provider.id())
            .field("classify_content_type", &self.config.classify_content_type)
            .field("probe_existence", &self.config.probe_existence)
            .field("allow_remove", &self.config.allow_remove)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::validation("object key cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectStoreClient;
    use crate::providers::{AzureCredentials, S3Credentials};
    use crate::testing::{FailingBackend, RecordingBackend, png_payload};
    use crate::{GetOutput, ProviderConfig};

    async fn memory_storage(config: StorageConfig) -> ObjectStorage {
        ObjectStorage::connect("test-bucket", config).await.unwrap()
    }

    fn recording_storage(config: StorageConfig) -> (ObjectStorage, RecordingBackend) {
        let backend = RecordingBackend::default();
        let storage = ObjectStorage::with_backend("test-bucket", config, backend.clone());
        (storage, backend)
    }

    #[tokio::test]
    async fn operations_before_init_fail() {
        let storage = ObjectStorage::new("test-bucket", StorageConfig::memory());
        assert!(!storage.is_initialized());

        let err = storage.write("a.png", png_payload()).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
        assert!(matches!(
            storage.read("a.png").await.unwrap_err(),
            Error::NotInitialized
        ));
        assert!(matches!(
            storage.exists("a.png").await.unwrap_err(),
            Error::NotInitialized
        ));
        assert!(matches!(storage.backend().unwrap_err(), Error::NotInitialized));
    }

    #[tokio::test]
    async fn init_enables_operations() {
        let storage = ObjectStorage::new("test-bucket", StorageConfig::memory());
        storage.init().await.unwrap();
        assert!(storage.is_initialized());

        storage.write("a.png", png_payload()).await.unwrap();
        assert!(storage.exists("a.png").await.unwrap());
        assert_eq!(storage.read("a.png").await.unwrap(), png_payload());
    }

    #[tokio::test]
    async fn second_init_keeps_backend() {
        let storage = memory_storage(StorageConfig::memory()).await;
        storage.write("a.png", png_payload()).await.unwrap();

        storage.init().await.unwrap();
        assert!(storage.exists("a.png").await.unwrap());
    }

    #[tokio::test]
    async fn init_with_invalid_config_fails_and_can_retry() {
        let config = StorageConfig::new(ProviderConfig::Azure(AzureCredentials::default()));
        let storage = ObjectStorage::new("test-bucket", config);

        let err = storage.init().await.unwrap_err();
        assert!(err.is_config_error());
        assert!(!storage.is_initialized());
        assert!(storage.init().await.is_err());
    }

    #[tokio::test]
    async fn init_with_bad_endpoint_fails() {
        let config = StorageConfig::new(ProviderConfig::S3(S3Credentials {
            endpoint: Some("not a url".to_string()),
            ..S3Credentials::default()
        }));
        let err = ObjectStorage::connect("test-bucket", config)
            .await
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn write_rejects_unknown_payload_without_network() {
        let (storage, backend) = recording_storage(StorageConfig::memory());

        let err = storage
            .write("notes.txt", Bytes::from_static(b"just some text"))
            .await
            .unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(err.to_string(), "invalid request: unknown file type");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn write_rejects_empty_payload_without_network() {
        let (storage, backend) = recording_storage(StorageConfig::memory());

        let err = storage.write("empty", Bytes::new()).await.unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn write_rejects_empty_key_without_network() {
        let (storage, backend) = recording_storage(StorageConfig::memory());

        let err = storage.write("", png_payload()).await.unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn write_records_detected_content_type() {
        let (storage, backend) = recording_storage(StorageConfig::memory());

        storage.write("images/a.png", png_payload()).await.unwrap();
        assert_eq!(backend.calls(), 1);

        let GetOutput {
            data, content_type, ..
        } = backend.get("images/a.png").await.unwrap();
        assert_eq!(data, png_payload());
        assert_eq!(content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn write_without_classification_accepts_anything() {
        let (storage, backend) =
            recording_storage(StorageConfig::memory().with_classify_content_type(false));

        storage
            .write("notes.txt", Bytes::from_static(b"just some text"))
            .await
            .unwrap();

        let output = backend.get("notes.txt").await.unwrap();
        assert_eq!(output.data, Bytes::from_static(b"just some text"));
        assert!(output.content_type.is_none());
    }

    #[tokio::test]
    async fn write_overwrites_existing_object() {
        let storage = memory_storage(StorageConfig::memory()).await;
        storage.write("doc", b"%PDF-1.4 first".to_vec()).await.unwrap();
        storage.write("doc", b"%PDF-1.7 second".to_vec()).await.unwrap();

        assert_eq!(
            storage.read("doc").await.unwrap(),
            Bytes::from_static(b"%PDF-1.7 second")
        );
    }

    #[tokio::test]
    async fn write_propagates_transport_errors() {
        let storage =
            ObjectStorage::with_backend("test-bucket", StorageConfig::memory(), FailingBackend);

        let err = storage.write("a.png", png_payload()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn read_returns_written_bytes() {
        let storage = memory_storage(StorageConfig::memory()).await;
        let payload = png_payload();

        storage.write("images/a.png", payload.clone()).await.unwrap();
        let data = storage.read("images/a.png").await.unwrap();
        assert!(!data.is_empty());
        assert_eq!(data, payload);
    }

    #[tokio::test]
    async fn read_missing_key_is_transport_not_found() {
        let storage = memory_storage(StorageConfig::memory()).await;

        let err = storage.read("missing.png").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn exists_reports_presence() {
        let storage = memory_storage(StorageConfig::memory()).await;
        assert!(!storage.exists("images/a.png").await.unwrap());

        storage.write("images/a.png", png_payload()).await.unwrap();
        assert!(storage.exists("images/a.png").await.unwrap());
    }

    #[tokio::test]
    async fn exists_propagates_other_errors() {
        let storage =
            ObjectStorage::with_backend("test-bucket", StorageConfig::memory(), FailingBackend);

        let err = storage.exists("a.png").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn exists_disabled_does_not_probe() {
        let (storage, backend) =
            recording_storage(StorageConfig::memory().with_probe_existence(false));

        let err = storage.exists("a.png").await.unwrap_err();
        assert!(matches!(err, Error::NotImplemented { operation: "exists" }));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn remove_is_not_implemented_by_default() {
        let (storage, backend) = recording_storage(StorageConfig::memory());
        storage.write("images/a.png", png_payload()).await.unwrap();

        let err = storage.remove("images/a.png").await.unwrap_err();
        assert!(err.is_not_implemented());
        assert_eq!(backend.calls(), 1);
        assert!(storage.exists("images/a.png").await.unwrap());
    }

    #[tokio::test]
    async fn remove_deletes_when_allowed() {
        let storage = memory_storage(StorageConfig::memory().with_allow_remove(true)).await;
        storage.write("images/a.png", png_payload()).await.unwrap();

        storage.remove("images/a.png").await.unwrap();
        assert!(!storage.exists("images/a.png").await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_accessors_do_not_block() {
        let storage = Arc::new(memory_storage(StorageConfig::memory()).await);

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let storage = Arc::clone(&storage);
                tokio::spawn(async move {
                    for _ in 0..100 {
                        assert_eq!(storage.bucket(), "test-bucket");
                        assert_eq!(storage.config().provider.id(), "memory");
                        assert!(storage.is_initialized());
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_init_installs_one_backend() {
        let storage = Arc::new(ObjectStorage::new("test-bucket", StorageConfig::memory()));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let storage = Arc::clone(&storage);
                tokio::spawn(async move { storage.init().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        storage.write("a.png", png_payload()).await.unwrap();
        storage.init().await.unwrap();
        assert!(storage.exists("a.png").await.unwrap());
    }

    #[tokio::test]
    async fn example_scenario() {
        let client = ObjectStoreClient::new(object_store::memory::InMemory::new());
        let storage =
            ObjectStorage::with_backend("test-bucket", StorageConfig::memory(), client.clone());
        let payload = png_payload();

        storage.write("images/a.png", payload.clone()).await.unwrap();
        let stored = client.get("images/a.png").await.unwrap();
        assert_eq!(stored.content_type.as_deref(), Some("image/png"));

        assert!(storage.exists("images/a.png").await.unwrap());
        assert_eq!(storage.read("images/a.png").await.unwrap(), payload);
        assert!(storage.remove("images/a.png").await.unwrap_err().is_not_implemented());
    }

    #[test]
    fn debug_hides_credentials() {
        let config = StorageConfig::new(ProviderConfig::S3(S3Credentials {
            secret_access_key: Some("super-secret".to_string()),
            ..S3Credentials::default()
        }));
        let storage = ObjectStorage::new("test-bucket", config);
        let debug = format!("{storage:?}");
        assert!(debug.contains("test-bucket"));
        assert!(!debug.contains("super-secret"));
    }
}
