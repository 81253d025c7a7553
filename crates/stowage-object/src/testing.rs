//! Backend doubles shared by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use object_store::ObjectMeta;
use object_store::memory::InMemory;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::client::{GetOutput, ObjectBackend, ObjectStoreClient, PutOutput};
use crate::{Error, Result};

/// An eight-byte PNG signature followed by padding.
pub fn png_payload() -> Bytes {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0u8; 24]);
    Bytes::from(data)
}

/// In-memory backend that counts every call it receives.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    inner: ObjectStoreClient,
    calls: Arc<AtomicUsize>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            inner: ObjectStoreClient::new(InMemory::new()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl RecordingBackend {
    /// Number of backend calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl ObjectBackend for RecordingBackend {
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<PutOutput> {
        self.record();
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, key: &str) -> Result<GetOutput> {
        self.record();
        self.inner.get(key).await
    }

    async fn head(&self, key: &str) -> Result<ObjectMeta> {
        self.record();
        self.inner.head(key).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.record();
        self.inner.delete(key).await
    }
}

/// Backend whose every call fails with a connection-level error.
#[derive(Debug, Clone, Copy)]
pub struct FailingBackend;

fn connection_reset() -> Error {
    Error::Transport(object_store::Error::Generic {
        store: "failing",
        source: "connection reset by peer".into(),
    })
}

#[async_trait::async_trait]
impl ObjectBackend for FailingBackend {
    async fn put(&self, _key: &str, _data: Bytes, _ct: Option<&str>) -> Result<PutOutput> {
        Err(connection_reset())
    }

    async fn get(&self, _key: &str) -> Result<GetOutput> {
        Err(connection_reset())
    }

    async fn head(&self, _key: &str) -> Result<ObjectMeta> {
        Err(connection_reset())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(connection_reset())
    }
}

/// Listens on a local port for a single HTTP request and answers `404`.
///
/// Returns the `http://` endpoint and a handle resolving to the request line.
pub async fn serve_once() -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request: Vec<u8> = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        socket
            .write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        let _ = socket.shutdown().await;

        let request = String::from_utf8_lossy(&request);
        request.lines().next().unwrap_or_default().to_string()
    });

    (endpoint, handle)
}
