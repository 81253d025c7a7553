//! Result type for [`ObjectBackend::get`](super::ObjectBackend::get).

use bytes::Bytes;
use object_store::ObjectMeta;

/// A downloaded object.
#[derive(Debug)]
pub struct GetOutput {
    /// Full body of the object.
    pub data: Bytes,
    /// MIME content-type recorded at upload time, if any.
    pub content_type: Option<String>,
    /// Object metadata (size, etag, last_modified, location).
    pub meta: ObjectMeta,
}
