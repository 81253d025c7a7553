//! Error type for object storage operations.

/// Specialized [`Result`] type for storage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for [`ObjectStorage`](crate::ObjectStorage) operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// The provider client could not be constructed.
    ///
    /// Raised for bad credentials, an unknown region, malformed endpoints
    /// or any other builder failure.
    #[error("configuration error: {message}")]
    Config {
        /// What went wrong.
        message: String,
        /// Builder error reported by the provider, if any.
        #[source]
        source: Option<object_store::Error>,
    },

    /// The request was rejected before reaching the network.
    ///
    /// This covers empty or malformed keys and payloads whose content type
    /// cannot be classified.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The provider failed to serve an upload, download, probe or delete.
    #[error("transport error: {0}")]
    Transport(#[from] object_store::Error),

    /// The operation is disabled for this storage.
    #[error("{operation} is not supported")]
    NotImplemented {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// An operation was issued before [`init`](crate::ObjectStorage::init).
    #[error("storage is not initialized")]
    NotInitialized,

    /// A configuration document could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a configuration error without an underlying cause.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns whether this error indicates a configuration issue.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Serialization(_))
    }

    /// Returns whether the request was rejected before any network call.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns whether the provider reported a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Transport(object_store::Error::NotFound { .. }))
    }

    /// Returns whether the operation is disabled.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }

    /// Returns whether the caller may reasonably retry the operation.
    ///
    /// Only transport errors qualify, and only those that are not a
    /// definitive answer from the provider.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => !matches!(
                err,
                object_store::Error::NotFound { .. }
                    | object_store::Error::PermissionDenied { .. }
                    | object_store::Error::Unauthenticated { .. }
                    | object_store::Error::AlreadyExists { .. }
                    | object_store::Error::Precondition { .. }
                    | object_store::Error::NotSupported { .. }
                    | object_store::Error::NotImplemented
                    | object_store::Error::InvalidPath { .. }
                    | object_store::Error::UnknownConfigurationKey { .. }
            ),
            _ => false,
        }
    }
}

impl From<object_store::path::Error> for Error {
    fn from(err: object_store::path::Error) -> Self {
        Self::Validation(format!("invalid object key: {err}"))
    }
}
