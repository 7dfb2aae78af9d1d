use showcase_core::error::CoreError;

/// Errors raised while re-encoding or storing an asset.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Could not decode source image: {0}")]
    Decode(String),

    #[error("Could not encode delivery image: {0}")]
    Encode(String),

    #[error("Delivery format '{format}' is not available for category '{category}'")]
    UnsupportedFormat { category: String, format: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Media API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The media API answered with a non-2xx status.
    #[error("Media API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Media API returned an unexpected payload: {0}")]
    InvalidResponse(String),

    #[error("Object storage error: {0}")]
    Storage(String),
}

impl PublishError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_failed",
            Self::Encode(_) => "encode_failed",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Io(_) => "io_error",
            Self::Request(_) => "media_store_unreachable",
            Self::Api { .. } => "media_store_error",
            Self::InvalidResponse(_) => "media_store_invalid_response",
            Self::Storage(_) => "object_storage_error",
        }
    }

    /// Failures of the remote store rather than of the asset or this host.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::Api { .. } | Self::InvalidResponse(_) | Self::Storage(_)
        )
    }
}

impl From<PublishError> for CoreError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::Decode(_) | PublishError::UnsupportedFormat { .. } => {
                CoreError::Validation(err.to_string())
            }
            ref e if e.is_upstream() => CoreError::Upstream(e.to_string()),
            other => CoreError::Internal(other.to_string()),
        }
    }
}
