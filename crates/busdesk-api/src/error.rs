use thiserror::Error;

/// Errors returned by the busdesk REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status or an envelope with `"success": false`.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON encoding error for {context}: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("profile cache error at {path}: {source}")]
    Cache {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Message suitable for a toast: API messages verbatim, transport
    /// failures summarized.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Http(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            ApiError::Http(e) if e.is_connect() => "Unable to reach the server".to_string(),
            ApiError::Http(_) | ApiError::Deserialize { .. } | ApiError::Encode { .. } => {
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for busdesk_wizard::SyncError {
    fn from(err: ApiError) -> Self {
        busdesk_wizard::SyncError::new(err.user_message())
    }
}
