//! Error types for the Icinga 2 API client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid arguments or client settings, detected before any request is sent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Config file missing, unreadable or malformed
    #[error("config file error: {0}")]
    ConfigFile(String),

    #[error("Icinga 2 object type \"{0}\" does not exist.")]
    UnknownObjectType(String),

    /// Failure to establish or keep the HTTP connection
    #[error("connection error: {0}")]
    Connection(String),

    /// The server answered with a non-2xx status
    #[error("Request \"{url}\" failed with status {status}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("timed out: {0}")]
    Timeout(String),

    /// A complete stream record was not valid JSON
    #[error("failed to parse event record: {source} (record: {record})")]
    RecordParse {
        #[source]
        source: serde_json::Error,
        record: String,
    },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Whether this error came from the transport rather than from the caller or the payload
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ApiError::Connection(_) | ApiError::Http { .. } | ApiError::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::Connection(format!("invalid response body: {err}"))
        } else {
            ApiError::Connection(err.to_string())
        }
    }
}
