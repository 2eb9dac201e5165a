use thiserror::Error;

/// Errors from the remote data providers.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Could not reach the provider at all.
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    /// Provider answered with a non-2xx status.
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Classify a transport error the same way for every provider.
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else {
            FetchError::Http(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
