//! Error types for the request executor.
//!
//! # Design
//! Every failure crosses the executor boundary as one `ApiError`. Callers that
//! need to branch on the remote outcome (not found vs. server error) read the
//! status code from `Api`; the executor itself never special-cases a code.

use thiserror::Error;

/// Boxed cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `RequestExecutor` and the services built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status other than 200 or 201. The raw
    /// response body is kept as the message.
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    /// The call was malformed before anything reached the network.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed URL or I/O failure while talking to the server.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// A success body could not be parsed into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ApiError::Transport(err.into())
    }

    /// HTTP status carried by an `Api` error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
