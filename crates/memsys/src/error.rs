//! Error types for memsys.

use thiserror::Error;

/// Failure talking to memsys-server.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server's guard sent us elsewhere (`303 See Other`)
    #[error("Redirected to {0}")]
    Redirect(String),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}
