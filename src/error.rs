//! Error types shared by the HTTP layer and the durable store

use thiserror::Error;

/// Anything that can go wrong during a backend round trip
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, broken stream...
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the body text, or a generic
    /// fallback when the body was empty.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The endpoint answered 204 where a body was expected
    #[error("Empty response from {path}")]
    EmptyBody { path: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Failures of the durable key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt storage file: {0}")]
    Format(#[from] serde_yaml::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Errors surfaced by the session store
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Api(e) if e.is_unauthorized())
    }
}
