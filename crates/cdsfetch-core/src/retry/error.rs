//! Transfer error type for retry classification.

use std::fmt;

/// Error from a single CDS API call or result download. Kept as its own type
/// so we can classify and decide retries before converting to anyhow.
#[derive(Debug)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Response body was not the JSON we expected.
    Payload(serde_json::Error),
    /// Writing the result to disk failed (disk full, permissions). Not retried.
    Storage(std::io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Curl(e) => write!(f, "{}", e),
            TransferError::Http(code) => write!(f, "HTTP {}", code),
            TransferError::Payload(e) => write!(f, "unexpected response payload: {}", e),
            TransferError::Storage(e) => write!(f, "storage: {}", e),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Curl(e) => Some(e),
            TransferError::Payload(e) => Some(e),
            TransferError::Storage(e) => Some(e),
            TransferError::Http(_) => None,
        }
    }
}

impl From<curl::Error> for TransferError {
    fn from(e: curl::Error) -> Self {
        TransferError::Curl(e)
    }
}

impl From<std::io::Error> for TransferError {
    fn from(e: std::io::Error) -> Self {
        TransferError::Storage(e)
    }
}
