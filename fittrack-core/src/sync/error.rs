//! Remote backend error types.

use thiserror::Error;

/// Errors returned by a [`RemoteBackend`](super::RemoteBackend).
///
/// These never escape the sync engine; they are logged and turned into a
/// failed [`SyncResult`](super::SyncResult).
#[derive(Error, Debug)]
pub enum RemoteError {
    /// No signed-in user
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Request could not be sent or the connection dropped
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status
    #[error("Server returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// A queued or outgoing change could not be read back as its payload
    #[error("Invalid change payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Network(e.to_string())
        }
    }
}
