//! Error types for the sync engine.

use qbitsync_model::ModelError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while polling the remote.
///
/// Applying a decoded message to the store never fails; every variant here
/// comes from reaching, authenticating against or decoding the remote.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// The remote rejected the credentials.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The remote no longer accepts the session cookie.
    #[error("session expired")]
    SessionExpired,

    /// The remote answered with an unexpected HTTP status.
    #[error("unexpected HTTP status {status} from {endpoint}")]
    Http {
        /// Endpoint path.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] ModelError),

    /// Polling was cancelled.
    #[error("poll cancelled")]
    Cancelled,

    /// Invalid state transition.
    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// Not logged in to the remote.
    #[error("not connected to server")]
    NotConnected,

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport { retryable, .. } => *retryable,
            SyncError::SessionExpired => true,
            SyncError::NotConnected => true,
            SyncError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(SyncError::transport_retryable("connection reset").is_retryable());
        assert!(!SyncError::transport_fatal("invalid certificate").is_retryable());
        assert!(SyncError::SessionExpired.is_retryable());
        assert!(!SyncError::AuthenticationFailed("bad password".into()).is_retryable());
        assert!(!SyncError::Cancelled.is_retryable());
    }

    #[test]
    fn http_status_retryability() {
        let server_error = SyncError::Http {
            endpoint: "/api/v2/sync/maindata".into(),
            status: 503,
        };
        assert!(server_error.is_retryable());

        let client_error = SyncError::Http {
            endpoint: "/api/v2/sync/maindata".into(),
            status: 404,
        };
        assert!(!client_error.is_retryable());
        assert!(client_error.to_string().contains("404"));
    }

    #[test]
    fn decode_errors_convert() {
        let err: SyncError = qbitsync_model::MainData::from_json(b"not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, SyncError::Decode(_)));
        assert!(!err.is_retryable());
    }
}
