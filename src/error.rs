use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::protocol::rtsp::RtspCodecError;

/// Errors that can occur during RTSP client operations
#[derive(Debug, Error)]
pub enum RtspError {
    // ===== Connection Errors =====
    /// Failed to establish connection to the server
    #[error("connection failed to {host}:{port}: {message}")]
    ConnectionFailed {
        /// Server host the connection was attempted against
        host: String,
        /// Server port
        port: u16,
        /// Description of the failure
        message: String,
        /// The underlying source of the error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Connection attempt timed out
    #[error("connection timeout after {duration:?}")]
    ConnectionTimeout {
        /// The duration of the timeout
        duration: Duration,
    },

    /// Connection was closed while a response was outstanding
    #[error("server disconnected")]
    Disconnected,

    /// A request was attempted without an open connection
    #[error("transport not connected")]
    NotConnected,

    // ===== Protocol Errors =====
    /// Malformed response from the server
    #[error("codec error: {0}")]
    Codec(#[from] RtspCodecError),

    /// RTSP URI could not be parsed
    #[error("invalid RTSP URI {uri:?}: {reason}")]
    InvalidUri {
        /// The URI that failed to parse
        uri: String,
        /// Reason why it is invalid
        reason: String,
    },

    // ===== I/O Errors =====
    /// Network I/O error
    #[error("network error: {0}")]
    Network(#[from] io::Error),
}

impl RtspError {
    /// Check if this error indicates the connection is gone
    #[must_use]
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::ConnectionTimeout { .. }
                | Self::Disconnected
                | Self::Network(_)
        )
    }
}

/// Result type alias for RTSP client operations
pub type Result<T> = std::result::Result<T, RtspError>;
