//! # rtsp-client
//!
//! A session-oriented client for the Real-Time Streaming Protocol (RTSP).
//!
//! The client negotiates a control session against a media server and drives
//! it through the RTSP verbs (SETUP, PLAY, PAUSE, RECORD, DESCRIBE,
//! TEARDOWN, OPTIONS), tracking the server-assigned session identifier
//! across requests. Media transport itself (receiving or decoding RTP
//! packets) is out of scope; only the control channel is handled here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rtsp_client::{RtspClient, SessionConfig};
//!
//! # async fn example() -> Result<(), rtsp_client::RtspError> {
//! let config = SessionConfig::builder("192.168.1.10")
//!     .media_path("/stream")
//!     .build();
//! let mut client = RtspClient::new(config);
//!
//! if client.open().await? {
//!     client.play().await?;
//!     // ... media flows out of band ...
//!     client.teardown().await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`RtspClient`] — the session state machine and verb API
//! - [`Transport`] — narrow contract for the underlying connection, with
//!   [`TcpTransport`] as the production implementation
//! - [`protocol::rtsp`] — message types and wire framing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Session configuration
pub mod config;
/// Error types
pub mod error;
/// Transport layer
pub mod net;
/// Protocol messages and framing
pub mod protocol;

// Internal modules
mod client;

// Re-exports
pub use client::RtspClient;
pub use config::{SessionConfig, SessionConfigBuilder};
pub use error::{Result, RtspError};
pub use net::{TcpTransport, Transport};
pub use protocol::rtsp::Method;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::{Method, Result, RtspClient, RtspError, SessionConfig, Transport};
}
