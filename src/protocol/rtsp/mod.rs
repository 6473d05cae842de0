//! Sans-IO RTSP message types and framing

/// Incremental response parsing
pub mod codec;
/// Header collection and well-known names
pub mod headers;
/// Request messages and wire encoding
pub mod request;
/// Response messages and status codes
pub mod response;

pub use codec::{RtspCodec, RtspCodecError};
pub use headers::Headers;
pub use request::{RtspRequest, RtspRequestBuilder};
pub use response::{RtspResponse, StatusCode};

/// RTSP methods used by the session client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Query the methods the server supports
    Options,
    /// Retrieve the media description (SDP)
    Describe,
    /// Set up transport and session
    Setup,
    /// Start or resume delivery
    Play,
    /// Halt delivery without tearing the session down
    Pause,
    /// Direct the server to persist an inbound stream
    Record,
    /// Tear down the session
    Teardown,
}

impl Method {
    /// Wire form of the method (upper-case)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Options => "OPTIONS",
            Method::Describe => "DESCRIBE",
            Method::Setup => "SETUP",
            Method::Play => "PLAY",
            Method::Pause => "PAUSE",
            Method::Record => "RECORD",
            Method::Teardown => "TEARDOWN",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OPTIONS" => Ok(Method::Options),
            "DESCRIBE" => Ok(Method::Describe),
            "SETUP" => Ok(Method::Setup),
            "PLAY" => Ok(Method::Play),
            "PAUSE" => Ok(Method::Pause),
            "RECORD" => Ok(Method::Record),
            "TEARDOWN" => Ok(Method::Teardown),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// A method token the client does not model
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown RTSP method: {0}")]
pub struct UnknownMethod(pub String);
