//! Session configuration

use std::time::Duration;

use crate::error::RtspError;

/// Default RTSP port
pub const DEFAULT_PORT: u16 = 554;

const DEFAULT_MEDIA_PATH: &str = "/";
const DEFAULT_TRANSPORT_PROTOCOL: &str = "RTP/AVP;unicast";
const DEFAULT_CLIENT_PORT_RANGE: &str = "6970-6971";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for an RTSP session
///
/// Fields may be changed between requests; the request URI is recomputed
/// from the live values on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Server host (required)
    pub address: String,

    /// Server port (default: 554)
    pub port: u16,

    /// Path component of the media resource (default: "/")
    pub media_path: String,

    /// Value sent in the Transport header at SETUP (default: "RTP/AVP;unicast")
    pub transport_protocol: String,

    /// Client-side RTP/RTCP port pair advertised to the server
    /// (default: "6970-6971")
    pub client_port_range: String,

    /// Log response headers and bodies (diagnostic only)
    pub print_headers: bool,

    /// Log per-request status codes (diagnostic only)
    pub debug: bool,

    /// Timeout for connection attempts (default: 10 seconds)
    pub connect_timeout: Duration,
}

impl SessionConfig {
    /// Create a configuration with defaults for the given server host
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: DEFAULT_PORT,
            media_path: DEFAULT_MEDIA_PATH.to_string(),
            transport_protocol: DEFAULT_TRANSPORT_PROTOCOL.to_string(),
            client_port_range: DEFAULT_CLIENT_PORT_RANGE.to_string(),
            print_headers: false,
            debug: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Create a config builder
    pub fn builder(address: impl Into<String>) -> SessionConfigBuilder {
        SessionConfigBuilder {
            config: Self::new(address),
        }
    }

    /// Parse an `rtsp://host[:port]/path` URI into a configuration
    ///
    /// The port defaults to 554; the `/`-prefixed path is mandatory and
    /// captured verbatim (including the slash).
    ///
    /// # Errors
    /// Returns `RtspError::InvalidUri` when the scheme, host, port, or path
    /// cannot be extracted.
    pub fn from_uri(uri: &str) -> Result<Self, RtspError> {
        let invalid = |reason: &str| RtspError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let rest = uri
            .strip_prefix("rtsp://")
            .ok_or_else(|| invalid("missing rtsp:// scheme"))?;

        let path_start = rest.find('/').ok_or_else(|| invalid("missing media path"))?;
        let (authority, path) = rest.split_at(path_start);

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| invalid("invalid port number"))?;
                (host, port)
            }
            None => (authority, DEFAULT_PORT),
        };

        if host.is_empty()
            || !host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(invalid("invalid host"));
        }

        let mut config = Self::new(host);
        config.port = port;
        config.media_path = path.to_string();
        Ok(config)
    }

    /// Derive the request URI from the current configuration
    ///
    /// Recomputed on every call so that field changes between requests take
    /// effect immediately.
    #[must_use]
    pub fn request_uri(&self) -> String {
        format!("rtsp://{}:{}{}", self.address, self.port, self.media_path)
    }
}

/// Builder for [`SessionConfig`]
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set the server port
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the media resource path
    #[must_use]
    pub fn media_path(mut self, path: impl Into<String>) -> Self {
        self.config.media_path = path.into();
        self
    }

    /// Set the Transport header protocol value
    #[must_use]
    pub fn transport_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.config.transport_protocol = protocol.into();
        self
    }

    /// Set the advertised client port range
    #[must_use]
    pub fn client_port_range(mut self, range: impl Into<String>) -> Self {
        self.config.client_port_range = range.into();
        self
    }

    /// Enable response header/body logging
    #[must_use]
    pub fn print_headers(mut self, enable: bool) -> Self {
        self.config.print_headers = enable;
        self
    }

    /// Enable per-request status logging
    #[must_use]
    pub fn debug(mut self, enable: bool) -> Self {
        self.config.debug = enable;
        self
    }

    /// Set the connect timeout
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> SessionConfig {
        self.config
    }
}
