//! RTSP session client

use crate::config::SessionConfig;
use crate::error::Result;
use crate::net::{TcpTransport, Transport};
use crate::protocol::rtsp::{Method, headers::names};

/// Session-oriented RTSP client
///
/// Owns the configuration, the transport connection, and the session state
/// (connected flag plus the server-assigned session identifier). Every verb
/// funnels through one request routine that applies uniform status
/// validation; only a status of exactly 200 counts as success, and callers
/// that expect e.g. a 405 inspect [`request_status`](Self::request_status)
/// after a `false` return.
///
/// Dropping a still-connected client spawns one best-effort TEARDOWN on the
/// current tokio runtime; its outcome is swallowed.
pub struct RtspClient<T: Transport = TcpTransport> {
    config: SessionConfig,
    // Some until drop takes it for the final teardown attempt.
    transport: Option<T>,
    connected: bool,
    session_id: Option<String>,
    last_status: Option<u16>,
}

impl RtspClient<TcpTransport> {
    /// Create a client over TCP from a configuration
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let transport = TcpTransport::new().with_connect_timeout(config.connect_timeout);
        Self::with_transport(config, transport)
    }

    /// Create a client from an `rtsp://host[:port]/path` URI
    ///
    /// # Errors
    /// Returns `RtspError::InvalidUri` when the URI cannot be parsed.
    pub fn from_uri(uri: &str) -> Result<Self> {
        Ok(Self::new(SessionConfig::from_uri(uri)?))
    }
}

impl<T: Transport> RtspClient<T> {
    /// Create a client over a caller-supplied transport
    pub fn with_transport(config: SessionConfig, transport: T) -> Self {
        Self {
            config,
            transport: Some(transport),
            connected: false,
            session_id: None,
            last_status: None,
        }
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Mutable configuration access (e.g. to change `media_path` between
    /// requests)
    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    /// Whether a session is currently established
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Server-assigned session identifier, if established
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Status code of the most recently executed request
    ///
    /// Lets callers distinguish an acceptable 405 from a real failure after
    /// a verb returns `false`.
    #[must_use]
    pub fn request_status(&self) -> Option<u16> {
        self.last_status
    }

    fn transport(&self) -> &T {
        self.transport.as_ref().expect("transport present until drop")
    }

    fn transport_mut(&mut self) -> &mut T {
        self.transport.as_mut().expect("transport present until drop")
    }

    /// Establish the connection and set up the session
    ///
    /// Connects the transport, then issues SETUP with the configured
    /// Transport header. Returns `Ok(true)` when the server answers 200 and
    /// assigns a session identifier; the identifier is attached as a
    /// `Session` header to every subsequent request. A 200 without a session
    /// identifier closes the connection and returns `Ok(false)`, as does any
    /// non-200 status.
    ///
    /// # Errors
    /// Propagates transport connection errors.
    pub async fn open(&mut self) -> Result<bool> {
        // A fresh SETUP invalidates whatever session came before it.
        self.session_id = None;

        let host = self.config.address.clone();
        let port = self.config.port;
        let transport_header = format!(
            "{};client_port={}",
            self.config.transport_protocol, self.config.client_port_range
        );

        let transport = self.transport_mut();
        transport.open(&host, port).await?;
        transport.set_request_header(names::TRANSPORT, &transport_header);

        if !self.request(Method::Setup).await? {
            self.connected = false;
            return Ok(false);
        }

        let session_id = self
            .transport()
            .response_headers()
            .and_then(|headers| headers.session())
            // Servers may append parameters, e.g. "ABC123;timeout=60".
            .map(|raw| raw.split(';').next().unwrap_or(raw).trim().to_string())
            .filter(|id| !id.is_empty());

        match session_id {
            Some(id) => {
                self.transport_mut().set_request_header(names::SESSION, &id);
                tracing::debug!(session_id = %id, "session established");
                self.session_id = Some(id);
                self.connected = true;
                Ok(true)
            }
            None => {
                // A 200 without a session identifier leaves nothing to
                // address later requests to; drop the connection.
                tracing::debug!("SETUP succeeded without a Session header");
                self.transport_mut().close();
                self.connected = false;
                Ok(false)
            }
        }
    }

    /// Start or resume media delivery
    ///
    /// Per protocol semantics PLAY may resume from a PAUSE point; the client
    /// itself only reports the status outcome.
    ///
    /// # Errors
    /// Propagates transport send failures.
    pub async fn play(&mut self) -> Result<bool> {
        if !self.connected {
            return Ok(false);
        }
        self.request(Method::Play).await
    }

    /// Halt delivery without ending the session
    ///
    /// A 405 from servers that do not support PAUSE is an expected outcome;
    /// check [`request_status`](Self::request_status) after a `false` return.
    ///
    /// # Errors
    /// Propagates transport send failures.
    pub async fn pause(&mut self) -> Result<bool> {
        if !self.connected {
            return Ok(false);
        }
        self.request(Method::Pause).await
    }

    /// Direct the server to persist an inbound stream
    ///
    /// # Errors
    /// Propagates transport send failures.
    pub async fn record(&mut self) -> Result<bool> {
        if !self.connected {
            return Ok(false);
        }
        self.request(Method::Record).await
    }

    /// End the session
    ///
    /// The client flips to disconnected *before* the request is confirmed;
    /// teardown is fire-and-forget and never retried, so a failed TEARDOWN
    /// still leaves the client logically disconnected.
    ///
    /// # Errors
    /// Propagates transport send failures (the client is disconnected
    /// regardless).
    pub async fn teardown(&mut self) -> Result<bool> {
        if !self.connected {
            return Ok(false);
        }
        self.connected = false;
        self.request(Method::Teardown).await
    }

    /// Query the methods the server supports
    ///
    /// # Errors
    /// Propagates transport send failures.
    pub async fn options(&mut self) -> Result<bool> {
        if !self.connected {
            return Ok(false);
        }
        self.request(Method::Options).await
    }

    /// OPTIONS, returning the ordered `Public` method tokens
    ///
    /// `None` when the request failed or the header is absent.
    ///
    /// # Errors
    /// Propagates transport send failures.
    pub async fn options_public(&mut self) -> Result<Option<Vec<String>>> {
        if !self.options().await? {
            return Ok(None);
        }

        let tokens = self
            .transport()
            .response_headers()
            .map(|headers| headers.token_list(names::PUBLIC))
            .unwrap_or_default();

        if tokens.is_empty() {
            Ok(None)
        } else {
            Ok(Some(tokens))
        }
    }

    /// Retrieve the media description
    ///
    /// Returns the raw response body (expected to be SDP text) unparsed, or
    /// `None` when unconnected or the request failed.
    ///
    /// # Errors
    /// Propagates transport send failures.
    pub async fn describe(&mut self) -> Result<Option<String>> {
        if !self.connected {
            return Ok(None);
        }
        if !self.request(Method::Describe).await? {
            return Ok(None);
        }

        let body = self.transport().response_body();
        Ok(Some(String::from_utf8_lossy(body).into_owned()))
    }

    /// Shared request routine used by every verb
    ///
    /// Recomputes the URI from live configuration, delegates to the
    /// transport, records the status, and treats anything other than exactly
    /// 200 as failure.
    async fn request(&mut self, method: Method) -> Result<bool> {
        let uri = self.config.request_uri();
        let debug = self.config.debug;
        let print_headers = self.config.print_headers;

        let transport = self.transport_mut();
        transport.send_request(method, &uri).await?;

        let status = transport.status_code();
        if debug {
            tracing::debug!(
                method = method.as_str(),
                status = status.unwrap_or(0),
                message = transport.status_message().unwrap_or(""),
                "response received"
            );
        }
        if print_headers {
            if let Some(headers) = transport.response_headers() {
                for (name, value) in headers.iter() {
                    tracing::debug!(%name, %value, "response header");
                }
            }
            let body = transport.response_body();
            if !body.is_empty() {
                tracing::debug!(body = %String::from_utf8_lossy(body), "response body");
            }
        }

        self.last_status = status;
        Ok(status == Some(200))
    }
}

impl<T: Transport> Drop for RtspClient<T> {
    fn drop(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;

        let Some(mut transport) = self.transport.take() else {
            return;
        };
        let uri = self.config.request_uri();

        // Best-effort server-side cleanup; drop must never propagate a
        // failure, and without a runtime there is nothing to run on.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let _ = transport.send_request(Method::Teardown, &uri).await;
                });
            }
            Err(_) => {
                tracing::debug!("client dropped while connected outside a runtime");
            }
        }
    }
}
