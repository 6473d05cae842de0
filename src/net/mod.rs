//! Transport layer for RTSP exchanges
//!
//! The session client talks to the network only through the [`Transport`]
//! trait, so tests can substitute a scripted implementation.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{Result, RtspError};
use crate::protocol::rtsp::{Headers, Method, RtspCodec, RtspRequest, RtspResponse};

/// Connection handling and request/response exchange for one RTSP session
///
/// Headers registered with [`set_request_header`](Self::set_request_header)
/// persist across requests until overwritten or until the next
/// [`open`](Self::open). One request is in flight at a time; the most recent
/// response stays readable until the next request completes.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Establish the underlying connection
    async fn open(&mut self, host: &str, port: u16) -> Result<()>;

    /// Drop the underlying connection, if any
    fn close(&mut self);

    /// Register a header to be sent on all subsequent requests
    fn set_request_header(&mut self, name: &str, value: &str);

    /// Serialize and send one request, then read its response
    async fn send_request(&mut self, method: Method, uri: &str) -> Result<()>;

    /// Status code of the most recent response
    fn status_code(&self) -> Option<u16>;

    /// Reason phrase of the most recent response
    fn status_message(&self) -> Option<&str>;

    /// Headers of the most recent response
    fn response_headers(&self) -> Option<&Headers>;

    /// Body of the most recent response (empty before any exchange)
    fn response_body(&self) -> &[u8];
}

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// TCP transport over tokio
pub struct TcpTransport {
    stream: Option<TcpStream>,
    codec: RtspCodec,
    request_headers: Headers,
    last_response: Option<RtspResponse>,
    cseq: u32,
    connect_timeout: Duration,
    user_agent: String,
}

impl TcpTransport {
    /// Create a transport with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            stream: None,
            codec: RtspCodec::new(),
            request_headers: Headers::new(),
            last_response: None,
            cseq: 0,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("rtsp-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the connect timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Configured connect timeout
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    fn next_cseq(&mut self) -> u32 {
        self.cseq += 1;
        self.cseq
    }

    fn build_request(&mut self, method: Method, uri: &str) -> RtspRequest {
        let mut builder = RtspRequest::builder(method, uri)
            .cseq(self.next_cseq())
            .user_agent(&self.user_agent);

        for (name, value) in self.request_headers.iter() {
            builder = builder.header(name, value);
        }

        builder.build()
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn open(&mut self, host: &str, port: u16) -> Result<()> {
        tracing::debug!(host, port, "connecting");

        let connect = TcpStream::connect((host, port));
        let stream = tokio::time::timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| RtspError::ConnectionTimeout {
                duration: self.connect_timeout,
            })?
            .map_err(|e| RtspError::ConnectionFailed {
                host: host.to_string(),
                port,
                message: e.to_string(),
                source: Some(Box::new(e)),
            })?;

        self.stream = Some(stream);
        self.codec.reset();
        self.request_headers = Headers::new();
        self.last_response = None;
        self.cseq = 0;
        Ok(())
    }

    fn close(&mut self) {
        self.stream = None;
        self.codec.reset();
    }

    fn set_request_header(&mut self, name: &str, value: &str) {
        self.request_headers.set(name, value);
    }

    async fn send_request(&mut self, method: Method, uri: &str) -> Result<()> {
        let request = self.build_request(method, uri);
        let encoded = request.encode();

        let stream = self.stream.as_mut().ok_or(RtspError::NotConnected)?;

        if let Ok(text) = std::str::from_utf8(&encoded) {
            tracing::debug!(">> {}", text.trim_end());
        }

        stream.write_all(&encoded).await?;
        stream.flush().await?;

        let mut buf = vec![0u8; 4096];
        loop {
            if let Some(response) = self.codec.decode()? {
                tracing::debug!(
                    "<< {} {} ({} bytes)",
                    response.status.as_u16(),
                    response.reason,
                    response.body.len()
                );
                self.last_response = Some(response);
                return Ok(());
            }

            let n = stream.read(&mut buf).await?;
            if n == 0 {
                return Err(RtspError::Disconnected);
            }
            self.codec.feed(&buf[..n])?;
        }
    }

    fn status_code(&self) -> Option<u16> {
        self.last_response.as_ref().map(|r| r.status.as_u16())
    }

    fn status_message(&self) -> Option<&str> {
        self.last_response.as_ref().map(|r| r.reason.as_str())
    }

    fn response_headers(&self) -> Option<&Headers> {
        self.last_response.as_ref().map(|r| &r.headers)
    }

    fn response_body(&self) -> &[u8] {
        self.last_response.as_ref().map_or(&[], |r| r.body.as_slice())
    }
}
