use thiserror::Error;

use super::{Headers, RtspResponse, StatusCode};

/// Errors during RTSP response parsing
#[derive(Debug, Error)]
pub enum RtspCodecError {
    /// Status line is not `RTSP-Version Status-Code Reason`
    #[error("invalid status line: {0}")]
    InvalidStatusLine(String),

    /// Header line without a colon separator
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Buffered data exceeded the configured limit
    #[error("response too large: {size} bytes")]
    ResponseTooLarge {
        /// Buffered size that tripped the limit
        size: usize,
    },
}

const DEFAULT_MAX_SIZE: usize = 1024 * 1024;

/// Incremental RTSP response parser
///
/// Feed bytes with [`feed`](Self::feed), pull complete responses with
/// [`decode`](Self::decode). Only one request is in flight at a time, so the
/// parser simply scans the buffer for the header/body boundary on each call.
pub struct RtspCodec {
    buffer: Vec<u8>,
    max_size: usize,
}

impl RtspCodec {
    /// Create a new codec
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Set the maximum buffered response size
    #[must_use]
    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    /// Feed bytes into the codec
    ///
    /// # Errors
    /// Returns `RtspCodecError::ResponseTooLarge` if the buffer would exceed
    /// the configured limit.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), RtspCodecError> {
        if self.buffer.len() + bytes.len() > self.max_size {
            return Err(RtspCodecError::ResponseTooLarge {
                size: self.buffer.len() + bytes.len(),
            });
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Try to decode one complete response
    ///
    /// Returns `Ok(Some(response))` when a full response (headers and body)
    /// is buffered, `Ok(None)` when more data is needed.
    ///
    /// # Errors
    /// Returns `RtspCodecError` if the buffered data is not a valid response.
    pub fn decode(&mut self) -> Result<Option<RtspResponse>, RtspCodecError> {
        let Some(header_end) = find(&self.buffer, b"\r\n\r\n") else {
            return Ok(None);
        };

        let head = String::from_utf8_lossy(&self.buffer[..header_end]).into_owned();
        let mut lines = head.split("\r\n");

        let status_line = lines.next().unwrap_or("");
        let (version, status, reason) = parse_status_line(status_line)?;
        let headers = parse_headers(lines)?;

        let content_length = headers.content_length().unwrap_or(0);
        let body_start = header_end + 4;
        let total = body_start + content_length;
        if self.buffer.len() < total {
            // Body not fully buffered yet; re-parse once more bytes arrive.
            return Ok(None);
        }

        let body = self.buffer[body_start..total].to_vec();
        self.buffer.drain(..total);

        Ok(Some(RtspResponse {
            version,
            status,
            reason,
            headers,
            body,
        }))
    }

    /// Discard buffered data
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of buffered bytes
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for RtspCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn parse_status_line(line: &str) -> Result<(String, StatusCode, String), RtspCodecError> {
    // Format: "RTSP/1.0 200 OK"
    let mut parts = line.splitn(3, ' ');

    let version = parts
        .next()
        .filter(|v| v.starts_with("RTSP/"))
        .ok_or_else(|| RtspCodecError::InvalidStatusLine(line.to_string()))?
        .to_string();

    let status = parts
        .next()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| RtspCodecError::InvalidStatusLine(line.to_string()))?;

    let reason = parts.next().unwrap_or("").to_string();

    Ok((version, StatusCode(status), reason))
}

fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Result<Headers, RtspCodecError> {
    let mut headers = Headers::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let colon = line
            .find(':')
            .ok_or_else(|| RtspCodecError::InvalidHeader(line.to_string()))?;

        let name = line[..colon].trim();
        let value = line[colon + 1..].trim();
        headers.append(name, value);
    }

    Ok(headers)
}
