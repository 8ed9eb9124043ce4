/*
 * response.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Saetta, a single-shot TLS HTTP client.
 *
 * Saetta is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Saetta is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Saetta.  If not, see <http://www.gnu.org/licenses/>.
 */

//! HTTP/1.x response parser: status line, headers, body framed by
//! Content-Length, chunked transfer coding, or connection close.
//!
//! Push model: the caller feeds raw bytes as they arrive and the parser
//! accretes a complete `Response`. Partial data stays in the caller's buffer
//! between feeds.

use std::fmt;

use bytes::{Buf, BytesMut};
use thiserror::Error;

use crate::config::HttpVersion;

/// Response parse failures.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid status line: {0}")]
    InvalidStatusLine(String),

    #[error("invalid header line: {0}")]
    InvalidHeader(String),

    #[error("invalid content-length: {0}")]
    InvalidContentLength(String),

    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(String),

    #[error("chunk data not terminated by CRLF")]
    InvalidChunkTerminator,

    #[error("connection closed before the message was complete")]
    UnexpectedEof,
}

/// One complete HTTP response, body fully buffered.
#[derive(Debug, Clone)]
pub struct Response {
    pub version: HttpVersion,
    pub code: u16,
    pub reason: Option<String>,
    /// Headers in arrival order; trailers from a chunked body are appended.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// First value of the named header, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl fmt::Display for Response {
    /// Wire-shaped rendering: status line, headers, blank line, body.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => writeln!(f, "{} {} {}\r", self.version, self.code, reason)?,
            None => writeln!(f, "{} {}\r", self.version, self.code)?,
        }
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}\r", name, value)?;
        }
        writeln!(f, "\r")?;
        f.write_str(&self.body_text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    StatusLine,
    Headers,
    /// Body with a known remaining byte count.
    FixedBody(u64),
    /// No framing headers: body runs until the peer closes.
    UntilClose,
    ChunkSize,
    ChunkData(u64),
    /// CRLF after a chunk's data.
    ChunkDataEnd,
    Trailers,
    Complete,
}

/// Incremental response parser. Feed bytes with `feed`, then take the
/// message with `finish` once complete (or at end of stream).
pub struct ResponseParser {
    state: ParseState,
    response: Response,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::StatusLine,
            response: Response {
                version: HttpVersion::Http1_1,
                code: 0,
                reason: None,
                headers: Vec::new(),
                body: Vec::new(),
            },
        }
    }

    /// True once one full message has been parsed.
    pub fn is_complete(&self) -> bool {
        self.state == ParseState::Complete
    }

    /// Position of the first CRLF in `buf`, if any.
    fn find_crlf(buf: &[u8]) -> Option<usize> {
        buf.windows(2).position(|w| w == b"\r\n")
    }

    /// Split one CRLF-terminated line off `buf` as UTF-8, or None if no full
    /// line has arrived yet.
    fn take_line(
        buf: &mut BytesMut,
        on_bad_utf8: fn(String) -> ParseError,
    ) -> Result<Option<String>, ParseError> {
        let Some(line_end) = Self::find_crlf(buf) else {
            return Ok(None);
        };
        let line = buf.split_to(line_end + 2);
        match std::str::from_utf8(&line[..line_end]) {
            Ok(s) => Ok(Some(s.to_string())),
            Err(_) => Err(on_bad_utf8("not valid UTF-8".to_string())),
        }
    }

    /// Consume as much of `buf` as possible. Safe to call repeatedly; partial
    /// tokens are left in `buf` for the next feed.
    pub fn feed(&mut self, buf: &mut BytesMut) -> Result<(), ParseError> {
        loop {
            match self.state {
                ParseState::StatusLine => {
                    let Some(line) = Self::take_line(buf, ParseError::InvalidStatusLine)? else {
                        return Ok(());
                    };
                    self.parse_status_line(&line)?;
                    self.state = ParseState::Headers;
                }
                ParseState::Headers => {
                    let Some(line) = Self::take_line(buf, ParseError::InvalidHeader)? else {
                        return Ok(());
                    };
                    if line.is_empty() {
                        self.state = self.body_state()?;
                        continue;
                    }
                    self.parse_header_line(&line);
                }
                ParseState::FixedBody(remaining) => {
                    let take = (remaining as usize).min(buf.len());
                    if take == 0 {
                        return Ok(());
                    }
                    self.response.body.extend_from_slice(&buf.split_to(take));
                    let left = remaining - take as u64;
                    self.state = if left == 0 {
                        ParseState::Complete
                    } else {
                        ParseState::FixedBody(left)
                    };
                }
                ParseState::UntilClose => {
                    if buf.is_empty() {
                        return Ok(());
                    }
                    let len = buf.len();
                    self.response.body.extend_from_slice(&buf.split_to(len));
                }
                ParseState::ChunkSize => {
                    let Some(line) = Self::take_line(buf, ParseError::InvalidChunkSize)? else {
                        return Ok(());
                    };
                    // Chunk extensions after ';' are ignored.
                    let hex = line.split(';').next().unwrap_or("").trim();
                    let size = u64::from_str_radix(hex, 16)
                        .map_err(|_| ParseError::InvalidChunkSize(line.clone()))?;
                    self.state = if size == 0 {
                        ParseState::Trailers
                    } else {
                        ParseState::ChunkData(size)
                    };
                }
                ParseState::ChunkData(remaining) => {
                    let take = (remaining as usize).min(buf.len());
                    if take == 0 {
                        return Ok(());
                    }
                    self.response.body.extend_from_slice(&buf.split_to(take));
                    let left = remaining - take as u64;
                    self.state = if left == 0 {
                        ParseState::ChunkDataEnd
                    } else {
                        ParseState::ChunkData(left)
                    };
                }
                ParseState::ChunkDataEnd => {
                    if buf.len() < 2 {
                        return Ok(());
                    }
                    if &buf[..2] != b"\r\n" {
                        return Err(ParseError::InvalidChunkTerminator);
                    }
                    buf.advance(2);
                    self.state = ParseState::ChunkSize;
                }
                ParseState::Trailers => {
                    let Some(line) = Self::take_line(buf, ParseError::InvalidHeader)? else {
                        return Ok(());
                    };
                    if line.is_empty() {
                        self.state = ParseState::Complete;
                        continue;
                    }
                    self.parse_header_line(&line);
                }
                ParseState::Complete => return Ok(()),
            }
        }
    }

    /// Close out the message at end of stream. A read-until-close body is
    /// complete at EOF; anything else still mid-message is truncated.
    pub fn finish(self) -> Result<Response, ParseError> {
        match self.state {
            ParseState::Complete | ParseState::UntilClose => Ok(self.response),
            _ => Err(ParseError::UnexpectedEof),
        }
    }

    fn parse_status_line(&mut self, line: &str) -> Result<(), ParseError> {
        // "HTTP/1.1 200 OK" or "HTTP/1.1 200"
        let mut parts = line.splitn(3, ' ');
        let version = parts
            .next()
            .filter(|v| v.starts_with("HTTP/"))
            .ok_or_else(|| ParseError::InvalidStatusLine(line.to_string()))?;
        let code = parts
            .next()
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(|| ParseError::InvalidStatusLine(line.to_string()))?;
        self.response.version = if version == "HTTP/1.0" {
            HttpVersion::Http1_0
        } else {
            HttpVersion::Http1_1
        };
        self.response.code = code;
        self.response.reason = parts.next().map(|s| s.to_string());
        Ok(())
    }

    /// Header lines without a colon are skipped rather than fatal.
    fn parse_header_line(&mut self, line: &str) {
        if let Some(colon) = line.find(':') {
            let name = line[..colon].trim();
            let value = line[colon + 1..].trim();
            self.response
                .headers
                .push((name.to_string(), value.to_string()));
        }
    }

    /// Body framing, decided once the header section is complete.
    fn body_state(&self) -> Result<ParseState, ParseError> {
        let code = self.response.code;
        if (100..200).contains(&code) || code == 204 || code == 304 {
            return Ok(ParseState::Complete);
        }
        let chunked = self
            .response
            .headers
            .iter()
            .any(|(k, v)| {
                k.eq_ignore_ascii_case("transfer-encoding")
                    && v.to_ascii_lowercase().contains("chunked")
            });
        if chunked {
            return Ok(ParseState::ChunkSize);
        }
        if let Some(value) = self.response.header("content-length") {
            let length = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ParseError::InvalidContentLength(value.to_string()))?;
            return Ok(if length == 0 {
                ParseState::Complete
            } else {
                ParseState::FixedBody(length)
            });
        }
        Ok(ParseState::UntilClose)
    }
}
