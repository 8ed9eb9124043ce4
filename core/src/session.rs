/*
 * session.rs
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

//! One session: resolve → connect → handshake → write → read → shutdown.
//!
//! Stages run strictly in order, each under its own fresh timeout (budgets
//! are never cumulative). The first stage error ends the session; there are
//! no retries and no fallback across resolver candidates. Shutdown is the
//! one exception: once the response has been read, nothing that happens
//! during close_notify can change the result.

use std::future::Future;
use std::io;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::codec::{Request, Response, ResponseParser};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::resolver::{DnsResolver, Resolve};
use crate::transport::{TlsTransport, Transport};

const READ_CHUNK: usize = 8192;

/// Run `fut` under a fresh stage budget; the deadline surfaces as a
/// `TimedOut` I/O error and the timed-out operation is dropped with the
/// future, which cancels its pending I/O.
async fn staged<F, O>(budget: Duration, fut: F) -> io::Result<O>
where
    F: Future<Output = io::Result<O>>,
{
    match timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "stage timed out")),
    }
}

/// A single request/response exchange over a TLS transport. Create, call
/// `run` once, and the session is consumed.
pub struct Session<R, T> {
    config: SessionConfig,
    resolver: R,
    transport: T,
}

impl Session<DnsResolver, TlsTransport> {
    /// Production pipeline: system DNS and rustls over TCP, with the
    /// config's verification mode.
    pub fn from_config(config: SessionConfig) -> Self {
        let transport = TlsTransport::with_verification(config.verification);
        Self::new(config, DnsResolver, transport)
    }
}

impl<R: Resolve, T: Transport> Session<R, T> {
    pub fn new(config: SessionConfig, resolver: R, transport: T) -> Self {
        Self { config, resolver, transport }
    }

    /// Drive the pipeline to completion. Returns the fully-buffered response
    /// or the first stage error; exactly one of the two, exactly once.
    pub async fn run(mut self) -> Result<Response, SessionError> {
        let budget = self.config.stage_timeout;
        let host = self.config.host.clone();
        let port = self.config.port;

        debug!(%host, port, "resolving");
        let endpoints = staged(budget, self.resolver.resolve(&host, port))
            .await
            .map_err(SessionError::Resolve)?;
        // First candidate only; no fallback across the rest.
        let endpoint = *endpoints.first().ok_or(SessionError::NoAddresses)?;

        debug!(%endpoint, "connecting");
        let conn = staged(budget, self.transport.connect(endpoint))
            .await
            .map_err(SessionError::Connect)?;

        // SNI must be in place before the handshake; a host name the TLS
        // layer cannot encode fails here without touching the wire.
        let hint = self
            .transport
            .hostname_hint(&host)
            .map_err(SessionError::Handshake)?;
        debug!(%host, "handshaking");
        let mut stream = staged(budget, self.transport.handshake(hint, conn))
            .await
            .map_err(SessionError::Handshake)?;

        let wire = Request::new(&self.config).serialize();
        debug!(bytes = wire.len(), "writing request");
        staged(budget, async {
            stream.write_all(&wire).await?;
            stream.flush().await
        })
        .await
        .map_err(SessionError::Write)?;

        debug!("reading response");
        let response = match timeout(budget, read_response(&mut stream)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SessionError::Read(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "stage timed out",
                )))
            }
        };

        // The read future is gone, so no low-level I/O is pending; only the
        // close_notify exchange remains. Whatever happens here, the exchange
        // above already succeeded.
        debug!("shutting down");
        match timeout(budget, stream.shutdown()).await {
            Ok(Ok(())) => {}
            // Peer closed the socket without returning close_notify. The
            // application data was fully delivered, so this is a clean close.
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {}
            Ok(Err(e)) => warn!(error = %e, "TLS shutdown failed"),
            Err(_) => warn!("TLS shutdown timed out"),
        }

        debug!(code = response.code, body_len = response.body.len(), "closed");
        Ok(response)
    }
}

/// Read and parse exactly one HTTP message. End of stream completes a
/// read-until-close body and truncates anything else.
async fn read_response<S>(stream: &mut S) -> Result<Response, SessionError>
where
    S: AsyncRead + Unpin,
{
    let mut parser = ResponseParser::new();
    let mut buf = BytesMut::with_capacity(READ_CHUNK);
    let mut tmp = [0u8; READ_CHUNK];
    loop {
        let n = stream.read(&mut tmp).await.map_err(SessionError::Read)?;
        if n == 0 {
            return Ok(parser.finish()?);
        }
        buf.extend_from_slice(&tmp[..n]);
        parser.feed(&mut buf)?;
        if parser.is_complete() {
            return Ok(parser.finish()?);
        }
    }
}
