/*
 * transport.rs
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

//! Transport seam: raw connect, SNI hostname hint, TLS handshake.
//!
//! The hint is validated before the handshake primitive runs, so a host
//! string rustls cannot encode fails the session without any network I/O.
//! Graceful shutdown (close_notify) is `AsyncWriteExt::shutdown` on the
//! stream; cancelling pending I/O is dropping the future that owns it.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::client::ClientConfig;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::TlsConnector;

use crate::config::Verification;
use crate::net::client_config;

/// One connection's worth of transport: connect a raw stream to an endpoint,
/// then wrap it in TLS. Each associated value is produced once and consumed
/// once, in stage order.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Raw connected byte stream (pre-handshake).
    type Conn;
    /// Validated server-name indicator.
    type Hint;
    /// Encrypted stream the rest of the session reads and writes.
    type Stream: AsyncRead + AsyncWrite + Unpin;

    /// TCP-level connect to one resolved endpoint.
    async fn connect(&mut self, endpoint: SocketAddr) -> io::Result<Self::Conn>;

    /// Validate `host` as the outbound SNI value. Must not perform I/O.
    fn hostname_hint(&self, host: &str) -> io::Result<Self::Hint>;

    /// Client-side TLS handshake over the connected stream.
    async fn handshake(&mut self, hint: Self::Hint, conn: Self::Conn)
        -> io::Result<Self::Stream>;
}

/// Production transport: rustls over a tokio `TcpStream`.
pub struct TlsTransport {
    connector: TlsConnector,
}

impl TlsTransport {
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self { connector: TlsConnector::from(config) }
    }

    /// Convenience constructor from a verification mode, using the
    /// process-wide root store.
    pub fn with_verification(verification: Verification) -> Self {
        Self::new(client_config(verification))
    }
}

impl Transport for TlsTransport {
    type Conn = TcpStream;
    type Hint = ServerName<'static>;
    type Stream = TlsStream<TcpStream>;

    async fn connect(&mut self, endpoint: SocketAddr) -> io::Result<TcpStream> {
        TcpStream::connect(endpoint).await
    }

    fn hostname_hint(&self, host: &str) -> io::Result<ServerName<'static>> {
        ServerName::try_from(host.to_string())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "invalid host name"))
    }

    async fn handshake(
        &mut self,
        hint: ServerName<'static>,
        conn: TcpStream,
    ) -> io::Result<TlsStream<TcpStream>> {
        self.connector.connect(hint, conn).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_hint_accepts_dns_names_and_ips() {
        let transport = TlsTransport::with_verification(Verification::Strict);
        assert!(transport.hostname_hint("example.test").is_ok());
        assert!(transport.hostname_hint("192.0.2.7").is_ok());
    }

    #[test]
    fn hostname_hint_rejects_invalid_names() {
        let transport = TlsTransport::with_verification(Verification::Strict);
        let err = transport.hostname_hint("exa mple.test").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
