/*
 * session_pipeline.rs
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

//! Session pipeline tests over a scripted resolver and transport. The wire
//! is a `tokio::io::duplex` pair with a miniature server task on the far
//! end; shutdown and write behavior are scripted per test.

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream, ReadBuf};
use tokio::time::sleep;

use saetta_core::{Resolve, Session, SessionConfig, SessionError, Stage, Transport};

fn endpoint() -> SocketAddr {
    "192.0.2.1:443".parse().unwrap()
}

/// Resolver returning a fixed candidate list.
struct StaticResolver(Vec<SocketAddr>);

impl Resolve for StaticResolver {
    async fn resolve(&mut self, _host: &str, _port: u16) -> io::Result<Vec<SocketAddr>> {
        Ok(self.0.clone())
    }
}

/// Resolver that always fails.
struct FailingResolver;

impl Resolve for FailingResolver {
    async fn resolve(&mut self, _host: &str, _port: u16) -> io::Result<Vec<SocketAddr>> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no such host"))
    }
}

#[derive(Clone, Copy)]
enum ShutdownBehavior {
    /// Delegate to the duplex stream.
    Clean,
    /// Peer closed without returning close_notify.
    Eof,
    /// A genuine shutdown failure.
    Fail,
}

/// Duplex-backed stream with scripted write and shutdown behavior.
struct ScriptedStream {
    inner: DuplexStream,
    shutdown: ShutdownBehavior,
    fail_writes: bool,
}

impl AsyncRead for ScriptedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for ScriptedStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.fail_writes {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone")));
        }
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.shutdown {
            ShutdownBehavior::Clean => Pin::new(&mut self.inner).poll_shutdown(cx),
            ShutdownBehavior::Eof => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "peer closed without close_notify",
            ))),
            ShutdownBehavior::Fail => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "close_notify failed",
            ))),
        }
    }
}

/// Transport whose handshake hands out a pre-wired scripted stream.
struct ScriptedTransport {
    stream: Option<ScriptedStream>,
    connect_delay: Option<Duration>,
    reject_hint: bool,
    handshake_called: Arc<AtomicBool>,
}

impl ScriptedTransport {
    fn new(stream: ScriptedStream) -> Self {
        Self {
            stream: Some(stream),
            connect_delay: None,
            reject_hint: false,
            handshake_called: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Transport for ScriptedTransport {
    type Conn = ();
    type Hint = ();
    type Stream = ScriptedStream;

    async fn connect(&mut self, _endpoint: SocketAddr) -> io::Result<()> {
        if let Some(delay) = self.connect_delay {
            sleep(delay).await;
        }
        Ok(())
    }

    fn hostname_hint(&self, _host: &str) -> io::Result<()> {
        if self.reject_hint {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "invalid host name"))
        } else {
            Ok(())
        }
    }

    async fn handshake(&mut self, _hint: (), _conn: ()) -> io::Result<ScriptedStream> {
        self.handshake_called.store(true, Ordering::SeqCst);
        self.stream
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "handshake already consumed"))
    }
}

/// Duplex wire plus a server task that reads the request then writes a
/// scripted response. `close_after` drops the server end after writing.
fn scripted_wire(
    response: &'static [u8],
    close_after: bool,
    shutdown: ShutdownBehavior,
) -> ScriptedStream {
    let (client, mut server) = tokio::io::duplex(64 * 1024);
    tokio::spawn(async move {
        let mut request = Vec::new();
        let mut tmp = [0u8; 1024];
        loop {
            let n = match server.read(&mut tmp).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            request.extend_from_slice(&tmp[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        if server.write_all(response).await.is_err() {
            return;
        }
        if close_after {
            drop(server);
        } else {
            // Hold the connection open so only framing can end the message.
            sleep(Duration::from_secs(60)).await;
        }
    });
    ScriptedStream { inner: client, shutdown, fail_writes: false }
}

fn config() -> SessionConfig {
    SessionConfig::new("example.test", 443, "/").stage_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn round_trip_success() {
    let stream = scripted_wire(
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello",
        false,
        ShutdownBehavior::Clean,
    );
    let session = Session::new(
        config(),
        StaticResolver(vec![endpoint()]),
        ScriptedTransport::new(stream),
    );

    let response = session.run().await.expect("session should succeed");
    assert_eq!(response.code, 200);
    assert_eq!(response.reason.as_deref(), Some("OK"));
    assert_eq!(response.body, b"hello");
}

#[tokio::test]
async fn resolve_empty_fails_in_resolve_stage() {
    let stream = scripted_wire(b"", false, ShutdownBehavior::Clean);
    let session = Session::new(
        config(),
        StaticResolver(Vec::new()),
        ScriptedTransport::new(stream),
    );

    let err = session.run().await.unwrap_err();
    assert_eq!(err.stage(), Stage::Resolve);
    assert!(matches!(err, SessionError::NoAddresses));
}

#[tokio::test]
async fn resolver_error_fails_in_resolve_stage() {
    let stream = scripted_wire(b"", false, ShutdownBehavior::Clean);
    let session = Session::new(config(), FailingResolver, ScriptedTransport::new(stream));

    let err = session.run().await.unwrap_err();
    assert_eq!(err.stage(), Stage::Resolve);
}

#[tokio::test]
async fn connect_timeout_is_isolated_to_the_connect_stage() {
    let stream = scripted_wire(b"", false, ShutdownBehavior::Clean);
    let mut transport = ScriptedTransport::new(stream);
    transport.connect_delay = Some(Duration::from_secs(30));
    let config = config().stage_timeout(Duration::from_millis(100));
    let session = Session::new(config, StaticResolver(vec![endpoint()]), transport);

    let err = session.run().await.unwrap_err();
    // Resolve already completed; the deadline must land on connect.
    assert_eq!(err.stage(), Stage::Connect);
    assert!(err.is_timeout());
}

#[tokio::test]
async fn rejected_hostname_hint_fails_before_handshake() {
    let stream = scripted_wire(b"", false, ShutdownBehavior::Clean);
    let mut transport = ScriptedTransport::new(stream);
    transport.reject_hint = true;
    let handshake_called = transport.handshake_called.clone();
    let session = Session::new(config(), StaticResolver(vec![endpoint()]), transport);

    let err = session.run().await.unwrap_err();
    assert_eq!(err.stage(), Stage::Handshake);
    assert!(!handshake_called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn shutdown_eof_is_a_clean_close() {
    let stream = scripted_wire(
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok",
        false,
        ShutdownBehavior::Eof,
    );
    let session = Session::new(
        config(),
        StaticResolver(vec![endpoint()]),
        ScriptedTransport::new(stream),
    );

    let response = session.run().await.expect("EOF on shutdown is not a failure");
    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn shutdown_hard_failure_does_not_downgrade_success() {
    let stream = scripted_wire(
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok",
        false,
        ShutdownBehavior::Fail,
    );
    let session = Session::new(
        config(),
        StaticResolver(vec![endpoint()]),
        ScriptedTransport::new(stream),
    );

    let response = session.run().await.expect("shutdown errors are non-fatal");
    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn write_failure_fails_in_write_stage() {
    let mut stream = scripted_wire(b"", false, ShutdownBehavior::Clean);
    stream.fail_writes = true;
    let session = Session::new(
        config(),
        StaticResolver(vec![endpoint()]),
        ScriptedTransport::new(stream),
    );

    let err = session.run().await.unwrap_err();
    assert_eq!(err.stage(), Stage::Write);
}

#[tokio::test]
async fn garbage_response_fails_in_read_stage() {
    let stream = scripted_wire(b"NOT HTTP AT ALL\r\n\r\n", false, ShutdownBehavior::Clean);
    let session = Session::new(
        config(),
        StaticResolver(vec![endpoint()]),
        ScriptedTransport::new(stream),
    );

    let err = session.run().await.unwrap_err();
    assert_eq!(err.stage(), Stage::Read);
}

#[tokio::test]
async fn until_close_body_completes_when_peer_disconnects() {
    let stream = scripted_wire(
        b"HTTP/1.0 200 OK\r\n\r\ngoodbye",
        true,
        ShutdownBehavior::Clean,
    );
    let session = Session::new(
        config(),
        StaticResolver(vec![endpoint()]),
        ScriptedTransport::new(stream),
    );

    let response = session.run().await.expect("until-close body should parse");
    assert_eq!(response.body, b"goodbye");
}

#[tokio::test]
async fn chunked_response_round_trip() {
    let stream = scripted_wire(
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n",
        false,
        ShutdownBehavior::Clean,
    );
    let session = Session::new(
        config(),
        StaticResolver(vec![endpoint()]),
        ScriptedTransport::new(stream),
    );

    let response = session.run().await.expect("chunked body should parse");
    assert_eq!(response.body, b"hello");
    assert_eq!(response.header("transfer-encoding"), Some("chunked"));
}
