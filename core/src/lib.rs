/*
 * lib.rs
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

//! Saetta core: one request, one response, one connection.
//!
//! The session pipeline runs `resolve → connect → handshake → write → read →
//! shutdown` as strictly ordered suspending stages, each under its own fresh
//! timeout. Resolver and transport are traits so tests can script the wire.

pub mod codec;
pub mod config;
pub mod error;
pub mod net;
pub mod resolver;
pub mod session;
pub mod transport;

pub use codec::{ParseError, Request, Response};
pub use config::{HttpVersion, SessionConfig, Verification};
pub use error::{SessionError, Stage};
pub use resolver::{DnsResolver, Resolve};
pub use session::Session;
pub use transport::{TlsTransport, Transport};
