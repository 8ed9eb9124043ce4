/*
 * resolver.rs
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

//! Hostname resolution seam. The session only needs an ordered candidate
//! list; it uses the first endpoint and never falls back to the rest.

use std::io;
use std::net::SocketAddr;

/// Resolve a hostname and port into candidate endpoints.
#[allow(async_fn_in_trait)]
pub trait Resolve {
    /// Ordered candidates for `host:port`. An empty list is not an error
    /// here; the session turns it into one.
    async fn resolve(&mut self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>>;
}

/// System resolver via tokio's `lookup_host`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DnsResolver;

impl Resolve for DnsResolver {
    async fn resolve(&mut self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        let addrs = tokio::net::lookup_host((host, port)).await?;
        Ok(addrs.collect())
    }
}
