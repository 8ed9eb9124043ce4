/*
 * request.rs
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

//! The one request this client sends: a bodyless GET with Host and
//! User-Agent, serialized exactly once.

use crate::config::{HttpVersion, SessionConfig};

/// Advertised in the User-Agent header.
pub const USER_AGENT: &str = concat!("saetta/", env!("CARGO_PKG_VERSION"));

/// Immutable GET request. Built once from the session config.
#[derive(Debug, Clone)]
pub struct Request {
    pub target: String,
    pub version: HttpVersion,
    pub host: String,
    pub port: u16,
    pub user_agent: String,
}

impl Request {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            target: config.target.clone(),
            version: config.version,
            host: config.host.clone(),
            port: config.port,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Host header value: bare host on the default HTTPS port, host:port
    /// otherwise.
    fn host_header(&self) -> String {
        if self.port == 443 {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Wire form of the request: request line, Host, User-Agent, blank line.
    pub fn serialize(&self) -> Vec<u8> {
        let out = format!(
            "GET {} {}\r\nHost: {}\r\nUser-Agent: {}\r\n\r\n",
            self.target,
            self.version.as_str(),
            self.host_header(),
            self.user_agent,
        );
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_default_port_without_suffix() {
        let config = SessionConfig::new("example.test", 443, "/index.html");
        let wire = String::from_utf8(Request::new(&config).serialize()).unwrap();
        assert!(wire.starts_with("GET /index.html HTTP/1.1\r\n"));
        assert!(wire.contains("\r\nHost: example.test\r\n"));
        assert!(wire.contains("\r\nUser-Agent: saetta/"));
        assert!(wire.ends_with("\r\n\r\n"));
    }

    #[test]
    fn serializes_custom_port_and_version() {
        let config =
            SessionConfig::new("example.test", 8443, "/").version(HttpVersion::Http1_0);
        let wire = String::from_utf8(Request::new(&config).serialize()).unwrap();
        assert!(wire.starts_with("GET / HTTP/1.0\r\n"));
        assert!(wire.contains("\r\nHost: example.test:8443\r\n"));
    }
}
