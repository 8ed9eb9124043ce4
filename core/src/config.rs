/*
 * config.rs
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

//! Session configuration: where to connect, what to ask for, how long each
//! stage may take, and whether the server certificate is verified.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default per-stage budget. Each stage gets the full budget anew.
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP protocol version on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpVersion {
    Http1_0,
    #[default]
    Http1_1,
}

impl HttpVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::Http1_0 => "HTTP/1.0",
            HttpVersion::Http1_1 => "HTTP/1.1",
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVersion {
    type Err = String;

    /// Accepts the short command-line form ("1.0", "1.1").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(HttpVersion::Http1_0),
            "1.1" => Ok(HttpVersion::Http1_1),
            other => Err(format!("unsupported HTTP version: {}", other)),
        }
    }
}

/// Server certificate verification mode.
///
/// `Disabled` accepts any certificate and performs no hostname check; it
/// exists for endpoints with self-signed certificates and must be an explicit
/// caller decision, never a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verification {
    #[default]
    Strict,
    Disabled,
}

/// Immutable parameters for one session. Built once, read for the session's
/// whole lifetime.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub target: String,
    pub version: HttpVersion,
    pub stage_timeout: Duration,
    pub verification: Verification,
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, port: u16, target: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            target: target.into(),
            version: HttpVersion::default(),
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
            verification: Verification::default(),
        }
    }

    pub fn version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    pub fn stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    pub fn verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_from_str() {
        assert_eq!("1.0".parse::<HttpVersion>(), Ok(HttpVersion::Http1_0));
        assert_eq!("1.1".parse::<HttpVersion>(), Ok(HttpVersion::Http1_1));
        assert!("2".parse::<HttpVersion>().is_err());
        assert!("HTTP/1.1".parse::<HttpVersion>().is_err());
    }

    #[test]
    fn defaults() {
        let config = SessionConfig::new("example.test", 443, "/");
        assert_eq!(config.version, HttpVersion::Http1_1);
        assert_eq!(config.stage_timeout, DEFAULT_STAGE_TIMEOUT);
        assert_eq!(config.verification, Verification::Strict);
    }
}
