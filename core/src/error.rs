/*
 * error.rs
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

//! Session errors, one variant per failing pipeline stage.
//!
//! A shutdown problem is not representable here: once the response has been
//! read, the session result is fixed and shutdown can only warn.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::codec::ParseError;

/// Pipeline stage a session can fail in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Connect,
    Handshake,
    Write,
    Read,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Connect => "connect",
            Stage::Handshake => "handshake",
            Stage::Write => "write",
            Stage::Read => "read",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a session failed. Stage timeouts surface as the stage's variant with
/// an `io::ErrorKind::TimedOut` source.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("resolve: {0}")]
    Resolve(#[source] io::Error),

    #[error("resolve: host has no addresses")]
    NoAddresses,

    #[error("connect: {0}")]
    Connect(#[source] io::Error),

    #[error("handshake: {0}")]
    Handshake(#[source] io::Error),

    #[error("write: {0}")]
    Write(#[source] io::Error),

    #[error("read: {0}")]
    Read(#[source] io::Error),

    #[error("read: {0}")]
    Parse(#[from] ParseError),
}

impl SessionError {
    /// The stage this error terminated the session in.
    pub fn stage(&self) -> Stage {
        match self {
            SessionError::Resolve(_) | SessionError::NoAddresses => Stage::Resolve,
            SessionError::Connect(_) => Stage::Connect,
            SessionError::Handshake(_) => Stage::Handshake,
            SessionError::Write(_) => Stage::Write,
            SessionError::Read(_) | SessionError::Parse(_) => Stage::Read,
        }
    }

    /// True when the underlying cause was a stage deadline firing.
    pub fn is_timeout(&self) -> bool {
        match self {
            SessionError::Resolve(e)
            | SessionError::Connect(e)
            | SessionError::Handshake(e)
            | SessionError::Write(e)
            | SessionError::Read(e) => e.kind() == io::ErrorKind::TimedOut,
            SessionError::NoAddresses | SessionError::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_mapping() {
        let e = SessionError::Connect(io::Error::new(io::ErrorKind::TimedOut, "late"));
        assert_eq!(e.stage(), Stage::Connect);
        assert!(e.is_timeout());
        assert_eq!(SessionError::NoAddresses.stage(), Stage::Resolve);
    }

    #[test]
    fn display_names_the_stage() {
        let e = SessionError::Handshake(io::Error::new(
            io::ErrorKind::InvalidData,
            "certificate rejected",
        ));
        assert_eq!(e.to_string(), "handshake: certificate rejected");
    }
}
