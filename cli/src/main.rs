/*
 * main.rs
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

//! Command-line front end: parse arguments, run one session, print the
//! response to stdout. Diagnostics and logs go to stderr only.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use saetta_core::{HttpVersion, Session, SessionConfig, Verification};

/// Fetch one URL over TLS and print the full response.
#[derive(Debug, Parser)]
#[command(name = "saetta", version)]
struct Args {
    /// Host to connect to, e.g. www.example.com
    host: String,

    /// TCP port, e.g. 443
    port: u16,

    /// Request target, e.g. /
    target: String,

    /// HTTP version: 1.0 or 1.1
    #[arg(default_value = "1.1")]
    http_version: HttpVersion,

    /// Per-stage timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Skip certificate chain and hostname verification. Dangerous: the
    /// connection is open to man-in-the-middle attacks.
    #[arg(long)]
    insecure: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let verification = if args.insecure {
        Verification::Disabled
    } else {
        Verification::Strict
    };
    let config = SessionConfig::new(args.host, args.port, args.target)
        .version(args.http_version)
        .stage_timeout(Duration::from_secs(args.timeout))
        .verification(verification);

    match Session::from_config(config).run().await {
        Ok(response) => {
            println!("{}", response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("saetta: {}", e);
            ExitCode::FAILURE
        }
    }
}
