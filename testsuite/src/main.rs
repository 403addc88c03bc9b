//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! `iacprobe`: run a built-in conformance script against one Telnet client.
//!
//! ```text
//! iacprobe [OPTIONS]
//!
//! Options:
//!   --script <SCRIPT>                 basic | subnegotiation [default: basic]
//!   --bind <ADDR>                     Address to listen on [default: 0.0.0.0]
//!   --port <PORT>                     Port [default: 8881 basic, 8882 subnegotiation]
//!   --response-timeout-ms <MS>        Wait per expected reply [default: 500]
//!   --grace-ms <MS>                   Read after the last step [default: 1000]
//!   --accept-timeout-secs <SECS>      Give up waiting for a client
//! ```
//!
//! Every option can also be set through the matching `IACPROBE_*` environment variable.
//! Log verbosity follows `RUST_LOG` and defaults to `info`; `RUST_LOG=trace` adds hex dumps
//! of all traffic.

use anyhow::Context;
use clap::Parser;
use iacprobe_testsuite::{HarnessConfig, HarnessListener, ScriptKind};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scripted Telnet protocol exerciser.
#[derive(Debug, Parser)]
#[command(name = "iacprobe", about = "Scripted Telnet protocol exerciser", version)]
struct Cli {
    /// Script to run.
    #[arg(long, value_enum, default_value_t = ScriptKind::Basic, env = "IACPROBE_SCRIPT")]
    script: ScriptKind,

    /// IP address to listen on.
    #[arg(long, default_value = "0.0.0.0", env = "IACPROBE_BIND")]
    bind: IpAddr,

    /// Port to listen on; defaults to the script's port.
    #[arg(long, env = "IACPROBE_PORT")]
    port: Option<u16>,

    /// How long to wait for each expected reply, in milliseconds.
    #[arg(long, default_value_t = 500, env = "IACPROBE_RESPONSE_TIMEOUT_MS")]
    response_timeout_ms: u64,

    /// How long to keep reading after the last step, in milliseconds.
    #[arg(long, default_value_t = 1000, env = "IACPROBE_GRACE_MS")]
    grace_ms: u64,

    /// Give up if no client connects within this many seconds.
    #[arg(long, env = "IACPROBE_ACCEPT_TIMEOUT_SECS")]
    accept_timeout_secs: Option<u64>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<HarnessConfig> {
        let port = self.port.unwrap_or(self.script.default_port());
        let config = HarnessConfig::new(SocketAddr::new(self.bind, port))
            .with_response_timeout(Duration::from_millis(self.response_timeout_ms))
            .with_grace_period(Duration::from_millis(self.grace_ms))
            .with_accept_timeout(self.accept_timeout_secs.map(Duration::from_secs));
        let config = HarnessConfig {
            script: self.script,
            ..config
        };
        config.validate().context("invalid command line")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;
    let script = config.script.build(config.response_timeout);

    let listener = HarnessListener::bind(&config)
        .await
        .with_context(|| format!("failed to listen on {}", config.bind_address))?;
    info!(
        "Telnet {} test server listening on {}, waiting for connection...",
        config.script,
        listener.local_addr()?
    );

    let report = iacprobe_testsuite::run(&listener, &script).await?;
    println!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = Cli::parse_from(["iacprobe"]).into_config().unwrap();
        assert_eq!(config.script, ScriptKind::Basic);
        assert_eq!(config.bind_address.to_string(), "0.0.0.0:8881");
        assert_eq!(config.response_timeout, Duration::from_millis(500));
        assert_eq!(config.accept_timeout, None);
    }

    #[test]
    fn test_cli_script_selects_port() {
        let config = Cli::parse_from(["iacprobe", "--script", "subnegotiation"])
            .into_config()
            .unwrap();
        assert_eq!(config.bind_address.port(), 8882);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Cli::parse_from([
            "iacprobe",
            "--bind",
            "127.0.0.1",
            "--port",
            "2323",
            "--grace-ms",
            "0",
            "--accept-timeout-secs",
            "30",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:2323");
        assert_eq!(config.grace_period, Duration::ZERO);
        assert_eq!(config.accept_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_cli_rejects_zero_response_timeout() {
        let cli = Cli::parse_from(["iacprobe", "--response-timeout-ms", "0"]);
        assert!(cli.into_config().is_err());
    }
}
