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


//! Harness configuration

use crate::{HarnessError, Result};
use iacprobe_telnetcodec::DEFAULT_MAX_SUBNEGOTIATION;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Built-in script selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ScriptKind {
    /// RFC 854 framing: NOP, AYT, escaped IAC, WILL ECHO, CR NUL and CR LF
    #[default]
    Basic,
    /// TTYPE, TSPEED, ENVIRON, NAWS and LINEMODE subnegotiations
    Subnegotiation,
}

impl ScriptKind {
    /// Port the script listens on unless overridden.
    pub fn default_port(self) -> u16 {
        match self {
            ScriptKind::Basic => 8881,
            ScriptKind::Subnegotiation => 8882,
        }
    }
}

impl std::fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptKind::Basic => f.write_str("basic"),
            ScriptKind::Subnegotiation => f.write_str("subnegotiation"),
        }
    }
}

/// Harness configuration
///
/// Use the builder pattern methods to customize the configuration.
///
/// # Example
///
/// ```
/// use iacprobe_testsuite::{HarnessConfig, ScriptKind};
/// use std::time::Duration;
///
/// let config = HarnessConfig::for_script(ScriptKind::Subnegotiation)
///     .with_response_timeout(Duration::from_millis(750))
///     .with_grace_period(Duration::from_secs(2));
/// assert_eq!(config.bind_address.port(), 8882);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Address to listen on
    pub bind_address: SocketAddr,

    /// Script to run against the accepted client
    pub script: ScriptKind,

    /// How long each expectation waits for the client to answer
    pub response_timeout: Duration,

    /// How long to keep reading after the last step before closing
    pub grace_period: Duration,

    /// How long to wait for a client to connect, `None` to wait forever
    pub accept_timeout: Option<Duration>,

    /// Upper bound on a single write to the client
    pub write_timeout: Duration,

    /// Bytes requested per socket read
    pub read_chunk: usize,

    /// Bytes a subnegotiation may span, `IAC SB` through `IAC SE`, before it is reported as malformed
    pub max_subnegotiation: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, ScriptKind::Basic.default_port())),
            script: ScriptKind::Basic,
            response_timeout: Duration::from_millis(500),
            grace_period: Duration::from_secs(1),
            accept_timeout: None,
            write_timeout: Duration::from_secs(10),
            read_chunk: 1024,
            max_subnegotiation: DEFAULT_MAX_SUBNEGOTIATION,
        }
    }
}

impl HarnessConfig {
    /// Create a configuration listening on the given address
    pub fn new(bind_address: SocketAddr) -> Self {
        Self {
            bind_address,
            ..Default::default()
        }
    }

    /// Create a configuration for `script` on its default port
    pub fn for_script(script: ScriptKind) -> Self {
        Self::default().with_script(script)
    }

    /// Select the script, moving the port to the script's default
    pub fn with_script(mut self, script: ScriptKind) -> Self {
        self.script = script;
        self.bind_address.set_port(script.default_port());
        self
    }

    /// Set the bind address
    pub fn with_bind_address(mut self, address: SocketAddr) -> Self {
        self.bind_address = address;
        self
    }

    /// Set the per-expectation response timeout
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Set the post-script drain period
    pub fn with_grace_period(mut self, period: Duration) -> Self {
        self.grace_period = period;
        self
    }

    /// Set the accept timeout
    pub fn with_accept_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.accept_timeout = timeout;
        self
    }

    /// Set the write timeout
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set the read size
    pub fn with_read_chunk(mut self, size: usize) -> Self {
        self.read_chunk = size;
        self
    }

    /// Set the subnegotiation buffering limit
    pub fn with_max_subnegotiation(mut self, limit: usize) -> Self {
        self.max_subnegotiation = limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.response_timeout.is_zero() {
            return Err(HarnessError::InvalidConfig(
                "response_timeout must be greater than 0".to_string(),
            ));
        }
        if self.write_timeout.is_zero() {
            return Err(HarnessError::InvalidConfig(
                "write_timeout must be greater than 0".to_string(),
            ));
        }
        if self.accept_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(HarnessError::InvalidConfig(
                "accept_timeout must be greater than 0 when set".to_string(),
            ));
        }
        if self.read_chunk == 0 {
            return Err(HarnessError::InvalidConfig(
                "read_chunk must be greater than 0".to_string(),
            ));
        }
        if self.max_subnegotiation < 3 {
            return Err(HarnessError::InvalidConfig(
                "max_subnegotiation must hold at least IAC SB <option>".to_string(),
            ));
        }
        Ok(())
    }
}
