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


//! # IACProbe Test Suite
//!
//! A scripted Telnet conformance harness. It accepts a single client, walks it through an
//! ordered [`Script`] of raw protocol sequences, and parses the client's replies with the
//! streaming parser from `iacprobe-telnetcodec`.
//!
//! A script step either sends a payload, sleeps, or waits up to a deadline for the replies
//! to satisfy an [`Expectation`]. A missed expectation is recorded and the script carries
//! on. Only a dead connection stops a run early, and the [`RunReport`] then names the step
//! that was in progress.
//!
//! ```rust,no_run
//! use iacprobe_testsuite::{HarnessConfig, HarnessListener, ScriptKind};
//!
//! # async fn example() -> iacprobe_testsuite::Result<()> {
//! let config = HarnessConfig::for_script(ScriptKind::Subnegotiation);
//! let listener = HarnessListener::bind(&config).await?;
//! let script = config.script.build(config.response_timeout);
//! let report = iacprobe_testsuite::run(&listener, &script).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

mod config;
mod connection;
mod error;
pub mod hexdump;
mod report;
mod script;
pub mod scripts;
mod sequencer;

pub use self::config::{HarnessConfig, ScriptKind};
pub use self::connection::{Connection, HarnessListener, ReadOutcome};
pub use self::error::{HarnessError, Result};
pub use self::report::{Anomaly, RunReport, StepOutcome, StepReport};
pub use self::script::{
    Expectation, Script, ScriptPayload, ScriptStep, Verdict, environment_is, linemode_mode,
    terminal_speed_is, terminal_type_is, window_size,
};
pub use self::sequencer::{Sequencer, SequencerState};

/// Accept one client on `listener` and run `script` against it.
pub async fn run(listener: &HarnessListener, script: &Script) -> Result<RunReport> {
    let connection = listener.accept().await?;
    Ok(Sequencer::new(connection, listener.config()).run(script).await)
}
