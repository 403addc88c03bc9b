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


//! Scripted sequencer: runs a script against one connection, strictly in order.

use crate::{
    Anomaly, Connection, Expectation, HarnessConfig, HarnessError, ReadOutcome, RunReport,
    Script, ScriptStep, StepOutcome, StepReport,
};
use iacprobe_telnetcodec::{FrameParser, TelnetCodec, TelnetCommand, TelnetFrame, push_coalesced};
use std::fmt::{self, Display, Formatter};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Where the sequencer is in its script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    /// Not started
    Idle,
    /// Executing the step at this index
    Running(usize),
    /// Every step ran and the grace period is over
    Complete,
    /// The connection failed while this step was running
    Aborted {
        /// Index of the interrupted step
        step: usize,
    },
}

impl SequencerState {
    /// Whether the run is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, SequencerState::Complete | SequencerState::Aborted { .. })
    }
}

impl Display for SequencerState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SequencerState::Idle => f.write_str("idle"),
            SequencerState::Running(step) => write!(f, "running step {step}"),
            SequencerState::Complete => f.write_str("complete"),
            SequencerState::Aborted { step } => write!(f, "aborted at step {step}"),
        }
    }
}

///
/// Runs a [`Script`] against one [`Connection`].
///
/// The sequencer owns the connection's parser and the frames received but not yet claimed
/// by an expectation. Frames are stored coalesced, so data split across reads is seen as one
/// run.
///
#[derive(Debug)]
pub struct Sequencer<S> {
    connection: Connection<S>,
    parser: FrameParser,
    pending: Vec<TelnetFrame>,
    anomalies: Vec<Anomaly>,
    state: SequencerState,
    grace_period: Duration,
}

impl<S> Sequencer<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a sequencer for `connection`.
    pub fn new(connection: Connection<S>, config: &HarnessConfig) -> Self {
        let codec = TelnetCodec::new().with_max_subnegotiation(config.max_subnegotiation);
        Sequencer {
            connection,
            parser: FrameParser::with_codec(codec),
            pending: Vec::new(),
            anomalies: Vec::new(),
            state: SequencerState::Idle,
            grace_period: config.grace_period,
        }
    }

    /// Current state.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Run every step, drain for the grace period, close the connection and report.
    pub async fn run(mut self, script: &Script) -> RunReport {
        info!("Running script {} ({} steps)", script.name(), script.len());
        let mut steps = Vec::with_capacity(script.len());

        for (index, step) in script.steps().iter().enumerate() {
            self.state = SequencerState::Running(index);
            info!("Step {}: {}", index, step.label());
            match self.execute(step).await {
                Ok(outcome) => steps.push(StepReport {
                    index,
                    label: step.label().to_string(),
                    outcome,
                }),
                Err(err) if err.is_connection_error() => {
                    error!("Connection lost at step {} ({}): {}", index, step.label(), err);
                    self.state = SequencerState::Aborted { step: index };
                    break;
                }
                Err(err) => {
                    error!("Step {} ({}) aborted the run: {}", index, step.label(), err);
                    self.state = SequencerState::Aborted { step: index };
                    break;
                }
            }
        }

        if !self.state.is_terminal() {
            self.drain().await;
            self.state = SequencerState::Complete;
        }

        if let Err(leftover) = self.parser.finish() {
            warn!("Connection ended inside a frame: {}", leftover);
            self.anomalies.push(Anomaly::Leftover(leftover));
        }
        if let Err(err) = self.connection.close().await {
            warn!("Failed to close connection: {}", err);
        }
        info!("Script {} finished: {}", script.name(), self.state);

        RunReport {
            script: script.name().to_string(),
            state: self.state,
            steps,
            trailing: std::mem::take(&mut self.pending),
            anomalies: self.anomalies,
            bytes_sent: self.connection.bytes_sent(),
            bytes_received: self.connection.bytes_received(),
        }
    }

    async fn execute(&mut self, step: &ScriptStep) -> Result<StepOutcome, HarnessError> {
        match step {
            ScriptStep::Send { payload, .. } => {
                debug!("Sending {}", payload);
                let bytes = self.connection.send(payload).await?;
                Ok(StepOutcome::Sent { bytes })
            }
            ScriptStep::Sleep { duration, .. } => {
                tokio::time::sleep(*duration).await;
                Ok(StepOutcome::Slept(*duration))
            }
            ScriptStep::ExpectWithin {
                timeout,
                expectation,
                ..
            } => self.expect(*timeout, expectation).await,
        }
    }

    async fn expect(
        &mut self,
        timeout: Duration,
        expectation: &Expectation,
    ) -> Result<StepOutcome, HarnessError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(len) = expectation.matches(&self.pending) {
                let frames: Vec<TelnetFrame> = self.pending.drain(..len).collect();
                let verdict = expectation.validate(&frames);
                match &verdict {
                    Some(verdict) if !verdict.is_pass() => {
                        warn!("{}: {}", expectation.description(), verdict)
                    }
                    Some(verdict) => info!("{}: {}", expectation.description(), verdict),
                    None => info!("Matched {}", expectation.description()),
                }
                return Ok(StepOutcome::Matched { frames, verdict });
            }
            match self.connection.read_until(deadline).await? {
                ReadOutcome::Data(bytes) => self.absorb(&bytes),
                ReadOutcome::TimedOut => {
                    let received = std::mem::take(&mut self.pending);
                    warn!(
                        "No response matching {} within {:?} ({} other frames)",
                        expectation.description(),
                        timeout,
                        received.len()
                    );
                    return Ok(StepOutcome::NoResponse { received });
                }
                ReadOutcome::Closed => return Err(HarnessError::ConnectionClosed),
            }
        }
    }

    async fn drain(&mut self) {
        if self.grace_period.is_zero() {
            return;
        }
        debug!("Draining for {:?}", self.grace_period);
        let deadline = Instant::now() + self.grace_period;
        loop {
            match self.connection.read_until(deadline).await {
                Ok(ReadOutcome::Data(bytes)) => self.absorb(&bytes),
                Ok(ReadOutcome::TimedOut | ReadOutcome::Closed) => return,
                Err(err) => {
                    warn!("Read failed while draining: {}", err);
                    return;
                }
            }
        }
    }

    fn absorb(&mut self, bytes: &[u8]) {
        for frame in self.parser.feed(bytes) {
            match &frame {
                TelnetFrame::Malformed(raw) => {
                    self.anomalies.push(Anomaly::MalformedSubnegotiation(raw.clone()));
                }
                TelnetFrame::Command(TelnetCommand::Unknown(code)) => {
                    warn!("Unknown command IAC {}", code);
                    self.anomalies.push(Anomaly::UnknownCommand(*code));
                }
                _ => {}
            }
            debug!("Received {}", frame);
            push_coalesced(&mut self.pending, frame);
        }
    }
}
