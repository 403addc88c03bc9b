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


//! Per-step and per-run results.

use crate::{SequencerState, Verdict, hexdump};
use bytes::Bytes;
use iacprobe_telnetcodec::{CodecError, TelnetFrame};
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

/// What happened during one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The payload was written
    Sent {
        /// Wire bytes written
        bytes: Bytes,
    },
    /// The sequencer paused
    Slept(Duration),
    /// The expectation was met
    Matched {
        /// The matched frames, in arrival order
        frames: Vec<TelnetFrame>,
        /// Validator judgement, if the expectation carries one
        verdict: Option<Verdict>,
    },
    /// The deadline passed first
    NoResponse {
        /// Frames that arrived but did not satisfy the expectation
        received: Vec<TelnetFrame>,
    },
}

/// Result of one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Position in the script
    pub index: usize,
    /// Step label
    pub label: String,
    /// What happened
    pub outcome: StepOutcome,
}

impl StepReport {
    /// Whether the step failed: a missed expectation or a failing verdict.
    pub fn is_failure(&self) -> bool {
        match &self.outcome {
            StepOutcome::NoResponse { .. } => true,
            StepOutcome::Matched {
                verdict: Some(verdict),
                ..
            } => !verdict.is_pass(),
            _ => false,
        }
    }
}

/// Peer behavior worth flagging that did not stop the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Anomaly {
    /// Leading bytes of a subnegotiation with no `IAC SE` inside the size limit
    MalformedSubnegotiation(Bytes),
    /// `IAC` followed by a code outside the command table
    UnknownCommand(u8),
    /// Bytes of an unfinished frame left when the connection ended
    Leftover(CodecError),
}

impl Display for Anomaly {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::MalformedSubnegotiation(raw) => {
                write!(f, "malformed subnegotiation {:02X?}", &raw[..])
            }
            Anomaly::UnknownCommand(code) => write!(f, "unknown command IAC {code}"),
            Anomaly::Leftover(error) => write!(f, "{error}"),
        }
    }
}

/// Everything a run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Script name
    pub script: String,
    /// Final sequencer state
    pub state: SequencerState,
    /// One report per executed step
    pub steps: Vec<StepReport>,
    /// Frames read during the grace period or left unclaimed at the end
    pub trailing: Vec<TelnetFrame>,
    /// Flagged peer behavior
    pub anomalies: Vec<Anomaly>,
    /// Total bytes written
    pub bytes_sent: u64,
    /// Total bytes read
    pub bytes_received: u64,
}

impl RunReport {
    /// Whether every step ran.
    pub fn is_complete(&self) -> bool {
        self.state == SequencerState::Complete
    }

    /// Steps that missed or failed validation.
    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| step.is_failure())
    }

    /// Whether the run completed with no failed steps.
    pub fn passed(&self) -> bool {
        self.is_complete() && self.failures().next().is_none()
    }
}

fn frame_list(frames: &[TelnetFrame]) -> String {
    let names: Vec<String> = frames.iter().map(ToString::to_string).collect();
    names.join(", ")
}

impl Display for StepReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: ", self.index, self.label)?;
        match &self.outcome {
            StepOutcome::Sent { bytes } => {
                write!(f, "sent {} bytes\n{}", bytes.len(), hexdump::format(bytes, "      "))
            }
            StepOutcome::Slept(duration) => write!(f, "slept {duration:?}"),
            StepOutcome::Matched { frames, verdict } => {
                write!(f, "matched {}", frame_list(frames))?;
                match verdict {
                    Some(verdict) => write!(f, " ({verdict})"),
                    None => Ok(()),
                }
            }
            StepOutcome::NoResponse { received } if received.is_empty() => {
                f.write_str("no response")
            }
            StepOutcome::NoResponse { received } => {
                write!(f, "no matching response, received {}", frame_list(received))
            }
        }
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Script {}: {}", self.script, self.state)?;
        for step in &self.steps {
            writeln!(f, "  {step}")?;
        }
        if !self.trailing.is_empty() {
            writeln!(f, "  trailing: {}", frame_list(&self.trailing))?;
        }
        for anomaly in &self.anomalies {
            writeln!(f, "  anomaly: {anomaly}")?;
        }
        let failures = self.failures().count();
        write!(
            f,
            "{} steps, {} failed, {} bytes sent, {} bytes received",
            self.steps.len(),
            failures,
            self.bytes_sent,
            self.bytes_received
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iacprobe_telnetcodec::TelnetOption;

    fn report(steps: Vec<StepReport>, state: SequencerState) -> RunReport {
        RunReport {
            script: "demo".to_string(),
            state,
            steps,
            trailing: vec![],
            anomalies: vec![],
            bytes_sent: 3,
            bytes_received: 0,
        }
    }

    #[test]
    fn failures_include_misses_and_failed_verdicts() {
        let steps = vec![
            StepReport {
                index: 0,
                label: "ask".to_string(),
                outcome: StepOutcome::Sent {
                    bytes: Bytes::from_static(&[255, 253, 24]),
                },
            },
            StepReport {
                index: 1,
                label: "reply".to_string(),
                outcome: StepOutcome::NoResponse { received: vec![] },
            },
            StepReport {
                index: 2,
                label: "ttype".to_string(),
                outcome: StepOutcome::Matched {
                    frames: vec![TelnetFrame::will(TelnetOption::TTYPE)],
                    verdict: Some(Verdict::Fail("empty terminal type".to_string())),
                },
            },
        ];
        let report = report(steps, SequencerState::Complete);
        assert!(report.is_complete());
        assert!(!report.passed());
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn display_summarizes() {
        let steps = vec![StepReport {
            index: 0,
            label: "reply".to_string(),
            outcome: StepOutcome::NoResponse { received: vec![] },
        }];
        let mut report = report(steps, SequencerState::Aborted { step: 0 });
        report.anomalies.push(Anomaly::UnknownCommand(7));
        let text = report.to_string();
        assert!(text.starts_with("Script demo: aborted at step 0\n"));
        assert!(text.contains("  [0] reply: no response\n"));
        assert!(text.contains("  anomaly: unknown command IAC 7\n"));
        assert!(text.ends_with("1 steps, 1 failed, 3 bytes sent, 0 bytes received"));
    }
}
