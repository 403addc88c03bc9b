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


//! Script steps, expectations and reply verdicts.

use bytes::Bytes;
use iacprobe_telnetcodec::environ::EnvironmentMessage;
use iacprobe_telnetcodec::linemode::LinemodeMessage;
use iacprobe_telnetcodec::tspeed::TerminalSpeedMessage;
use iacprobe_telnetcodec::ttype::TerminalTypeMessage;
use iacprobe_telnetcodec::{CodecResult, TelnetArgument, TelnetFrame, TelnetOption, encode_frame};
use std::sync::Arc;
use std::time::Duration;

/// Bytes a `Send` step writes: a frame to encode, or raw bytes passed through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptPayload {
    /// Encoded with IAC escaping before sending
    Frame(TelnetFrame),
    /// Sent exactly as given
    Raw(Bytes),
}

impl ScriptPayload {
    /// Wire bytes for this payload.
    ///
    /// Fails for a command frame that cannot be written as `IAC <command>`; use `Raw` for those.
    pub fn to_bytes(&self) -> CodecResult<Bytes> {
        match self {
            ScriptPayload::Frame(frame) => encode_frame(frame),
            ScriptPayload::Raw(raw) => Ok(raw.clone()),
        }
    }
}

impl From<TelnetFrame> for ScriptPayload {
    fn from(frame: TelnetFrame) -> Self {
        ScriptPayload::Frame(frame)
    }
}

impl From<Bytes> for ScriptPayload {
    fn from(raw: Bytes) -> Self {
        ScriptPayload::Raw(raw)
    }
}

impl std::fmt::Display for ScriptPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptPayload::Frame(frame) => write!(f, "{frame}"),
            ScriptPayload::Raw(raw) => write!(f, "RAW {:02X?}", &raw[..]),
        }
    }
}

/// Judgement of a matched reply's content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Reply is well formed; carries what it reported
    Pass(String),
    /// Reply arrived but is not what a conforming client sends
    Fail(String),
}

impl Verdict {
    /// Whether this is a `Pass`.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass(_))
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass(detail) => write!(f, "PASS {detail}"),
            Verdict::Fail(detail) => write!(f, "FAIL {detail}"),
        }
    }
}

type Matcher = dyn Fn(&[TelnetFrame]) -> Option<usize> + Send + Sync;
type Validator = dyn Fn(&[TelnetFrame]) -> Verdict + Send + Sync;

///
/// What an `ExpectWithin` step waits for.
///
/// The matcher looks at the frames received so far and returns the length of the prefix
/// that satisfies it. An optional validator then judges the matched frames; the frames are
/// recorded either way, so a failed verdict still shows exactly what the client sent.
///
#[derive(Clone)]
pub struct Expectation {
    description: String,
    matcher: Arc<Matcher>,
    validator: Option<Arc<Validator>>,
}

impl Expectation {
    /// Expectation from an arbitrary prefix matcher.
    pub fn custom<F>(description: impl Into<String>, matcher: F) -> Self
    where
        F: Fn(&[TelnetFrame]) -> Option<usize> + Send + Sync + 'static,
    {
        Expectation {
            description: description.into(),
            matcher: Arc::new(matcher),
            validator: None,
        }
    }

    /// Any frame at all.
    pub fn any() -> Self {
        Expectation::custom("any frame", |frames| (!frames.is_empty()).then_some(1))
    }

    /// The prefix through the first frame equal to `expected`.
    pub fn frame(expected: TelnetFrame) -> Self {
        let description = expected.to_string();
        Expectation::custom(description, move |frames| {
            frames
                .iter()
                .position(|frame| *frame == expected)
                .map(|index| index + 1)
        })
    }

    /// The prefix through the `count`th frame satisfying `predicate`.
    pub fn frames<P>(description: impl Into<String>, count: usize, predicate: P) -> Self
    where
        P: Fn(&TelnetFrame) -> bool + Send + Sync + 'static,
    {
        let count = count.max(1);
        Expectation::custom(description, move |frames| {
            frames
                .iter()
                .enumerate()
                .filter(|(_, frame)| predicate(frame))
                .nth(count - 1)
                .map(|(index, _)| index + 1)
        })
    }

    /// Any `WILL`, `WONT`, `DO` or `DONT` for `option`.
    pub fn negotiation(option: TelnetOption) -> Self {
        Expectation::frames(format!("negotiation for {option}"), 1, move |frame| {
            matches!(frame, TelnetFrame::Negotiation(_, o) if *o == option)
        })
    }

    /// A negotiation reply for every one of `options`, in any order.
    pub fn negotiations(options: &[TelnetOption]) -> Self {
        let options = options.to_vec();
        let names: Vec<String> = options.iter().map(ToString::to_string).collect();
        Expectation::custom(
            format!("negotiation for {}", names.join(", ")),
            move |frames| {
                let mut outstanding = options.clone();
                for (index, frame) in frames.iter().enumerate() {
                    if let TelnetFrame::Negotiation(_, option) = frame {
                        outstanding.retain(|o| o != option);
                        if outstanding.is_empty() {
                            return Some(index + 1);
                        }
                    }
                }
                None
            },
        )
    }

    /// A subnegotiation for `option`.
    pub fn subnegotiation(option: TelnetOption) -> Self {
        Expectation::frames(format!("IAC SB {option}"), 1, move |frame| {
            matches!(frame, TelnetFrame::Subnegotiation(o, _) if *o == option)
        })
    }

    /// Data containing `needle`; an empty needle accepts any data.
    pub fn data(needle: impl Into<Bytes>) -> Self {
        let needle = needle.into();
        let description = if needle.is_empty() {
            "any data".to_string()
        } else {
            format!("data containing {:?}", needle)
        };
        Expectation::frames(description, 1, move |frame| match frame {
            TelnetFrame::Data(data) => {
                needle.is_empty() || data.windows(needle.len()).any(|window| window == &needle[..])
            }
            _ => false,
        })
    }

    /// Attaches a validator run over the matched frames.
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(&[TelnetFrame]) -> Verdict + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Human readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Length of the matched prefix of `frames`, if the expectation is met.
    pub fn matches(&self, frames: &[TelnetFrame]) -> Option<usize> {
        (self.matcher)(frames).map(|len| len.min(frames.len()))
    }

    /// Verdict for the matched frames, if a validator is attached.
    pub fn validate(&self, frames: &[TelnetFrame]) -> Option<Verdict> {
        self.validator.as_ref().map(|validator| validator(frames))
    }
}

impl std::fmt::Debug for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation")
            .field("description", &self.description)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// One step of a script.
#[derive(Clone, Debug)]
pub enum ScriptStep {
    /// Write a payload
    Send {
        /// Step label
        label: String,
        /// Bytes to write
        payload: ScriptPayload,
    },
    /// Pause without reading
    Sleep {
        /// Step label
        label: String,
        /// Pause length
        duration: Duration,
    },
    /// Read until the expectation is met or the timeout elapses
    ExpectWithin {
        /// Step label
        label: String,
        /// Deadline measured from the start of the step
        timeout: Duration,
        /// What to wait for
        expectation: Expectation,
    },
}

impl ScriptStep {
    /// `Send` step.
    pub fn send(label: impl Into<String>, payload: impl Into<ScriptPayload>) -> Self {
        ScriptStep::Send {
            label: label.into(),
            payload: payload.into(),
        }
    }

    /// `Sleep` step.
    pub fn sleep(label: impl Into<String>, duration: Duration) -> Self {
        ScriptStep::Sleep {
            label: label.into(),
            duration,
        }
    }

    /// `ExpectWithin` step.
    pub fn expect(label: impl Into<String>, timeout: Duration, expectation: Expectation) -> Self {
        ScriptStep::ExpectWithin {
            label: label.into(),
            timeout,
            expectation,
        }
    }

    /// Step label.
    pub fn label(&self) -> &str {
        match self {
            ScriptStep::Send { label, .. }
            | ScriptStep::Sleep { label, .. }
            | ScriptStep::ExpectWithin { label, .. } => label,
        }
    }
}

/// An ordered, immutable list of steps.
#[derive(Clone, Debug, Default)]
pub struct Script {
    name: String,
    steps: Vec<ScriptStep>,
}

impl Script {
    /// Empty script.
    pub fn new(name: impl Into<String>) -> Self {
        Script {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step.
    pub fn step(mut self, step: ScriptStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Script name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

// ============================================================================
// Validators
// ============================================================================

/// Decodes the last subnegotiation for `option` among `frames`.
fn last_argument(
    frames: &[TelnetFrame],
    option: TelnetOption,
) -> Result<TelnetArgument, Verdict> {
    let frame = frames
        .iter()
        .rev()
        .find(|frame| matches!(frame, TelnetFrame::Subnegotiation(o, _) if *o == option))
        .ok_or_else(|| Verdict::Fail(format!("no {option} subnegotiation")))?;
    match frame.argument() {
        Some(Ok(argument)) => Ok(argument),
        Some(Err(error)) => Err(Verdict::Fail(format!("{frame}: {error}"))),
        None => Err(Verdict::Fail(format!("no {option} subnegotiation"))),
    }
}

/// Passes on `TTYPE IS <name>` with a non-empty name.
pub fn terminal_type_is(frames: &[TelnetFrame]) -> Verdict {
    match last_argument(frames, TelnetOption::TTYPE) {
        Ok(TelnetArgument::TerminalType(TerminalTypeMessage::Is(name))) if !name.is_empty() => {
            Verdict::Pass(format!("terminal type {name}"))
        }
        Ok(TelnetArgument::TerminalType(TerminalTypeMessage::Is(_))) => {
            Verdict::Fail("empty terminal type".to_string())
        }
        Ok(other) => Verdict::Fail(format!("expected TTYPE IS, got {other}")),
        Err(verdict) => verdict,
    }
}

/// Passes on `TSPEED IS <tx>,<rx>`.
pub fn terminal_speed_is(frames: &[TelnetFrame]) -> Verdict {
    match last_argument(frames, TelnetOption::TSPEED) {
        Ok(TelnetArgument::TerminalSpeed(TerminalSpeedMessage::Is { transmit, receive })) => {
            Verdict::Pass(format!("terminal speed {transmit},{receive}"))
        }
        Ok(other) => Verdict::Fail(format!("expected TSPEED IS, got {other}")),
        Err(verdict) => verdict,
    }
}

/// Passes on `ENVIRON IS` or `ENVIRON INFO`.
pub fn environment_is(frames: &[TelnetFrame]) -> Verdict {
    match last_argument(frames, TelnetOption::Environment) {
        Ok(TelnetArgument::Environment(
            message @ (EnvironmentMessage::Is(_) | EnvironmentMessage::Info(_)),
        )) => {
            let names: Vec<String> = message
                .variables()
                .iter()
                .map(ToString::to_string)
                .collect();
            Verdict::Pass(format!("environment [{}]", names.join(", ")))
        }
        Ok(other) => Verdict::Fail(format!("expected ENVIRON IS, got {other}")),
        Err(verdict) => verdict,
    }
}

/// Passes on a well-formed four byte `NAWS` report.
pub fn window_size(frames: &[TelnetFrame]) -> Verdict {
    match last_argument(frames, TelnetOption::NAWS) {
        Ok(TelnetArgument::WindowSize(size)) => {
            Verdict::Pass(format!("window {}x{}", size.cols, size.rows))
        }
        Ok(other) => Verdict::Fail(format!("expected NAWS, got {other}")),
        Err(verdict) => verdict,
    }
}

/// Passes on `LINEMODE MODE` with the `ACK` bit set.
pub fn linemode_mode(frames: &[TelnetFrame]) -> Verdict {
    match last_argument(frames, TelnetOption::Linemode) {
        Ok(TelnetArgument::Linemode(LinemodeMessage::Mode(mode))) if mode.ack() => {
            Verdict::Pass(format!("mode {mode}"))
        }
        Ok(TelnetArgument::Linemode(LinemodeMessage::Mode(mode))) => {
            Verdict::Fail(format!("mode {mode} without ACK"))
        }
        Ok(other) => Verdict::Fail(format!("expected LINEMODE MODE, got {other}")),
        Err(verdict) => verdict,
    }
}
