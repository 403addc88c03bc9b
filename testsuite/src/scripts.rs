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


//! Built-in scripts.

use crate::script::{
    environment_is, linemode_mode, terminal_speed_is, terminal_type_is, window_size,
};
use crate::{Expectation, ScriptKind, Script, ScriptStep};
use bytes::Bytes;
use iacprobe_telnetcodec::consts::option::{environ, linemode, ttype};
use iacprobe_telnetcodec::{TelnetCommand, TelnetFrame, TelnetOption};
use std::time::Duration;

/// Pause after an unsolicited command that gets no reply.
pub const DIGEST_PAUSE: Duration = Duration::from_millis(100);

/// Options the subnegotiation script asks the client to enable. `NAWS` is last so the
/// client's unsolicited window size report follows every other reply.
pub const SUBNEGOTIATED_OPTIONS: [TelnetOption; 5] = [
    TelnetOption::TTYPE,
    TelnetOption::TSPEED,
    TelnetOption::Environment,
    TelnetOption::Linemode,
    TelnetOption::NAWS,
];

impl ScriptKind {
    /// Build the script with every expectation bounded by `response_timeout`.
    pub fn build(self, response_timeout: Duration) -> Script {
        match self {
            ScriptKind::Basic => basic(response_timeout),
            ScriptKind::Subnegotiation => subnegotiation(response_timeout),
        }
    }
}

/// RFC 854 framing checks.
///
/// Sends a welcome line, `IAC NOP`, data containing an escaped `IAC`, `IAC AYT`,
/// `IAC WILL ECHO`, and lines ending in `CR NUL` and `CR LF`, waiting for the client's
/// answer to `AYT` and `WILL ECHO`.
pub fn basic(response_timeout: Duration) -> Script {
    Script::new("basic")
        .step(ScriptStep::send(
            "welcome",
            TelnetFrame::data(&b"Welcome to Telnet Test Server\r\n"[..]),
        ))
        .step(ScriptStep::send(
            "IAC NOP",
            TelnetFrame::Command(TelnetCommand::NoOperation),
        ))
        .step(ScriptStep::sleep("let the client digest NOP", DIGEST_PAUSE))
        .step(ScriptStep::send(
            "data with escaped IAC",
            TelnetFrame::data(&b"Hello\xFFWorld\r\n"[..]),
        ))
        .step(ScriptStep::send(
            "IAC AYT",
            TelnetFrame::Command(TelnetCommand::AreYouThere),
        ))
        .step(ScriptStep::expect(
            "reply to AYT",
            response_timeout,
            Expectation::data(Bytes::new()),
        ))
        .step(ScriptStep::send(
            "IAC WILL ECHO",
            TelnetFrame::will(TelnetOption::Echo),
        ))
        .step(ScriptStep::expect(
            "reply to WILL ECHO",
            response_timeout,
            Expectation::negotiation(TelnetOption::Echo),
        ))
        .step(ScriptStep::send(
            "CR NUL",
            TelnetFrame::data(&b"Line1\r\0Line2\r\n"[..]),
        ))
        .step(ScriptStep::send(
            "CR LF",
            TelnetFrame::data(&b"Line3\r\nLine4\r\n"[..]),
        ))
}

fn send_request(option: TelnetOption, payload: &'static [u8]) -> TelnetFrame {
    TelnetFrame::Subnegotiation(option, Bytes::from_static(payload))
}

/// Subnegotiation checks for TTYPE, TSPEED, ENVIRON, NAWS and LINEMODE.
pub fn subnegotiation(response_timeout: Duration) -> Script {
    let mut script = Script::new("subnegotiation").step(ScriptStep::send(
        "welcome",
        TelnetFrame::data(&b"Welcome to Subnegotiation Test Server\r\n\r\n"[..]),
    ));
    for option in SUBNEGOTIATED_OPTIONS {
        script = script.step(ScriptStep::send(
            format!("IAC DO {option}"),
            TelnetFrame::do_(option),
        ));
    }
    script
        .step(ScriptStep::expect(
            "option replies",
            response_timeout,
            Expectation::negotiations(&SUBNEGOTIATED_OPTIONS),
        ))
        .step(ScriptStep::expect(
            "window size report",
            response_timeout,
            Expectation::subnegotiation(TelnetOption::NAWS).with_validator(window_size),
        ))
        .step(ScriptStep::send(
            "TTYPE SEND",
            send_request(TelnetOption::TTYPE, &[ttype::SEND]),
        ))
        .step(ScriptStep::expect(
            "TTYPE IS",
            response_timeout,
            Expectation::subnegotiation(TelnetOption::TTYPE).with_validator(terminal_type_is),
        ))
        .step(ScriptStep::send(
            "TSPEED SEND",
            send_request(TelnetOption::TSPEED, &[ttype::SEND]),
        ))
        .step(ScriptStep::expect(
            "TSPEED IS",
            response_timeout,
            Expectation::subnegotiation(TelnetOption::TSPEED).with_validator(terminal_speed_is),
        ))
        .step(ScriptStep::send(
            "ENVIRON SEND",
            send_request(TelnetOption::Environment, &[environ::SEND]),
        ))
        .step(ScriptStep::expect(
            "ENVIRON IS",
            response_timeout,
            Expectation::subnegotiation(TelnetOption::Environment).with_validator(environment_is),
        ))
        .step(ScriptStep::send(
            "LINEMODE MODE EDIT",
            send_request(TelnetOption::Linemode, &[linemode::MODE, linemode::MODE_EDIT]),
        ))
        .step(ScriptStep::expect(
            "LINEMODE MODE ACK",
            response_timeout,
            Expectation::frames("LINEMODE MODE", 1, |frame| {
                matches!(
                    frame,
                    TelnetFrame::Subnegotiation(TelnetOption::Linemode, payload)
                        if payload.first() == Some(&linemode::MODE)
                )
            })
            .with_validator(linemode_mode),
        ))
        .step(ScriptStep::send(
            "closing line",
            TelnetFrame::data(&b"\r\nAll subnegotiations sent!\r\n"[..]),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptPayload;

    #[test]
    fn basic_script_shape() {
        let script = basic(Duration::from_millis(500));
        assert_eq!(script.name(), "basic");
        let sleeps = script
            .steps()
            .iter()
            .filter(|step| matches!(step, ScriptStep::Sleep { .. }))
            .count();
        assert_eq!(sleeps, 1);
        let ScriptStep::Send { payload, .. } = &script.steps()[3] else {
            panic!("step 3 should send data");
        };
        assert_eq!(
            &payload.to_bytes().unwrap()[..],
            b"Hello\xFF\xFFWorld\r\n",
            "literal IAC is doubled on the wire"
        );
    }

    #[test]
    fn subnegotiation_requests_are_bit_exact() {
        let script = ScriptKind::Subnegotiation.build(Duration::from_millis(500));
        let sent: Vec<Vec<u8>> = script
            .steps()
            .iter()
            .filter_map(|step| match step {
                ScriptStep::Send {
                    payload: payload @ ScriptPayload::Frame(TelnetFrame::Subnegotiation(..)),
                    ..
                } => Some(payload.to_bytes().unwrap().to_vec()),
                _ => None,
            })
            .collect();
        assert_eq!(
            sent,
            vec![
                vec![255, 250, 24, 1, 255, 240],
                vec![255, 250, 32, 1, 255, 240],
                vec![255, 250, 36, 1, 255, 240],
                vec![255, 250, 34, 1, 1, 255, 240],
            ]
        );
    }

    #[test]
    fn every_expectation_uses_response_timeout() {
        let timeout = Duration::from_millis(321);
        for kind in [ScriptKind::Basic, ScriptKind::Subnegotiation] {
            for step in kind.build(timeout).steps() {
                if let ScriptStep::ExpectWithin { timeout: t, .. } = step {
                    assert_eq!(*t, timeout);
                }
            }
        }
    }
}
