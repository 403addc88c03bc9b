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


//! Terminal Speed (RFC 1079)
//!

use crate::consts::option::{TSPEED, ttype};
use crate::{CodecError, CodecResult, SubnegotiationErrorKind};

/// A `TSPEED` subnegotiation payload.
///
/// Uses the same `SEND`/`IS` codes as terminal type. The reported value is the ASCII text
/// `<transmit>,<receive>` in bits per second.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminalSpeedMessage {
    /// `SEND`: request the terminal speed
    Send,
    /// `IS <transmit>,<receive>`
    Is {
        /// Transmit speed in bits per second
        transmit: u32,
        /// Receive speed in bits per second
        receive: u32,
    },
}

impl TerminalSpeedMessage {
    /// `IS` report with the given speeds.
    pub fn is(transmit: u32, receive: u32) -> TerminalSpeedMessage {
        TerminalSpeedMessage::Is { transmit, receive }
    }

    fn speed_text(&self) -> Option<String> {
        match self {
            TerminalSpeedMessage::Send => None,
            TerminalSpeedMessage::Is { transmit, receive } => Some(format!("{transmit},{receive}")),
        }
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        1 + self.speed_text().map_or(0, |text| text.len())
    }

    /// Writes the payload to `writer`, returning the number of bytes written.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self.speed_text() {
            None => {
                writer.write_all(&[ttype::SEND])?;
                Ok(1)
            }
            Some(text) => {
                writer.write_all(&[ttype::IS])?;
                writer.write_all(text.as_bytes())?;
                Ok(1 + text.len())
            }
        }
    }

    /// Decodes a `TSPEED` payload.
    ///
    /// # Example
    /// ```
    /// use iacprobe_telnetcodec::tspeed::TerminalSpeedMessage;
    ///
    /// assert_eq!(
    ///     TerminalSpeedMessage::decode(b"\x0038400,19200").unwrap(),
    ///     TerminalSpeedMessage::is(38400, 19200)
    /// );
    /// ```
    pub fn decode(payload: &[u8]) -> CodecResult<TerminalSpeedMessage> {
        match payload.split_first() {
            None => Err(CodecError::subnegotiation(
                TSPEED,
                SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            )),
            Some((&ttype::SEND, [])) => Ok(TerminalSpeedMessage::Send),
            Some((&ttype::SEND, rest)) => Err(invalid_value(format!(
                "{} bytes after SEND",
                rest.len()
            ))),
            Some((&ttype::IS, text)) => {
                let text = std::str::from_utf8(text)
                    .map_err(|_| invalid_value("speed is not ASCII".to_string()))?;
                let (transmit, receive) = text
                    .split_once(',')
                    .ok_or_else(|| invalid_value(format!("{text:?} is not <tx>,<rx>")))?;
                let parse = |value: &str| {
                    value
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| invalid_value(format!("{value:?} is not a speed")))
                };
                Ok(TerminalSpeedMessage::Is {
                    transmit: parse(transmit)?,
                    receive: parse(receive)?,
                })
            }
            Some((&command, _)) => Err(CodecError::subnegotiation(
                TSPEED,
                SubnegotiationErrorKind::InvalidCommand {
                    command,
                    expected: Some(vec![ttype::IS, ttype::SEND]),
                },
            )),
        }
    }
}

fn invalid_value(reason: String) -> CodecError {
    CodecError::subnegotiation(TSPEED, SubnegotiationErrorKind::UnexpectedData { reason })
}

impl std::fmt::Display for TerminalSpeedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalSpeedMessage::Send => f.write_str("SEND"),
            TerminalSpeedMessage::Is { transmit, receive } => {
                write!(f, "IS {transmit},{receive}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_send() {
        assert_eq!(
            TerminalSpeedMessage::decode(&[1]).unwrap(),
            TerminalSpeedMessage::Send
        );
    }

    #[test]
    fn decode_rejects_garbage_speed() {
        assert!(TerminalSpeedMessage::decode(b"\x00fast").is_err());
        assert!(TerminalSpeedMessage::decode(b"\x009600,").is_err());
    }

    #[test]
    fn write_is() {
        let mut out = Vec::new();
        let written = TerminalSpeedMessage::is(38400, 38400).write(&mut out).unwrap();
        assert_eq!(out, b"\x0038400,38400");
        assert_eq!(written, out.len());
    }
}
