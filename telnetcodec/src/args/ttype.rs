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


//! Terminal Type (RFC 1091)
//!

use crate::consts::option::{TTYPE, ttype};
use crate::{CodecError, CodecResult, SubnegotiationErrorKind};

/// A `TTYPE` subnegotiation payload.
///
/// The server sends `SEND`; the client answers `IS <name>`. Clients that support several
/// terminal types cycle through them on successive `SEND` requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminalTypeMessage {
    /// `SEND`: request the next terminal type
    Send,
    /// `IS <name>`: the reported terminal type
    Is(String),
}

impl TerminalTypeMessage {
    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        match self {
            TerminalTypeMessage::Send => 1,
            TerminalTypeMessage::Is(name) => 1 + name.len(),
        }
    }

    /// Writes the payload to `writer`, returning the number of bytes written.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            TerminalTypeMessage::Send => writer.write_all(&[ttype::SEND])?,
            TerminalTypeMessage::Is(name) => {
                writer.write_all(&[ttype::IS])?;
                writer.write_all(name.as_bytes())?;
            }
        }
        Ok(self.len())
    }

    /// Decodes a `TTYPE` payload.
    ///
    /// # Example
    /// ```
    /// use iacprobe_telnetcodec::ttype::TerminalTypeMessage;
    ///
    /// assert_eq!(TerminalTypeMessage::decode(&[1]).unwrap(), TerminalTypeMessage::Send);
    /// assert_eq!(
    ///     TerminalTypeMessage::decode(b"\x00XTERM-256COLOR").unwrap(),
    ///     TerminalTypeMessage::Is("XTERM-256COLOR".to_string())
    /// );
    /// ```
    pub fn decode(payload: &[u8]) -> CodecResult<TerminalTypeMessage> {
        match payload.split_first() {
            None => Err(CodecError::subnegotiation(
                TTYPE,
                SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            )),
            Some((&ttype::SEND, [])) => Ok(TerminalTypeMessage::Send),
            Some((&ttype::SEND, rest)) => Err(CodecError::subnegotiation(
                TTYPE,
                SubnegotiationErrorKind::UnexpectedData {
                    reason: format!("{} bytes after SEND", rest.len()),
                },
            )),
            Some((&ttype::IS, name)) => Ok(TerminalTypeMessage::Is(
                String::from_utf8_lossy(name).into_owned(),
            )),
            Some((&command, _)) => Err(CodecError::subnegotiation(
                TTYPE,
                SubnegotiationErrorKind::InvalidCommand {
                    command,
                    expected: Some(vec![ttype::IS, ttype::SEND]),
                },
            )),
        }
    }
}

impl std::fmt::Display for TerminalTypeMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalTypeMessage::Send => f.write_str("SEND"),
            TerminalTypeMessage::Is(name) => write!(f, "IS {name:?}"),
        }
    }
}
