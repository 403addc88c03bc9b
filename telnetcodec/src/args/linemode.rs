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


//! Linemode Option (RFC 1184)

use crate::consts::option::{LINEMODE, linemode};
use crate::{CodecError, CodecResult, SubnegotiationErrorKind};
use bytes::Bytes;

/// The `MODE` mask byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinemodeMode(pub u8);

impl LinemodeMode {
    /// Client performs line editing.
    pub fn edit(self) -> bool {
        self.0 & linemode::MODE_EDIT != 0
    }

    /// Client traps signals locally.
    pub fn trapsig(self) -> bool {
        self.0 & linemode::MODE_TRAPSIG != 0
    }

    /// Acknowledges a mode change.
    pub fn ack(self) -> bool {
        self.0 & linemode::MODE_ACK != 0
    }

    /// Client expands tabs.
    pub fn soft_tab(self) -> bool {
        self.0 & linemode::MODE_SOFT_TAB != 0
    }

    /// Client echoes non-printables literally.
    pub fn lit_echo(self) -> bool {
        self.0 & linemode::MODE_LIT_ECHO != 0
    }

    /// Same mode with `ACK` set.
    pub fn acknowledged(self) -> Self {
        LinemodeMode(self.0 | linemode::MODE_ACK)
    }

    /// Mode bits ignoring `ACK`.
    pub fn without_ack(self) -> Self {
        LinemodeMode(self.0 & !linemode::MODE_ACK)
    }
}

impl std::fmt::Display for LinemodeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = [
            (self.edit(), "EDIT"),
            (self.trapsig(), "TRAPSIG"),
            (self.ack(), "ACK"),
            (self.soft_tab(), "SOFT_TAB"),
            (self.lit_echo(), "LIT_ECHO"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            write!(f, "0x{:02X}", self.0)
        } else {
            write!(f, "{}", set.join("|"))
        }
    }
}

/// One `SLC` triplet: function, modifier flags, character value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlcTriplet {
    /// SLC function code
    pub function: u8,
    /// Modifier flags
    pub modifiers: u8,
    /// Character bound to the function
    pub value: u8,
}

/// A `LINEMODE` subnegotiation payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinemodeMessage {
    /// `MODE <mask>`
    Mode(LinemodeMode),
    /// `FORWARDMASK <up to 32 bytes>`, kept raw
    ForwardMask(Bytes),
    /// `SLC <triplets>`
    Slc(Vec<SlcTriplet>),
}

impl LinemodeMessage {
    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        1 + match self {
            LinemodeMessage::Mode(_) => 1,
            LinemodeMessage::ForwardMask(mask) => mask.len(),
            LinemodeMessage::Slc(triplets) => triplets.len() * 3,
        }
    }

    /// Writes the payload to `writer`, returning the number of bytes written.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            LinemodeMessage::Mode(mode) => writer.write_all(&[linemode::MODE, mode.0])?,
            LinemodeMessage::ForwardMask(mask) => {
                writer.write_all(&[linemode::FORWARDMASK])?;
                writer.write_all(mask)?;
            }
            LinemodeMessage::Slc(triplets) => {
                writer.write_all(&[linemode::SLC])?;
                for triplet in triplets {
                    writer.write_all(&[triplet.function, triplet.modifiers, triplet.value])?;
                }
            }
        }
        Ok(self.len())
    }

    /// Decodes a `LINEMODE` payload.
    pub fn decode(payload: &[u8]) -> CodecResult<LinemodeMessage> {
        let Some((&command, rest)) = payload.split_first() else {
            return Err(insufficient(1, 0));
        };
        match command {
            linemode::MODE => match rest {
                [mask] => Ok(LinemodeMessage::Mode(LinemodeMode(*mask))),
                [] => Err(insufficient(2, payload.len())),
                _ => Err(unexpected(format!("MODE carries {} bytes", rest.len()))),
            },
            linemode::FORWARDMASK if rest.len() <= 32 => {
                Ok(LinemodeMessage::ForwardMask(Bytes::copy_from_slice(rest)))
            }
            linemode::FORWARDMASK => Err(unexpected(format!(
                "FORWARDMASK carries {} bytes",
                rest.len()
            ))),
            linemode::SLC if rest.len() % 3 == 0 => Ok(LinemodeMessage::Slc(
                rest.chunks_exact(3)
                    .map(|chunk| SlcTriplet {
                        function: chunk[0],
                        modifiers: chunk[1],
                        value: chunk[2],
                    })
                    .collect(),
            )),
            linemode::SLC => Err(unexpected(format!(
                "SLC length {} is not a multiple of 3",
                rest.len()
            ))),
            other => Err(CodecError::subnegotiation(
                LINEMODE,
                SubnegotiationErrorKind::InvalidCommand {
                    command: other,
                    expected: Some(vec![linemode::MODE, linemode::FORWARDMASK, linemode::SLC]),
                },
            )),
        }
    }
}

fn insufficient(required: usize, available: usize) -> CodecError {
    CodecError::subnegotiation(
        LINEMODE,
        SubnegotiationErrorKind::InsufficientData {
            required,
            available,
        },
    )
}

fn unexpected(reason: String) -> CodecError {
    CodecError::subnegotiation(LINEMODE, SubnegotiationErrorKind::UnexpectedData { reason })
}

impl std::fmt::Display for LinemodeMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinemodeMessage::Mode(mode) => write!(f, "MODE {mode}"),
            LinemodeMessage::ForwardMask(mask) => write!(f, "FORWARDMASK ({} bytes)", mask.len()),
            LinemodeMessage::Slc(triplets) => write!(f, "SLC ({} triplets)", triplets.len()),
        }
    }
}
