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


use crate::TelnetOption;
use crate::args::environ::EnvironmentMessage;
use crate::args::linemode::LinemodeMessage;
use crate::args::naws::WindowSize;
use crate::args::tspeed::TerminalSpeedMessage;
use crate::args::ttype::TerminalTypeMessage;
use crate::result::CodecResult;
use bytes::{BufMut, Bytes};
use std::fmt::Formatter;

pub mod environ;
pub mod linemode;
pub mod naws;
pub mod tspeed;
pub mod ttype;

///
/// Telnet Subnegotiation Argument
///
/// The interpreted payload of `IAC SB <option> <payload> IAC SE`. Payloads handled here are
/// always unescaped; doubling of `0xFF` happens when the surrounding frame is encoded.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetArgument {
    /// Terminal type request or report (RFC 1091).
    TerminalType(TerminalTypeMessage),
    /// Terminal speed request or report (RFC 1079).
    TerminalSpeed(TerminalSpeedMessage),
    /// Environment variable request or report (RFC 1408).
    Environment(EnvironmentMessage),
    /// A subnegotiation for the window size (RFC 1073).
    WindowSize(WindowSize),
    /// Linemode MODE, FORWARDMASK or SLC (RFC 1184).
    Linemode(LinemodeMessage),
    /// A subnegotiation for an option without a dedicated interpretation.
    Unknown(TelnetOption, Bytes),
}

impl TelnetArgument {
    /// Interprets a subnegotiation payload for `option`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CodecError::SubnegotiationError`] when the payload does not follow
    /// the option's subnegotiation format.
    ///
    /// # Examples
    ///
    /// ```
    /// use iacprobe_telnetcodec::{TelnetArgument, TelnetOption};
    /// use iacprobe_telnetcodec::ttype::TerminalTypeMessage;
    ///
    /// let arg = TelnetArgument::decode(TelnetOption::TTYPE, b"\x00VT100").unwrap();
    /// assert_eq!(arg, TelnetArgument::TerminalType(TerminalTypeMessage::Is("VT100".into())));
    /// ```
    pub fn decode(option: TelnetOption, payload: &[u8]) -> CodecResult<TelnetArgument> {
        Ok(match option {
            TelnetOption::TTYPE => TelnetArgument::TerminalType(TerminalTypeMessage::decode(payload)?),
            TelnetOption::TSPEED => {
                TelnetArgument::TerminalSpeed(TerminalSpeedMessage::decode(payload)?)
            }
            TelnetOption::Environment => {
                TelnetArgument::Environment(EnvironmentMessage::decode(payload)?)
            }
            TelnetOption::NAWS => TelnetArgument::WindowSize(WindowSize::decode(&mut &payload[..])?),
            TelnetOption::Linemode => TelnetArgument::Linemode(LinemodeMessage::decode(payload)?),
            other => TelnetArgument::Unknown(other, Bytes::copy_from_slice(payload)),
        })
    }

    /// Returns the encoded byte length of this `TelnetArgument`, before `IAC` escaping.
    pub fn len(&self) -> usize {
        match self {
            TelnetArgument::TerminalType(inner) => inner.len(),
            TelnetArgument::TerminalSpeed(inner) => inner.len(),
            TelnetArgument::Environment(inner) => inner.len(),
            TelnetArgument::WindowSize(inner) => inner.len(),
            TelnetArgument::Linemode(inner) => inner.len(),
            TelnetArgument::Unknown(_option, inner) => inner.len(),
        }
    }

    /// Whether the encoded payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes this `TelnetArgument` to a `BufMut` buffer.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use iacprobe_telnetcodec::naws::WindowSize;
    /// use iacprobe_telnetcodec::TelnetArgument;
    ///
    /// let arg = TelnetArgument::WindowSize(WindowSize::new(80, 24));
    /// let mut buffer = BytesMut::new();
    /// let written = arg.encode(&mut buffer)?;
    /// assert_eq!(written, 4);
    /// assert_eq!(&buffer[..], &[0, 80, 0, 24]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes this `TelnetArgument` to a `std::io::Write` writer.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            TelnetArgument::TerminalType(inner) => inner.write(writer),
            TelnetArgument::TerminalSpeed(inner) => inner.write(writer),
            TelnetArgument::Environment(inner) => inner.write(writer),
            TelnetArgument::WindowSize(inner) => inner.write(writer),
            TelnetArgument::Linemode(inner) => inner.write(writer),
            TelnetArgument::Unknown(_option, payload) => {
                writer.write_all(payload)?;
                Ok(payload.len())
            }
        }
    }

    /// Returns the `TelnetOption` associated with this argument.
    ///
    /// ```
    /// use iacprobe_telnetcodec::{TelnetArgument, TelnetOption};
    /// use iacprobe_telnetcodec::naws::WindowSize;
    ///
    /// let arg = TelnetArgument::WindowSize(WindowSize::new(80, 24));
    /// assert_eq!(arg.option(), TelnetOption::NAWS);
    /// ```
    pub fn option(&self) -> TelnetOption {
        match self {
            TelnetArgument::TerminalType(_) => TelnetOption::TTYPE,
            TelnetArgument::TerminalSpeed(_) => TelnetOption::TSPEED,
            TelnetArgument::Environment(_) => TelnetOption::Environment,
            TelnetArgument::WindowSize(_) => TelnetOption::NAWS,
            TelnetArgument::Linemode(_) => TelnetOption::Linemode,
            TelnetArgument::Unknown(option, _) => *option,
        }
    }
}

impl std::fmt::Display for TelnetArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetArgument::TerminalType(v) => write!(f, "TTYPE {v}"),
            TelnetArgument::TerminalSpeed(v) => write!(f, "TSPEED {v}"),
            TelnetArgument::Environment(v) => write!(f, "ENVIRON {v}"),
            TelnetArgument::WindowSize(v) => write!(f, "NAWS {v}"),
            TelnetArgument::Linemode(v) => write!(f, "LINEMODE {v}"),
            TelnetArgument::Unknown(o, v) => write!(f, "{o}-{v:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_option_keeps_payload() {
        let arg = TelnetArgument::decode(TelnetOption::Unknown(70), &[1, 2, 255]).unwrap();
        assert_eq!(
            arg,
            TelnetArgument::Unknown(TelnetOption::Unknown(70), Bytes::from_static(&[1, 2, 255]))
        );
        let mut out = Vec::new();
        assert_eq!(arg.write(&mut out).unwrap(), 3);
        assert_eq!(out, vec![1, 2, 255]);
    }

    #[test]
    fn options_follow_variants() {
        assert_eq!(
            TelnetArgument::TerminalType(TerminalTypeMessage::Send).option(),
            TelnetOption::TTYPE
        );
        assert_eq!(
            TelnetArgument::TerminalSpeed(TerminalSpeedMessage::Send).option(),
            TelnetOption::TSPEED
        );
        assert_eq!(
            TelnetArgument::Environment(EnvironmentMessage::Send(vec![])).option(),
            TelnetOption::Environment
        );
    }

    #[test]
    fn len_matches_written_bytes() {
        let args = vec![
            TelnetArgument::TerminalType(TerminalTypeMessage::Is("xterm".into())),
            TelnetArgument::TerminalSpeed(TerminalSpeedMessage::is(38400, 9600)),
            TelnetArgument::WindowSize(WindowSize::new(132, 43)),
        ];
        for arg in args {
            let mut out = Vec::new();
            let written = arg.write(&mut out).unwrap();
            assert_eq!(written, arg.len());
            assert_eq!(out.len(), arg.len());
        }
    }
}
