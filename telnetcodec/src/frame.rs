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


use crate::args::TelnetArgument;
use crate::{CodecResult, NegotiationVerb, TelnetCommand, TelnetOption};
use bytes::{Bytes, BytesMut};

///
/// A single unit of the Telnet byte stream.
///
/// `Data` and `Subnegotiation` payloads are always stored unescaped: a literal `0xFF` is one
/// byte here and two bytes on the wire.
///
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TelnetFrame {
    /// Literal application data
    Data(Bytes),
    /// `IAC <WILL|WONT|DO|DONT> <option>`
    Negotiation(NegotiationVerb, TelnetOption),
    /// `IAC <command>`
    Command(TelnetCommand),
    /// `IAC SB <option> <payload> IAC SE`
    Subnegotiation(TelnetOption, Bytes),
    /// Leading raw bytes of a subnegotiation that ran past the size limit without `IAC SE`
    Malformed(Bytes),
}

impl TelnetFrame {
    /// Data frame from anything byte-like.
    pub fn data(bytes: impl Into<Bytes>) -> TelnetFrame {
        TelnetFrame::Data(bytes.into())
    }

    /// `IAC WILL <option>`
    pub fn will(option: TelnetOption) -> TelnetFrame {
        TelnetFrame::Negotiation(NegotiationVerb::Will, option)
    }

    /// `IAC WONT <option>`
    pub fn wont(option: TelnetOption) -> TelnetFrame {
        TelnetFrame::Negotiation(NegotiationVerb::Wont, option)
    }

    /// `IAC DO <option>`
    pub fn do_(option: TelnetOption) -> TelnetFrame {
        TelnetFrame::Negotiation(NegotiationVerb::Do, option)
    }

    /// `IAC DONT <option>`
    pub fn dont(option: TelnetOption) -> TelnetFrame {
        TelnetFrame::Negotiation(NegotiationVerb::Dont, option)
    }

    /// Subnegotiation frame carrying an encoded [`TelnetArgument`].
    pub fn subnegotiation(argument: &TelnetArgument) -> CodecResult<TelnetFrame> {
        let mut payload = BytesMut::with_capacity(argument.len());
        argument.encode(&mut payload)?;
        Ok(TelnetFrame::Subnegotiation(argument.option(), payload.freeze()))
    }

    /// Interprets a `Subnegotiation` frame payload, `None` for any other frame.
    pub fn argument(&self) -> Option<CodecResult<TelnetArgument>> {
        match self {
            TelnetFrame::Subnegotiation(option, payload) => {
                Some(TelnetArgument::decode(*option, payload))
            }
            _ => None,
        }
    }

    /// The option this frame talks about, if any.
    pub fn option(&self) -> Option<TelnetOption> {
        match self {
            TelnetFrame::Negotiation(_, option) | TelnetFrame::Subnegotiation(option, _) => {
                Some(*option)
            }
            _ => None,
        }
    }

    /// Whether this is a `Data` frame.
    pub fn is_data(&self) -> bool {
        matches!(self, TelnetFrame::Data(_))
    }

    /// Merges runs of adjacent `Data` frames into one and drops empty ones.
    ///
    /// Chunked parsing may split one run of data at read boundaries; two frame sequences
    /// describe the same stream exactly when their coalesced forms are equal.
    pub fn coalesce<I>(frames: I) -> Vec<TelnetFrame>
    where
        I: IntoIterator<Item = TelnetFrame>,
    {
        let mut out = Vec::new();
        for frame in frames {
            push_coalesced(&mut out, frame);
        }
        out
    }
}

/// Appends `frame` to `frames`, merging it into a trailing `Data` frame when both are data.
pub fn push_coalesced(frames: &mut Vec<TelnetFrame>, frame: TelnetFrame) {
    match frame {
        TelnetFrame::Data(data) if data.is_empty() => {}
        TelnetFrame::Data(data) => match frames.last_mut() {
            Some(TelnetFrame::Data(previous)) => {
                let mut merged = BytesMut::with_capacity(previous.len() + data.len());
                merged.extend_from_slice(previous);
                merged.extend_from_slice(&data);
                *previous = merged.freeze();
            }
            _ => frames.push(TelnetFrame::Data(data)),
        },
        other => frames.push(other),
    }
}

impl std::fmt::Display for TelnetFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetFrame::Data(data) => write!(f, "DATA {:?}", data),
            TelnetFrame::Negotiation(verb, option) => write!(f, "IAC {verb} {option}"),
            TelnetFrame::Command(command) => write!(f, "IAC {command}"),
            TelnetFrame::Subnegotiation(option, payload) => {
                write!(f, "IAC SB {option} {:?} IAC SE", payload)
            }
            TelnetFrame::Malformed(raw) => write!(f, "MALFORMED {:02X?}", &raw[..]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesce_merges_adjacent_data() {
        let frames = vec![
            TelnetFrame::data(&b"Hel"[..]),
            TelnetFrame::data(&b"lo"[..]),
            TelnetFrame::Command(TelnetCommand::NoOperation),
            TelnetFrame::data(&b""[..]),
            TelnetFrame::data(&b"!"[..]),
        ];
        assert_eq!(
            TelnetFrame::coalesce(frames),
            vec![
                TelnetFrame::data(&b"Hello"[..]),
                TelnetFrame::Command(TelnetCommand::NoOperation),
                TelnetFrame::data(&b"!"[..]),
            ]
        );
    }

    #[test]
    fn frame_option() {
        assert_eq!(
            TelnetFrame::will(TelnetOption::Echo).option(),
            Some(TelnetOption::Echo)
        );
        assert_eq!(
            TelnetFrame::Subnegotiation(TelnetOption::NAWS, Bytes::new()).option(),
            Some(TelnetOption::NAWS)
        );
        assert_eq!(TelnetFrame::data(&b"x"[..]).option(), None);
    }

    #[test]
    fn frame_display() {
        assert_eq!(
            TelnetFrame::do_(TelnetOption::TTYPE).to_string(),
            "IAC DO TTYPE"
        );
        assert_eq!(
            TelnetFrame::Command(TelnetCommand::AreYouThere).to_string(),
            "IAC AYT"
        );
    }
}
