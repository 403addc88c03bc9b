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


//! # IACProbe Telnet Codec
//!
//! Frame model, encoder and streaming parser for the Telnet byte stream (RFC 854, RFC 855).
//!
//! The stream is split into [`TelnetFrame`] values:
//!
//! - **Data**: literal bytes, with `IAC IAC` on the wire standing for one `0xFF`
//! - **Commands**: `IAC <command>` such as `NOP`, `AYT` or `GA`
//! - **Negotiation**: `IAC <WILL|WONT|DO|DONT> <option>`
//! - **Subnegotiation**: `IAC SB <option> <payload> IAC SE`
//! - **Malformed**: the leading bytes of a subnegotiation abandoned for exceeding the size
//!   limit
//!
//! [`TelnetCodec`] implements `tokio_util::codec::{Encoder, Decoder}` for use with
//! `Framed`, and [`FrameParser`] wraps the same scanner for callers that read raw chunks
//! themselves. Neither keeps option state; frames are reported exactly as they were sent,
//! which is what a conformance harness needs.
//!
//! Subnegotiation payloads for terminal type, terminal speed, environment, window size and
//! linemode can be interpreted with [`TelnetArgument`].
//!
//! ## Usage Example
//!
//! ```rust
//! use bytes::BytesMut;
//! use iacprobe_telnetcodec::{FrameParser, TelnetCodec, TelnetCommand, TelnetFrame, TelnetOption};
//! use tokio_util::codec::Encoder;
//!
//! let mut codec = TelnetCodec::new();
//! let mut wire = BytesMut::new();
//! codec.encode(TelnetFrame::do_(TelnetOption::TTYPE), &mut wire).unwrap();
//! codec.encode(TelnetFrame::Command(TelnetCommand::AreYouThere), &mut wire).unwrap();
//! assert_eq!(&wire[..], &[255, 253, 24, 255, 246]);
//!
//! let mut parser = FrameParser::new();
//! let mut frames = parser.feed(&wire[..4]);
//! frames.extend(parser.feed(&wire[4..]));
//! assert_eq!(
//!     frames,
//!     vec![
//!         TelnetFrame::do_(TelnetOption::TTYPE),
//!         TelnetFrame::Command(TelnetCommand::AreYouThere),
//!     ]
//! );
//! ```
//!
//! ## Related RFCs
//!
//! - RFC 854: Telnet Protocol Specification
//! - RFC 855: Telnet Option Specifications
//! - RFC 1073: Window Size
//! - RFC 1079: Terminal Speed
//! - RFC 1091: Terminal Type
//! - RFC 1184: Linemode
//! - RFC 1408: Environment

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::len_without_is_empty
)]

mod args;
mod codec;
mod command;
pub mod consts;
mod frame;
mod options;
mod parser;
mod result;

pub use self::args::{TelnetArgument, environ, linemode, naws, tspeed, ttype};
pub use self::codec::{DEFAULT_MAX_SUBNEGOTIATION, TelnetCodec, encode_frame, escape_iac};
pub use self::command::{NegotiationVerb, TelnetCommand};
pub use self::frame::{TelnetFrame, push_coalesced};
pub use self::options::TelnetOption;
pub use self::parser::FrameParser;
pub use self::result::{CodecError, CodecResult, SubnegotiationErrorKind};

#[cfg(test)]
mod tests {
    use super::{
        FrameParser, NegotiationVerb, TelnetCodec, TelnetCommand, TelnetFrame, TelnetOption,
        consts, encode_frame,
    };
    use bytes::{Bytes, BytesMut};
    use tokio_util::codec::{Decoder, Encoder};

    #[tokio::test]
    async fn telnet_decode() {
        let mut codec = TelnetCodec::new();
        let mut input_buffer = BytesMut::from("Terminated line\r\n");
        let mut actual_output = Vec::new();
        while let Some(frame) = codec.decode(&mut input_buffer).unwrap() {
            actual_output.push(frame)
        }
        assert_eq!(
            actual_output,
            vec![TelnetFrame::data(&b"Terminated line\r\n"[..])],
            "telnet_decode didn't match"
        );
    }

    #[test]
    fn telnet_encode() {
        let mut codec = TelnetCodec::new();
        let input_frames = vec![
            TelnetFrame::data(&b"Raw Ascii "[..]),
            TelnetFrame::data(&b"Data\r\n"[..]),
        ];
        let expected_output = BytesMut::from(&b"Raw Ascii Data\r\n"[..]);
        let mut actual_output = BytesMut::with_capacity(20);
        for frame in input_frames {
            codec.encode(frame, &mut actual_output).unwrap();
        }
        assert_eq!(expected_output, actual_output, "telnet_encode didn't match");
    }

    #[test]
    fn decode_interleaved_negotiation() {
        let mut codec = TelnetCodec::new();
        let mut input_buffer = BytesMut::new();
        input_buffer.extend_from_slice(b"Login:\r\n");
        input_buffer.extend_from_slice(&[consts::IAC, consts::DO, consts::option::BINARY]);
        input_buffer.extend_from_slice(b"Password:\r\n");
        input_buffer.extend_from_slice(&[consts::IAC, consts::WILL, consts::option::BINARY]);
        input_buffer.extend_from_slice(b"Hello!\r\n");

        let mut actual_output = Vec::new();
        while let Some(frame) = codec.decode(&mut input_buffer).unwrap() {
            actual_output.push(frame)
        }

        assert_eq!(
            actual_output,
            vec![
                TelnetFrame::data(&b"Login:\r\n"[..]),
                TelnetFrame::do_(TelnetOption::TransmitBinary),
                TelnetFrame::data(&b"Password:\r\n"[..]),
                TelnetFrame::will(TelnetOption::TransmitBinary),
                TelnetFrame::data(&b"Hello!\r\n"[..]),
            ]
        );
    }

    #[test]
    fn literal_iac_in_payload_is_doubled() {
        let frame = TelnetFrame::Subnegotiation(TelnetOption::NAWS, Bytes::from_static(&[0, 255, 0, 24]));
        let wire = encode_frame(&frame).unwrap();
        assert_eq!(&wire[..], &[255, 250, 31, 0, 255, 255, 0, 24, 255, 240]);

        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(&wire), vec![frame]);
    }

    #[test]
    fn every_split_point_yields_same_frames() {
        let frames = vec![
            TelnetFrame::data(&b"a\xFFb"[..]),
            TelnetFrame::Negotiation(NegotiationVerb::Wont, TelnetOption::Unknown(200)),
            TelnetFrame::Subnegotiation(TelnetOption::TTYPE, Bytes::from_static(b"\x00ANSI")),
            TelnetFrame::Command(TelnetCommand::GoAhead),
            TelnetFrame::data(&b"z"[..]),
        ];
        let mut wire = BytesMut::new();
        for frame in &frames {
            TelnetCodec::new().encode(frame, &mut wire).unwrap();
        }
        for split in 0..=wire.len() {
            let mut parser = FrameParser::new();
            let mut seen = parser.feed(&wire[..split]);
            seen.extend(parser.feed(&wire[split..]));
            assert_eq!(TelnetFrame::coalesce(seen), frames, "split at {split}");
            assert!(parser.finish().is_ok());
        }
    }
}
