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


use super::{CodecError, CodecResult, TelnetFrame, consts};
use crate::parser::{self, Scan};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

/// Default upper bound on a buffered, unterminated subnegotiation.
pub const DEFAULT_MAX_SUBNEGOTIATION: usize = 8192;

/// A codec for the Telnet byte stream.
///
/// `TelnetCodec` implements the [`Encoder`] and [`Decoder`] traits from `tokio_util::codec`,
/// turning [`TelnetFrame`] values into escaped wire bytes and back. It keeps no negotiation
/// state: every frame is decoded exactly as it appears on the wire.
///
/// # Example
/// ```
/// use bytes::BytesMut;
/// use iacprobe_telnetcodec::{TelnetCodec, TelnetFrame, TelnetOption};
/// use tokio_util::codec::{Decoder, Encoder};
///
/// let mut codec = TelnetCodec::new();
/// let mut buffer = BytesMut::new();
/// codec.encode(TelnetFrame::will(TelnetOption::Echo), &mut buffer).unwrap();
/// assert_eq!(&buffer[..], &[255, 251, 1]);
///
/// let frame = codec.decode(&mut buffer).unwrap();
/// assert_eq!(frame, Some(TelnetFrame::will(TelnetOption::Echo)));
/// ```
#[derive(Clone, Debug)]
pub struct TelnetCodec {
    max_subnegotiation: usize,
}

impl TelnetCodec {
    /// Creates a new instance of `TelnetCodec` with default limits.
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// Caps how many bytes a subnegotiation, `IAC SB` through `IAC SE`, may span. The first
    /// `limit` bytes of a longer one are reported as [`TelnetFrame::Malformed`] and the rest
    /// of the stream is scanned as if it followed them.
    pub fn with_max_subnegotiation(mut self, limit: usize) -> TelnetCodec {
        self.max_subnegotiation = limit.max(3);
        self
    }

    /// The configured subnegotiation limit.
    pub fn max_subnegotiation(&self) -> usize {
        self.max_subnegotiation
    }

    /// Removes and returns the next complete frame at the front of `src`.
    ///
    /// Returns `None` when `src` is empty or starts with a frame that needs more bytes; in
    /// that case `src` is left untouched.
    pub fn next_frame(&self, src: &mut BytesMut) -> Option<TelnetFrame> {
        if src.is_empty() {
            return None;
        }
        match parser::scan(src, self.max_subnegotiation) {
            Scan::Complete { frame, consumed } => {
                src.advance(consumed);
                trace!("Decoded {} from {} bytes", frame, consumed);
                Some(frame)
            }
            Scan::Malformed { raw, consumed } => {
                src.advance(consumed);
                warn!(
                    "Abandoned subnegotiation without IAC SE in its first {} bytes: {:02X?}",
                    consumed,
                    &raw[..raw.len().min(16)]
                );
                Some(TelnetFrame::Malformed(raw))
            }
            Scan::Incomplete { needed } => {
                trace!(
                    "Incomplete frame, {} bytes buffered, at least {} more needed",
                    src.len(),
                    needed
                );
                src.reserve(needed);
                None
            }
        }
    }
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec {
            max_subnegotiation: DEFAULT_MAX_SUBNEGOTIATION,
        }
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetFrame;
    type Error = CodecError;

    /// Decodes the next frame at the front of `src`.
    ///
    /// A run of literal data (with every `IAC IAC` collapsed to one `0xFF`) is returned as a
    /// single `Data` frame that stops at the next command. A command cut off by the end of the
    /// buffer yields `Ok(None)` without consuming anything.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetFrame>, Self::Error> {
        Ok(self.next_frame(src))
    }

    /// Like [`Decoder::decode`], but reports bytes left over at end of stream as
    /// [`CodecError::MissingSubnegotiationTerminator`] or [`CodecError::IncompleteCommand`].
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<TelnetFrame>, Self::Error> {
        match self.next_frame(src) {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => {
                let pending = src.split();
                Err(parser::leftover_error(&pending))
            }
        }
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode(&item, dst)
    }
}

impl<'a> Encoder<&'a TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a `TelnetFrame` into a byte buffer for transmission.
    ///
    /// - `Data(bytes)`: the bytes with every `0xFF` doubled.
    /// - `Negotiation(verb, option)`: `IAC <verb> <option>`.
    /// - `Command(command)`: `IAC <command>`.
    /// - `Subnegotiation(option, payload)`: `IAC SB <option>`, the payload with every `0xFF`
    ///   doubled, then `IAC SE`.
    /// - `Malformed(raw)`: the raw bytes unchanged.
    ///
    /// Command bytes are never escaped. The only failure is a command frame that is not
    /// [encodable](crate::TelnetCommand::is_encodable), which writes nothing.
    fn encode(&mut self, item: &'a TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            TelnetFrame::Data(data) => {
                escape_iac(data, dst);
            }
            TelnetFrame::Negotiation(verb, option) => {
                dst.reserve(3);
                dst.put_u8(consts::IAC);
                dst.put_u8(verb.to_u8());
                dst.put_u8(option.to_u8());
            }
            TelnetFrame::Command(command) if !command.is_encodable() => {
                return Err(CodecError::UnencodableCommand {
                    code: command.to_u8(),
                });
            }
            TelnetFrame::Command(command) => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(command.to_u8());
            }
            TelnetFrame::Subnegotiation(option, payload) => {
                dst.reserve(5 + payload.len());
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(option.to_u8());
                escape_iac(payload, dst);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
            TelnetFrame::Malformed(raw) => {
                dst.extend_from_slice(raw);
            }
        }
        Ok(())
    }
}

/// Appends `src` to `dst`, doubling every literal `IAC` byte.
pub fn escape_iac(src: &[u8], dst: &mut BytesMut) {
    dst.reserve(src.len() + src.iter().filter(|&&b| b == consts::IAC).count());
    for chunk in src.split_inclusive(|&b| b == consts::IAC) {
        dst.extend_from_slice(chunk);
        if chunk.last() == Some(&consts::IAC) {
            dst.put_u8(consts::IAC);
        }
    }
}

/// Encodes a single frame into a fresh buffer.
pub fn encode_frame(frame: &TelnetFrame) -> CodecResult<Bytes> {
    let mut dst = BytesMut::new();
    TelnetCodec::new().encode(frame, &mut dst)?;
    Ok(dst.freeze())
}
