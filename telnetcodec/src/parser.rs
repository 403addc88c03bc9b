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


//! Streaming frame recovery.
//!
//! [`scan`] looks at the front of a buffer and reports one of three outcomes: a complete
//! frame and how many bytes it used, an incomplete frame that needs more input, or an
//! oversized subnegotiation that has to be skipped. [`FrameParser`] drives it over a growing
//! buffer so callers can push bytes as they arrive from the socket.

use crate::frame::push_coalesced;
use crate::{
    CodecError, NegotiationVerb, TelnetCodec, TelnetCommand, TelnetFrame, TelnetOption, consts,
};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

/// Outcome of scanning the front of a buffer for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Scan {
    /// A frame was recognized in the first `consumed` bytes.
    Complete {
        frame: TelnetFrame,
        consumed: usize,
    },
    /// The buffer ends inside a frame; at least `needed` more bytes are required.
    Incomplete { needed: usize },
    /// The first `consumed` bytes are a subnegotiation that ran past the size limit.
    Malformed { raw: Bytes, consumed: usize },
}

/// Recognizes the frame at the front of `src`.
///
/// `max_subnegotiation` bounds how many bytes a subnegotiation may occupy before it is
/// reported as malformed instead of incomplete.
pub(crate) fn scan(src: &[u8], max_subnegotiation: usize) -> Scan {
    let Some(&first) = src.first() else {
        return Scan::Incomplete { needed: 1 };
    };
    if first == consts::IAC {
        match src.get(1) {
            None => Scan::Incomplete { needed: 1 },
            Some(&consts::IAC) => scan_data(src),
            Some(&consts::SB) => scan_subnegotiation(src, max_subnegotiation),
            Some(&code) => match NegotiationVerb::from_u8(code) {
                Some(verb) => match src.get(2) {
                    None => Scan::Incomplete { needed: 1 },
                    Some(&option) => Scan::Complete {
                        frame: TelnetFrame::Negotiation(verb, TelnetOption::from_u8(option)),
                        consumed: 3,
                    },
                },
                None => Scan::Complete {
                    frame: TelnetFrame::Command(TelnetCommand::from_u8(code)),
                    consumed: 2,
                },
            },
        }
    } else {
        scan_data(src)
    }
}

/// Collects literal data up to the next command or the end of `src`.
///
/// The caller guarantees `src` starts with a data byte or an `IAC IAC` pair, so the
/// resulting frame is never empty.
fn scan_data(src: &[u8]) -> Scan {
    let mut data = BytesMut::with_capacity(src.len());
    let mut index = 0;
    while index < src.len() {
        let rest = &src[index..];
        match rest.iter().position(|&b| b == consts::IAC) {
            None => {
                data.extend_from_slice(rest);
                index = src.len();
            }
            Some(offset) => {
                data.extend_from_slice(&rest[..offset]);
                index += offset;
                if src.get(index + 1) == Some(&consts::IAC) {
                    data.put_u8(consts::IAC);
                    index += 2;
                } else {
                    // A command, or an IAC whose meaning is not known yet.
                    break;
                }
            }
        }
    }
    Scan::Complete {
        frame: TelnetFrame::Data(data.freeze()),
        consumed: index,
    }
}

/// Scans `IAC SB <option> <payload> IAC SE`, unescaping `IAC IAC` inside the payload.
///
/// The whole frame, `IAC SE` included, has to fit in the first `max_subnegotiation` bytes of
/// the stream. Only those bytes decide the outcome, so a long subnegotiation is cut at the
/// same byte however the stream was chunked. `IAC <command>` inside the payload drops the
/// `IAC`, keeps the command byte as payload and carries on towards `IAC SE`.
fn scan_subnegotiation(src: &[u8], max_subnegotiation: usize) -> Scan {
    let window = &src[..src.len().min(max_subnegotiation)];
    let Some(&option) = window.get(2) else {
        return unterminated(src, max_subnegotiation, 1);
    };
    let mut payload = BytesMut::new();
    let mut stray = Vec::new();
    let mut index = 3;
    loop {
        let rest = &window[index..];
        let Some(offset) = rest.iter().position(|&b| b == consts::IAC) else {
            return unterminated(src, max_subnegotiation, 2);
        };
        payload.extend_from_slice(&rest[..offset]);
        index += offset;
        match window.get(index + 1) {
            None => return unterminated(src, max_subnegotiation, 1),
            Some(&consts::IAC) => {
                payload.put_u8(consts::IAC);
                index += 2;
            }
            Some(&consts::SE) => {
                let option = TelnetOption::from_u8(option);
                if !stray.is_empty() {
                    warn!(
                        "Stray commands {:02X?} inside {} subnegotiation kept as payload",
                        stray, option
                    );
                }
                return Scan::Complete {
                    frame: TelnetFrame::Subnegotiation(option, payload.freeze()),
                    consumed: index + 2,
                };
            }
            Some(&code) => {
                stray.push(code);
                payload.put_u8(code);
                index += 2;
            }
        }
    }
}

/// Waits for more input, or cuts the subnegotiation once `max_subnegotiation` bytes have
/// arrived without a terminator.
fn unterminated(src: &[u8], max_subnegotiation: usize, needed: usize) -> Scan {
    if src.len() >= max_subnegotiation {
        Scan::Malformed {
            raw: Bytes::copy_from_slice(&src[..max_subnegotiation]),
            consumed: max_subnegotiation,
        }
    } else {
        Scan::Incomplete { needed }
    }
}

/// Error describing bytes still buffered when the stream ended.
pub(crate) fn leftover_error(pending: &[u8]) -> CodecError {
    if pending.starts_with(&[consts::IAC, consts::SB]) {
        CodecError::MissingSubnegotiationTerminator {
            option: pending.get(2).map(|&code| TelnetOption::from_u8(code)),
            pending: pending.len(),
        }
    } else {
        CodecError::IncompleteCommand {
            pending: pending.to_vec(),
        }
    }
}

///
/// Incremental Telnet frame parser.
///
/// Owns the bytes received so far that do not yet form a complete frame. Feeding a stream in
/// arbitrary chunks yields the same frames as feeding it at once, once adjacent `Data`
/// frames are merged with [`TelnetFrame::coalesce`].
///
/// # Example
/// ```
/// use iacprobe_telnetcodec::{FrameParser, TelnetFrame, TelnetOption};
/// use bytes::Bytes;
///
/// let mut parser = FrameParser::new();
/// assert!(parser.feed(&[255, 250, 24]).is_empty());
/// assert_eq!(parser.pending(), &[255, 250, 24]);
///
/// let frames = parser.feed(&[0, b'V', b'T', b'1', b'0', b'0', 255, 240]);
/// assert_eq!(
///     frames,
///     vec![TelnetFrame::Subnegotiation(TelnetOption::TTYPE, Bytes::from_static(b"\x00VT100"))]
/// );
/// assert!(parser.pending().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FrameParser {
    codec: TelnetCodec,
    buffer: BytesMut,
}

impl FrameParser {
    /// Creates an empty parser.
    pub fn new() -> FrameParser {
        FrameParser::default()
    }

    /// Creates an empty parser using the limits of `codec`.
    pub fn with_codec(codec: TelnetCodec) -> FrameParser {
        FrameParser {
            codec,
            buffer: BytesMut::new(),
        }
    }

    /// Appends `bytes` and returns every frame that is now complete.
    ///
    /// Bytes belonging to an unfinished command or subnegotiation stay buffered for the next
    /// call. Data preceding them is returned right away.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<TelnetFrame> {
        self.buffer.extend_from_slice(bytes);
        let mut frames = Vec::new();
        while let Some(frame) = self.codec.next_frame(&mut self.buffer) {
            push_coalesced(&mut frames, frame);
        }
        if !self.buffer.is_empty() {
            debug!("{} bytes pending after feed", self.buffer.len());
        }
        frames
    }

    /// Bytes received but not yet part of a complete frame.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Whether any bytes are waiting for the rest of their frame.
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Ends the stream, discarding buffered bytes.
    ///
    /// Returns an error describing the unfinished frame when bytes were still pending.
    pub fn finish(&mut self) -> Result<(), CodecError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let pending = self.buffer.split();
        Err(leftover_error(&pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = crate::codec::DEFAULT_MAX_SUBNEGOTIATION;

    #[test]
    fn scan_empty_is_incomplete() {
        assert_eq!(scan(&[], LIMIT), Scan::Incomplete { needed: 1 });
    }

    #[test]
    fn scan_lone_iac_is_incomplete() {
        assert_eq!(scan(&[255], LIMIT), Scan::Incomplete { needed: 1 });
    }

    #[test]
    fn scan_data_stops_before_command() {
        assert_eq!(
            scan(b"abc\xFF\xF1def", LIMIT),
            Scan::Complete {
                frame: TelnetFrame::data(&b"abc"[..]),
                consumed: 3,
            }
        );
    }

    #[test]
    fn scan_data_stops_before_trailing_iac() {
        assert_eq!(
            scan(b"abc\xFF", LIMIT),
            Scan::Complete {
                frame: TelnetFrame::data(&b"abc"[..]),
                consumed: 3,
            }
        );
    }

    #[test]
    fn scan_escaped_iac_at_start_is_data() {
        assert_eq!(
            scan(&[255, 255], LIMIT),
            Scan::Complete {
                frame: TelnetFrame::data(vec![255]),
                consumed: 2,
            }
        );
    }

    #[test]
    fn scan_negotiation_needs_option_byte() {
        assert_eq!(scan(&[255, 251], LIMIT), Scan::Incomplete { needed: 1 });
        assert_eq!(
            scan(&[255, 251, 1], LIMIT),
            Scan::Complete {
                frame: TelnetFrame::will(TelnetOption::Echo),
                consumed: 3,
            }
        );
    }

    #[test]
    fn scan_unknown_command() {
        assert_eq!(
            scan(&[255, 0x42, b'x'], LIMIT),
            Scan::Complete {
                frame: TelnetFrame::Command(TelnetCommand::Unknown(0x42)),
                consumed: 2,
            }
        );
    }

    #[test]
    fn scan_subnegotiation_header_only_is_incomplete() {
        assert_eq!(scan(&[255, 250], LIMIT), Scan::Incomplete { needed: 1 });
        assert_eq!(scan(&[255, 250, 24], LIMIT), Scan::Incomplete { needed: 2 });
        assert_eq!(scan(&[255, 250, 24, 255], LIMIT), Scan::Incomplete { needed: 1 });
    }

    #[test]
    fn scan_subnegotiation_escaped_iac_is_not_terminator() {
        // IAC IAC SE: the first pair is a literal 255, the SE is payload.
        assert_eq!(
            scan(&[255, 250, 24, 255, 255, 240], LIMIT),
            Scan::Incomplete { needed: 2 }
        );
        assert_eq!(
            scan(&[255, 250, 24, 255, 255, 240, 255, 240], LIMIT),
            Scan::Complete {
                frame: TelnetFrame::Subnegotiation(
                    TelnetOption::TTYPE,
                    Bytes::from_static(&[255, 240])
                ),
                consumed: 8,
            }
        );
    }

    #[test]
    fn scan_empty_subnegotiation() {
        assert_eq!(
            scan(&[255, 250, 31, 255, 240], LIMIT),
            Scan::Complete {
                frame: TelnetFrame::Subnegotiation(TelnetOption::NAWS, Bytes::new()),
                consumed: 5,
            }
        );
    }

    #[test]
    fn scan_command_inside_subnegotiation_stays_in_payload() {
        assert_eq!(
            scan(&[255, 250, 24, 0, b'A', 255, 241, b'B', 255, 240], LIMIT),
            Scan::Complete {
                frame: TelnetFrame::Subnegotiation(
                    TelnetOption::TTYPE,
                    Bytes::from_static(&[0, b'A', 241, b'B'])
                ),
                consumed: 10,
            }
        );
        assert_eq!(
            scan(&[255, 250, 24, 1, 255, 241], LIMIT),
            Scan::Incomplete { needed: 2 }
        );
    }

    #[test]
    fn scan_cuts_subnegotiation_at_limit() {
        let mut src = vec![255, 250, 24, 0];
        src.extend_from_slice(b"abcdef");
        src.extend_from_slice(&[255, 240]);
        assert_eq!(
            scan(&src, 12),
            Scan::Complete {
                frame: TelnetFrame::Subnegotiation(
                    TelnetOption::TTYPE,
                    Bytes::from_static(b"\x00abcdef")
                ),
                consumed: 12,
            }
        );
        assert_eq!(
            scan(&src, 11),
            Scan::Malformed {
                raw: Bytes::copy_from_slice(&src[..11]),
                consumed: 11,
            }
        );
        assert_eq!(scan(&src[..10], 11), Scan::Incomplete { needed: 2 });
    }

    #[test]
    fn parser_keeps_command_inside_subnegotiation() {
        let mut parser = FrameParser::new();
        let frames = parser.feed(&[255, 250, 24, 1, 255, 241, 255, 240, b'o', b'k']);
        assert_eq!(
            frames,
            vec![
                TelnetFrame::Subnegotiation(TelnetOption::TTYPE, Bytes::from_static(&[1, 241])),
                TelnetFrame::data(&b"ok"[..]),
            ]
        );
    }

    #[test]
    fn oversized_subnegotiation_is_cut_at_the_same_byte_in_chunks() {
        let codec = TelnetCodec::new().with_max_subnegotiation(64);
        let mut stream = vec![255, 250, 24, 0];
        stream.extend(std::iter::repeat_n(b'x', 100));
        stream.extend_from_slice(&[255, 240]);

        let whole = FrameParser::with_codec(codec.clone()).feed(&stream);
        assert_eq!(
            whole,
            vec![
                TelnetFrame::Malformed(Bytes::copy_from_slice(&stream[..64])),
                TelnetFrame::data(vec![b'x'; 40]),
                TelnetFrame::Command(TelnetCommand::SubnegotiationEnd),
            ]
        );

        for chunk in [1, 7, 50, 63, 64, 65, 90] {
            let mut parser = FrameParser::with_codec(codec.clone());
            let mut frames = Vec::new();
            for piece in stream.chunks(chunk) {
                frames.extend(parser.feed(piece));
            }
            assert_eq!(TelnetFrame::coalesce(frames), whole, "chunk size {chunk}");
            assert!(!parser.has_pending());
        }
    }

    #[test]
    fn parser_keeps_partial_command() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(b"Hello\xFF"), vec![TelnetFrame::data(&b"Hello"[..])]);
        assert_eq!(parser.pending(), &[255]);
        assert_eq!(parser.feed(b"\xFFWorld"), vec![TelnetFrame::data(&b"\xFFWorld"[..])]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn parser_finish_reports_leftovers() {
        let mut parser = FrameParser::new();
        parser.feed(&[255, 250, 36, 0]);
        assert_eq!(
            parser.finish(),
            Err(CodecError::MissingSubnegotiationTerminator {
                option: Some(TelnetOption::Environment),
                pending: 4,
            })
        );
        assert_eq!(parser.finish(), Ok(()));
    }

    #[test]
    fn parser_finish_reports_header_without_option() {
        let mut parser = FrameParser::new();
        parser.feed(&[255, 250]);
        assert_eq!(
            parser.finish(),
            Err(CodecError::MissingSubnegotiationTerminator {
                option: None,
                pending: 2,
            })
        );
    }
}
