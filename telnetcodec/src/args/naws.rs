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


//! Negotiate About Window Size (RFC 1073)
//!

use crate::consts::option::NAWS;
use crate::{CodecError, CodecResult, SubnegotiationErrorKind};
use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, BufMut};

/// Terminal window dimensions carried by a `NAWS` subnegotiation.
///
/// Encoded as four bytes: columns then rows, each a big-endian `u16`. A value of 255 in
/// either byte is doubled on the wire by the frame encoder, not here.
///
/// # Example
/// ```
/// use iacprobe_telnetcodec::naws::WindowSize;
///
/// let size = WindowSize::new(80, 24);
/// assert_eq!(size.to_string(), "(80,24)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    /// Columns
    pub cols: u16,
    /// Rows
    pub rows: u16,
}

impl WindowSize {
    /// Creates a new `WindowSize`.
    pub fn new(cols: u16, rows: u16) -> Self {
        WindowSize { cols, rows }
    }

    /// Always 4.
    pub fn len(&self) -> usize {
        4
    }

    /// Encodes into `dst`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes columns then rows as big-endian `u16`.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_u16::<BigEndian>(self.cols)?;
        writer.write_u16::<BigEndian>(self.rows)?;
        Ok(4)
    }

    /// Decodes exactly four bytes from `src`.
    ///
    /// # Errors
    /// `InsufficientData` with fewer than 4 bytes, `UnexpectedData` with more.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<WindowSize> {
        // WIDTH-HIGH WIDTH-LOW HEIGHT-HIGH HEIGHT-LOW
        match src.remaining() {
            4 => Ok(WindowSize {
                cols: src.get_u16(),
                rows: src.get_u16(),
            }),
            available if available < 4 => Err(CodecError::subnegotiation(
                NAWS,
                SubnegotiationErrorKind::InsufficientData {
                    required: 4,
                    available,
                },
            )),
            available => Err(CodecError::subnegotiation(
                NAWS,
                SubnegotiationErrorKind::UnexpectedData {
                    reason: format!("{} trailing bytes", available - 4),
                },
            )),
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        WindowSize { cols: 80, rows: 24 }
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.cols, self.rows)
    }
}
