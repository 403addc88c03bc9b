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


//! Hex dump rendering for raw traffic

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Renders `data` as hex with an ASCII gutter, 16 bytes per line, each line starting with
/// `prefix`.
///
/// ```
/// let dump = iacprobe_testsuite::hexdump::format(&[0xFF, 0xFB, 0x01, b'A'], "> ");
/// assert_eq!(dump, format!("> ff fb 01 41 {:36} | ...A", ""));
/// ```
pub fn format(data: &[u8], prefix: &str) -> String {
    let mut out = String::new();
    for (index, line) in data.chunks(BYTES_PER_LINE).enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(prefix);
        for byte in line {
            let _ = write!(out, "{byte:02x} ");
        }
        for _ in line.len()..BYTES_PER_LINE {
            out.push_str("   ");
        }
        out.push_str(" | ");
        out.extend(line.iter().map(|&byte| printable(byte)));
    }
    out
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        char::from(byte)
    } else {
        '.'
    }
}
