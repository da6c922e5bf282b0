// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Write;

const ROW: usize = 16;

/// The radix of the offset column of a [`hexdump`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    /// Offsets in decimal.
    Decimal,
    /// Offsets in hexadecimal.
    #[default]
    Hex,
}

/// Render `data` as a table of 16 bytes per row with an ASCII column.
///
/// ```text
/// HEX OFF | 0  1  2  3  4  5  6  7  8  9  A  B  C  D  E  F |   ANSI ASCII
/// --------------------------------------------------------------------------
/// 0000000 |48 65 6C 6C 6F 00 00 00 00 00 00 00 00 00 00 00 |Hello
/// ```
///
/// Bytes past the end of `data` render as `00` in the hex columns and as blanks in the ASCII
/// column, as do non-printable bytes.
pub fn hexdump(data: &[u8], offset: Offset) -> String {
    let rows = data.len().div_ceil(ROW);
    let mut out = String::with_capacity((rows + 2) * 76);

    out.push_str(match offset {
        Offset::Decimal => "DEC OFF ",
        Offset::Hex => "HEX OFF ",
    });
    out.push('|');
    for column in 0..ROW {
        // writing to a String cannot fail
        let _ = write!(out, " {column:X} ");
    }
    out.push('|');
    out.push_str("   ANSI ASCII   ");
    out.push('\n');
    out.push_str(&"-".repeat(74));
    out.push('\n');

    for (row, chunk) in data.chunks(ROW).enumerate() {
        let start = row * ROW;
        let _ = match offset {
            Offset::Decimal => write!(out, "{start:07} |"),
            Offset::Hex => write!(out, "{start:07X} |"),
        };
        for i in 0..ROW {
            let _ = write!(out, "{:02X} ", chunk.get(i).copied().unwrap_or(0));
        }
        out.push('|');
        for i in 0..ROW {
            out.push(match chunk.get(i) {
                Some(&b) if b.is_ascii_graphic() || b == b' ' => b as char,
                _ => ' ',
            });
        }
        out.push('\n');
    }

    out
}
