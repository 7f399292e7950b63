//! MR run-length coding of palette indices
//!
//! Indices are below 0x80, so any byte with the high bit set starts a run:
//!
//! ```text
//! 0x00..=0x7F             literal index, run of 1
//! 0x80|n, v               run of n (2..=127)
//! 0x81, n, v              run of n (128..=255)
//! 0x82, 0x80|(n-256), v   run of n (256..=382)
//! ```
//!
//! `0x82` followed by a byte below 0x80 is an ordinary run of 2.

use crate::exceptions::{MakeipError, Result};

/// Longest run a single code can describe
pub const MAX_RUN: usize = 0x17E;

const ESCAPE_BYTE_RUN: u8 = 0x81;
const ESCAPE_LONG_RUN: u8 = 0x82;

/// Run-length encode an index stream. Input bytes must be below 0x80.
pub fn compress(indices: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(indices.len() / 2 + 16);
    let mut position = 0;

    while position < indices.len() {
        let value = indices[position];
        debug_assert!(value < 0x80, "palette index {value:#x} out of range");

        let mut run = 1;
        while run < MAX_RUN
            && position + run < indices.len()
            && indices[position + run] == value
        {
            run += 1;
        }

        match run {
            1 => out.push(value),
            2..=0x7F => out.extend_from_slice(&[0x80 | run as u8, value]),
            0x80..=0xFF => out.extend_from_slice(&[ESCAPE_BYTE_RUN, run as u8, value]),
            _ => out.extend_from_slice(&[ESCAPE_LONG_RUN, 0x80 | (run - 0x100) as u8, value]),
        }
        position += run;
    }

    out
}

/// Expand a compressed stream back into indices
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut position = 0;

    let truncated = |at: usize| {
        MakeipError::InvalidFormat(format!("compressed logo data truncated at byte {at}"))
    };

    while position < data.len() {
        let code = data[position];
        if code < 0x80 {
            out.push(code);
            position += 1;
            continue;
        }

        let next = *data.get(position + 1).ok_or_else(|| truncated(position))?;
        let (run, value, consumed) = match code {
            ESCAPE_LONG_RUN if next >= 0x80 => {
                let value = *data.get(position + 2).ok_or_else(|| truncated(position))?;
                ((next & 0x7F) as usize + 0x100, value, 3)
            }
            ESCAPE_BYTE_RUN => {
                let value = *data.get(position + 2).ok_or_else(|| truncated(position))?;
                (next as usize, value, 3)
            }
            _ => ((code & 0x7F) as usize, next, 2),
        };

        if run == 0 {
            return Err(MakeipError::InvalidFormat(format!(
                "zero-length run at byte {position}"
            )));
        }

        out.resize(out.len() + run, value);
        position += consumed;
    }

    Ok(out)
}
