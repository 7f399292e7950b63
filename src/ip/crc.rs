//! Header checksum
//!
//! CRC-16/CCITT (poly 0x1021, init 0xFFFF, no reflection, no final xor)
//! over Product No + Version, stored as four uppercase hex digits at the
//! start of Device Info.

use super::constants::{CRC_DATA_LENGTH, CRC_DATA_OFFSET, CRC_LENGTH, CRC_OFFSET};
use log::trace;

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// Compute the CRC over `data`
pub fn calc_crc(data: &[u8]) -> u16 {
    let mut n = INITIAL;
    for &byte in data {
        n ^= u16::from(byte) << 8;
        for _ in 0..8 {
            n = if n & 0x8000 != 0 {
                (n << 1) ^ POLYNOMIAL
            } else {
                n << 1
            };
        }
    }
    n
}

/// Render a CRC the way it is stored in the header
pub fn format_crc(crc: u16) -> String {
    hex::encode_upper(crc.to_be_bytes())
}

/// CRC of the checksummed window of a bootstrap image
pub fn header_crc(ip: &[u8]) -> u16 {
    calc_crc(&ip[CRC_DATA_OFFSET..CRC_DATA_OFFSET + CRC_DATA_LENGTH])
}

/// Checksum currently stored in the header
pub fn stored_crc(ip: &[u8]) -> &[u8] {
    &ip[CRC_OFFSET..CRC_OFFSET + CRC_LENGTH]
}

/// Recompute the checksum and store it if it changed.
///
/// Returns true when the stored value was rewritten.
pub fn update_crc(ip: &mut [u8]) -> bool {
    let crc = format_crc(header_crc(ip));
    if stored_crc(ip) == crc.as_bytes() {
        trace!("checksum {crc} already up to date");
        return false;
    }

    ip[CRC_OFFSET..CRC_OFFSET + CRC_LENGTH].copy_from_slice(crc.as_bytes());
    trace!("checksum updated to {crc}");
    true
}
