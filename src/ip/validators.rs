//! Per-field value checks
//!
//! A validator sees the unpadded candidate value, already known to fit its
//! field. It either accepts it, possibly rewriting it into canonical form,
//! or returns a reason that completes the sentence `field "<name>" ...`.

use super::constants::DEVICE_INFO_CRC_PLACEHOLDER;
use super::fields::FieldDescriptor;
use crate::utils::{is_strict_bool, is_valid_date, is_valid_hex, substr_long_parse};

/// Closed set of structural checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Value must equal the field default
    Fixed,
    /// `[0000 ]CD-ROMx/y` or `GD-ROMx/y`
    DeviceInfo,
    /// Any of J, U, E; rewritten positionally
    AreaSymbols,
    /// Five hex digits then two 0/1 flags
    Peripherals,
    /// `Vx.yyy`
    Version,
    /// `YYYYMMDD`
    Date,
}

/// Validation outcome: `Err` carries the rejection reason
pub type ValidationResult = std::result::Result<(), String>;

impl Validator {
    /// Run this check, canonicalizing `value` in place on success
    pub fn validate(self, field: &FieldDescriptor, value: &mut String) -> ValidationResult {
        match self {
            Validator::Fixed => check_fixed(field, value),
            Validator::DeviceInfo => check_device_info(value),
            Validator::AreaSymbols => check_area_symbols(field, value),
            Validator::Peripherals => check_peripherals(value),
            Validator::Version => check_version(value),
            Validator::Date => check_date(value),
        }
    }
}

fn check_fixed(field: &FieldDescriptor, value: &str) -> ValidationResult {
    let expected = field.default_value.unwrap_or_default();
    if value == expected {
        Ok(())
    } else {
        Err(format!("is not editable (must be \"{expected}\")"))
    }
}

const AREA_SYMBOLS: &[u8; 3] = b"JUE";

/// Collapse the symbols into a presence mask and expand it back so that
/// each symbol sits at its own slot: "EJ" becomes "J E" plus padding.
fn check_area_symbols(field: &FieldDescriptor, value: &mut String) -> ValidationResult {
    let mut mask = 0u8;
    for c in value.chars() {
        match c {
            'J' => mask |= 1 << 0,
            'U' => mask |= 1 << 1,
            'E' => mask |= 1 << 2,
            ' ' => {}
            other => return Err(format!("contains an unknown area symbol '{other}'")),
        }
    }

    *value = (0..field.length)
        .map(|i| match AREA_SYMBOLS.get(i) {
            Some(&symbol) if mask & (1 << i) != 0 => symbol as char,
            _ => ' ',
        })
        .collect();
    Ok(())
}

fn check_date(value: &str) -> ValidationResult {
    if is_valid_date(value) {
        Ok(())
    } else {
        Err("is invalid date (format is \"YYYYMMDD\")".to_string())
    }
}

fn check_version(value: &str) -> ValidationResult {
    let bytes = value.as_bytes();
    let valid = bytes.len() == 6
        && bytes[0] == b'V'
        && bytes[2] == b'.'
        && substr_long_parse(value, 1, 1).is_some()
        && substr_long_parse(value, 3, 3).is_some();

    if valid {
        Ok(())
    } else {
        Err("is invalid version (must be Vx.yyy)".to_string())
    }
}

fn check_peripherals(value: &str) -> ValidationResult {
    let bytes = value.as_bytes();
    let valid = bytes.len() == 7
        && value.get(..5).is_some_and(is_valid_hex)
        && is_strict_bool(bytes[5])
        && is_strict_bool(bytes[6]);

    if valid {
        Ok(())
    } else {
        Err("contains invalid values".to_string())
    }
}

const DEVICE_INFO_SHORT_LEN: usize = 9;
const DEVICE_INFO_LEGACY_LEN: usize = 14;

fn is_valid_device(device: &str) -> bool {
    let bytes = device.as_bytes();
    bytes.len() == DEVICE_INFO_SHORT_LEN
        && (device.starts_with("CD-ROM") || device.starts_with("GD-ROM"))
        && substr_long_parse(device, 6, 1).is_some()
        && bytes[7] == b'/'
        && substr_long_parse(device, 8, 1).is_some()
}

/// Accepts the legacy `"0000 CD-ROMx/y"` form unchanged and prefixes the
/// short `"CD-ROMx/y"` form with a checksum placeholder.
fn check_device_info(value: &mut String) -> ValidationResult {
    let valid = if value.len() == DEVICE_INFO_LEGACY_LEN {
        match value.split_once(' ') {
            Some((prefix, device)) => {
                prefix.len() == 4 && is_valid_hex(prefix) && is_valid_device(device)
            }
            None => false,
        }
    } else {
        is_valid_device(value)
    };

    if !valid {
        return Err("contains invalid values (must be CD-ROMx/y)".to_string());
    }

    if value.len() == DEVICE_INFO_SHORT_LEN {
        value.insert_str(0, DEVICE_INFO_CRC_PLACEHOLDER);
    }
    Ok(())
}
