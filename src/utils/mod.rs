//! Small parsing helpers shared by the field validators

/// Earliest year accepted in a release date
pub const MIN_YEAR: i64 = 1900;

/// Latest year accepted in a release date
pub const MAX_YEAR: i64 = 9999;

/// Parse a decimal integer the way `strtol` does when the whole string must
/// be consumed: leading whitespace and a sign are allowed, at least one digit
/// is required, nothing may follow the digits.
pub fn parse_long(text: &str) -> Option<i64> {
    let trimmed = text.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parse `length` bytes starting at `start` as a decimal integer.
///
/// The window is clipped to the end of `text`; a window that falls outside
/// the string or splits a multi-byte character does not parse.
pub fn substr_long_parse(text: &str, start: usize, length: usize) -> Option<i64> {
    let end = (start + length).min(text.len());
    text.get(start..end).and_then(parse_long)
}

/// True if every character is a hexadecimal digit
pub fn is_valid_hex(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// True for the literal flag characters `'0'` and `'1'`
pub fn is_strict_bool(c: u8) -> bool {
    c == b'0' || c == b'1'
}

/// Leap year per the Gregorian rule
pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Check a `YYYYMMDD` date.
///
/// February follows the leap-year rule and April, June, September and
/// November stop at 30. Every other month accepts days 1 to 31.
pub fn is_valid_date(text: &str) -> bool {
    if text.len() != 8 {
        return false;
    }

    let (Some(year), Some(month), Some(day)) = (
        substr_long_parse(text, 0, 4),
        substr_long_parse(text, 4, 2),
        substr_long_parse(text, 6, 2),
    ) else {
        return false;
    };

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return false;
    }
    if !(1..=12).contains(&month) {
        return false;
    }
    if !(1..=31).contains(&day) {
        return false;
    }

    match month {
        2 if is_leap_year(year) => day <= 29,
        2 => day <= 28,
        4 | 6 | 9 | 11 => day <= 30,
        _ => true,
    }
}

/// Strip trailing CR, LF, space and tab
pub fn rtrim(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n', ' ', '\t'])
}
