//! Month name/number codec
//!
//! Source documents carry months either as canonical English names
//! ("January".."December") or as numerics the author typed directly
//! ("3", 3). The codec maps both into 1..12 and back; anything it does
//! not recognize is reported as `None` so the caller can drop the
//! offending seasonality window instead of failing the run.

/// Canonical month names, indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Encode a month name (or numeric string) to its 1..12 number.
///
/// Accepts canonical names case-insensitively, and integer strings that
/// are already in range. Returns `None` for anything else.
pub fn encode(value: &str) -> Option<u8> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(idx) = MONTH_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(value))
    {
        return Some(idx as u8 + 1);
    }

    // Tolerate "already a number" input, e.g. "11"
    value.parse::<i64>().ok().and_then(encode_number)
}

/// Encode an integer month, validating the 1..12 range.
pub fn encode_number(month: i64) -> Option<u8> {
    if (1..=12).contains(&month) {
        Some(month as u8)
    } else {
        None
    }
}

/// Decode a 1..12 month number back to its canonical name.
///
/// Exact inverse of [`encode`] for all twelve canonical names.
pub fn decode(month: i64) -> Option<&'static str> {
    if (1..=12).contains(&month) {
        Some(MONTH_NAMES[(month - 1) as usize])
    } else {
        None
    }
}

/// Decode for document export: out-of-range values become an empty
/// string rather than an error.
pub fn decode_or_empty(month: i64) -> &'static str {
    decode(month).unwrap_or("")
}
