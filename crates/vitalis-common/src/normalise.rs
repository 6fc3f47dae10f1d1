//! Best-effort coercion of raw form text into feature slot values.
//!
//! Every function here is total: absent or malformed input becomes the
//! zero default for the slot instead of an error.

use crate::features::{FeatureKind, FeatureValue};

/// Lowercased spellings that coerce a flag to 1.
const AFFIRMATIVE: [&str; 5] = ["1", "true", "yes", "y", "male"];

/// Lowercased spellings that coerce a flag to 0.
const NEGATIVE: [&str; 5] = ["0", "false", "no", "n", "female"];

/// Coerce a binary indicator (gender or symptom).
///
/// Known yes/no spellings win; anything else is parsed as a number and
/// truncated toward zero, so `"2.7"` becomes `2`. Non-finite or unparsable
/// text yields 0.
pub fn coerce_flag(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };
    let v = raw.trim().to_lowercase();

    if AFFIRMATIVE.contains(&v.as_str()) {
        return 1;
    }
    if NEGATIVE.contains(&v.as_str()) {
        return 0;
    }

    match parse_number(&v) {
        Some(x) if x.is_finite() => x.trunc() as i64,
        _ => 0,
    }
}

/// Coerce a continuous measurement. Unparsable text yields 0.0.
pub fn coerce_continuous(raw: Option<&str>) -> f64 {
    raw.and_then(|v| parse_number(v.trim()))
        .unwrap_or(0.0)
}

/// Parse a decimal number, allowing single `_` separators between digits
/// (`"1_000"`). Any other underscore makes the text unparsable.
fn parse_number(text: &str) -> Option<f64> {
    if !text.contains('_') {
        return text.parse().ok();
    }
    let bytes = text.as_bytes();
    let grouped = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && i + 1 < bytes.len()
                && bytes[i - 1].is_ascii_digit()
                && bytes[i + 1].is_ascii_digit())
    });
    if !grouped {
        return None;
    }
    text.replace('_', "").parse().ok()
}

/// Apply the coercion rule matching the slot's declared kind.
pub fn normalise_field(kind: FeatureKind, raw: Option<&str>) -> FeatureValue {
    match kind {
        FeatureKind::Flag => FeatureValue::Flag(coerce_flag(raw)),
        FeatureKind::Continuous => FeatureValue::Continuous(coerce_continuous(raw)),
    }
}
