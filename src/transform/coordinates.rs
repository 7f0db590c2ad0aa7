//! Decoding of raw latitude/longitude encodings into signed decimal degrees.
//!
//! The snapshot mixes decimal strings (comma or period separator) with
//! fixed-width digit strings that carry an implicit decimal point. String
//! length is the only available discriminator.

use arrow::array::{Float64Array, StringArray};

/// Decode one raw coordinate
///
/// Returns `None` for nulls, empty strings, `nan` and anything unparseable.
#[must_use]
pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return None;
    }

    let normalized = raw.replace(',', ".");
    if normalized.contains('.') {
        return parse_finite(&normalized);
    }

    let is_fixed_width = |width: usize| {
        normalized.len() == width
            && normalized.chars().any(|c| c.is_ascii_digit())
            && normalized.chars().all(|c| c.is_ascii_digit() || c == '-')
    };

    if is_fixed_width(7) {
        // 4872760 -> 48.72760, -2478760 -> -2.478760
        return with_point(&normalized, 2, normalized.starts_with('-'));
    }

    if is_fixed_width(8) {
        // 24787600 -> 2.4787600, -1234567 -> -1.234567
        let negative = normalized.starts_with('-');
        return with_point(&normalized, if negative { 2 } else { 1 }, negative);
    }

    parse_finite(&normalized)
}

/// Insert a decimal point after `split` characters of `digits`
///
/// For negative values the minus sign is counted in `split` and re-attached
/// after the digits are rebuilt, so `-2478760` splits as `-2.478760`.
fn with_point(digits: &str, split: usize, negative: bool) -> Option<f64> {
    if !digits.is_char_boundary(split) || split >= digits.len() {
        return None;
    }
    let (head, tail) = digits.split_at(split);
    let candidate = if negative {
        format!("-{}.{tail}", head.strip_prefix('-').unwrap_or(head))
    } else {
        format!("{head}.{tail}")
    };
    parse_finite(&candidate)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decode a whole column of raw coordinates
#[must_use]
pub fn normalize_coordinates(raw: &StringArray) -> Float64Array {
    raw.iter().map(parse_coordinate).collect()
}
