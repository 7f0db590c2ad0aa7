//! Lenient numeric and calendar coercion over whole columns.
//!
//! Every function here recovers locally: a value that fails to parse becomes
//! null, never an error.

use arrow::array::{Array, BooleanArray, Float64Array, Int32Array, StringArray};
use arrow::compute::kernels::arity::unary;
use chrono::{Datelike, NaiveDate};

/// Oldest plausible age at the time of an accident
pub const MAX_PLAUSIBLE_AGE: i32 = 120;

/// Parse a float, trimming surrounding whitespace
#[must_use]
pub fn parse_float(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integer, accepting integral floats such as `"2.0"`
#[must_use]
pub fn parse_int(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i32>() {
        return Some(value);
    }
    let value = parse_float(raw)?;
    (value.fract() == 0.0 && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX))
        .then_some(value as i32)
}

/// Coerce a string column to `Int32`
#[must_use]
pub fn int_column(raw: &StringArray) -> Int32Array {
    raw.iter().map(|v| v.and_then(parse_int)).collect()
}

/// Coerce a string column to `Float64`
#[must_use]
pub fn float_column(raw: &StringArray) -> Float64Array {
    raw.iter().map(|v| v.and_then(parse_float)).collect()
}

/// Convert a centimeter column to meters
#[must_use]
pub fn centimeters_to_meters(raw: &StringArray) -> Float64Array {
    unary(&float_column(raw), |cm| cm / 100.0)
}

/// True where the raw value parses as a number; nulls are false
#[must_use]
pub fn numeric_flags(raw: &StringArray) -> BooleanArray {
    raw.iter()
        .map(|v| Some(v.and_then(parse_float).is_some()))
        .collect()
}

/// Split `HH:MM` (or compact `HHMM`) times into hour and minute columns
#[must_use]
pub fn hour_minute(raw: &StringArray) -> (Int32Array, Int32Array) {
    let (hours, minutes): (Vec<Option<i32>>, Vec<Option<i32>>) = raw
        .iter()
        .map(|v| match v.and_then(parse_hour_minute) {
            Some((h, m)) => (Some(h), Some(m)),
            None => (None, None),
        })
        .unzip();
    (Int32Array::from(hours), Int32Array::from(minutes))
}

fn parse_hour_minute(raw: &str) -> Option<(i32, i32)> {
    let raw = raw.trim();
    let (hour, minute) = match raw.split_once(':') {
        Some((h, m)) => (h.trim().parse::<i32>().ok()?, m.trim().parse::<i32>().ok()?),
        None if (3..=4).contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_digit()) => {
            let (h, m) = raw.split_at(raw.len() - 2);
            (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)
        }
        None => return None,
    };
    Some((hour, minute))
}

/// Zero-pad codes on the left to `width` characters
///
/// A leading sign stays in front of the padding, so `-1` becomes `-0001`.
#[must_use]
pub fn zero_pad(raw: &StringArray, width: usize) -> StringArray {
    raw.iter().map(|v| v.map(|s| pad_code(s.trim(), width))).collect()
}

fn pad_code(code: &str, width: usize) -> String {
    match code.strip_prefix(['-', '+']) {
        Some(digits) => {
            let digits_width = width.saturating_sub(1);
            format!("{}{digits:0>digits_width$}", &code[..1])
        }
        None => format!("{code:0>width$}"),
    }
}

/// Trim values, mapping blanks to null
#[must_use]
pub fn trimmed(raw: &StringArray) -> StringArray {
    raw.iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()))
        .collect()
}

/// ISO day of week (Monday = 1 .. Sunday = 7) of proleptic Gregorian dates
///
/// Invalid or incomplete triples yield null.
#[must_use]
pub fn day_of_week(year: &Int32Array, month: &Int32Array, day: &Int32Array) -> Int32Array {
    (0..year.len())
        .map(|i| {
            let (y, m, d) = (
                valid(year, i)?,
                u32::try_from(valid(month, i)?).ok()?,
                u32::try_from(valid(day, i)?).ok()?,
            );
            NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| i32::try_from(date.weekday().number_from_monday()).ok())
        })
        .collect()
}

/// Age at the accident, nulled when outside `[0, MAX_PLAUSIBLE_AGE]`
#[must_use]
pub fn age_at_accident(accident_year: &Int32Array, birth_year: &Int32Array) -> Int32Array {
    (0..accident_year.len())
        .map(|i| {
            let age = valid(accident_year, i)?.checked_sub(valid(birth_year, i)?)?;
            (0..=MAX_PLAUSIBLE_AGE).contains(&age).then_some(age)
        })
        .collect()
}

fn valid(array: &Int32Array, i: usize) -> Option<i32> {
    array.is_valid(i).then(|| array.value(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_accepts_integral_floats() {
        assert_eq!(parse_int("2"), Some(2));
        assert_eq!(parse_int(" 3 "), Some(3));
        assert_eq!(parse_int("2.0"), Some(2));
        assert_eq!(parse_int("2.5"), None);
        assert_eq!(parse_int("deux"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn test_centimeters_to_meters() {
        let raw = StringArray::from(vec![Some("350"), None, Some("x"), Some("0")]);
        let meters = centimeters_to_meters(&raw);
        assert_eq!(meters.value(0), 3.5);
        assert!(meters.is_null(1));
        assert!(meters.is_null(2));
        assert_eq!(meters.value(3), 0.0);
    }

    #[test]
    fn test_numeric_flags_treat_null_as_false() {
        let raw = StringArray::from(vec![Some("99"), None, Some("Ecole"), Some("0")]);
        assert_eq!(
            numeric_flags(&raw),
            BooleanArray::from(vec![true, false, false, true])
        );
    }

    #[test]
    fn test_hour_minute_formats() {
        let raw = StringArray::from(vec![Some("17:45"), Some("0830"), Some("915"), None, Some("xx")]);
        let (hours, minutes) = hour_minute(&raw);
        assert_eq!(hours, Int32Array::from(vec![Some(17), Some(8), Some(9), None, None]));
        assert_eq!(minutes, Int32Array::from(vec![Some(45), Some(30), Some(15), None, None]));
    }

    #[test]
    fn test_day_of_week_monday_is_one() {
        // 2019-11-30 was a Saturday, 2021-02-29 does not exist
        let year = Int32Array::from(vec![Some(2019), Some(2021), None, Some(2024)]);
        let month = Int32Array::from(vec![Some(11), Some(2), Some(1), Some(1)]);
        let day = Int32Array::from(vec![Some(30), Some(29), Some(1), Some(1)]);

        let dow = day_of_week(&year, &month, &day);
        assert_eq!(dow, Int32Array::from(vec![Some(6), None, None, Some(1)]));
    }

    #[test]
    fn test_age_sanitization_bounds() {
        let year = Int32Array::from(vec![2020, 2020, 2020, 2020, 2020]);
        let birth = Int32Array::from(vec![Some(1899), Some(2021), Some(2020), Some(1900), None]);

        let ages = age_at_accident(&year, &birth);
        assert_eq!(ages, Int32Array::from(vec![None, None, Some(0), Some(120), None]));
    }

    #[test]
    fn test_zero_pad_and_trim() {
        let raw = StringArray::from(vec![Some("75"), Some("2A004"), Some(" 1 "), None]);
        assert_eq!(
            zero_pad(&raw, 5),
            StringArray::from(vec![Some("00075"), Some("2A004"), Some("00001"), None])
        );
        let signed = StringArray::from(vec!["-1", "+7", "-123456", "-"]);
        assert_eq!(
            zero_pad(&signed, 5),
            StringArray::from(vec!["-0001", "+0007", "-123456", "-0000"])
        );
        assert_eq!(
            trimmed(&raw),
            StringArray::from(vec![Some("75"), Some("2A004"), Some("1"), None])
        );
    }
}
