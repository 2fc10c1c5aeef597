// Precision and year detection for series of cell values.

use crate::config::SortValue;

/// Strict numeric reading of a cell. Empty cells and the textual
/// infinities/NaN are not numbers.
pub fn parse_number(value: &str) -> Option<f64> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    match v.parse::<f64>() {
        Ok(x) if x.is_finite() => Some(x),
        _ => None,
    }
}

/// Numeric reading of a cell that tolerates thousands separators.
pub fn parse_number_lenient(value: &str) -> Option<f64> {
    parse_number(&value.replace(',', ""))
}

/// The value used to sort a table cell.
pub fn to_sort_value(value: &str) -> SortValue {
    match parse_number_lenient(value) {
        Some(x) => SortValue::Number(x),
        None => SortValue::Text(value.to_string()),
    }
}

/// Number of significant digits after the decimal point.
///
/// A trailing `%` is ignored, trailing zeros do not count. Non-numeric
/// values have no decimal places.
pub fn decimal_places(value: &str) -> usize {
    let v = value.trim();
    let v = v.strip_suffix('%').unwrap_or(v);
    if parse_number_lenient(v).is_none() {
        return 0;
    }
    match v.find('.') {
        None => 0,
        Some(idx) => v[idx + 1..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .trim_end_matches('0')
            .len(),
    }
}

/// The largest number of decimal places in the series, 0 when empty.
pub fn series_decimal_places<S: AsRef<str>>(values: &[S]) -> usize {
    values
        .iter()
        .map(|v| decimal_places(v.as_ref()))
        .max()
        .unwrap_or(0)
}

/// True if every value is a whole number between 1950 and 2050 (inclusive).
///
/// A blank cell is not a year. An empty series could be one.
pub fn series_could_be_year<S: AsRef<str>>(values: &[S]) -> bool {
    values
        .iter()
        .map(|v| v.as_ref().trim())
        .all(|v| match parse_number(v) {
            Some(x) => decimal_places(v) == 0 && (1950.0..=2050.0).contains(&x),
            None => false,
        })
}

/// Formats a number with exactly `dp` decimals and thousands separators.
///
/// Halves are rounded away from zero. `%` signs are dropped. Values that
/// cannot be read as a number, including values that already carry
/// separators, are returned unchanged.
pub fn format_number_with_decimal_places(value: &str, dp: usize) -> String {
    let stripped = value.replace('%', "");
    match parse_number(&stripped) {
        Some(x) => group_thousands(&format!("{:.*}", dp, round_half_away(x, dp))),
        None => value.to_string(),
    }
}

fn round_half_away(x: f64, dp: usize) -> f64 {
    let factor = 10f64.powi(dp as i32);
    let scaled = x * factor;
    if !scaled.is_finite() {
        return x;
    }
    scaled.round() / factor
}

fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(idx) => (&unsigned[..idx], &unsigned[idx..]),
        None => (unsigned, ""),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, c) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}
