//! Field-level coercion helpers.
//!
//! Every function here is total: malformed text degrades to a default instead
//! of producing an error. Text is always trimmed before it is interpreted.

/// Maximum length (in characters) kept for a facility name.
pub const MAX_NAME_CHARS: usize = 255;

/// Parse a number written with a comma decimal separator.
///
/// Every `,` in the trimmed text is replaced with `.` before parsing, so a
/// thousands-separated value such as `"1.234,56"` becomes `"1.234.56"` and is
/// rejected. Empty, absent, unparseable and non-finite inputs yield `None`.
///
/// ```
/// use siga_core::parse_locale_float;
///
/// assert_eq!(parse_locale_float(Some("123,45")), Some(123.45));
/// assert_eq!(parse_locale_float(Some("1.234,56")), None);
/// assert_eq!(parse_locale_float(None), None);
/// ```
pub fn parse_locale_float(text: Option<&str>) -> Option<f64> {
    let trimmed = text?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Power columns: invalid or missing values count as zero power.
pub fn parse_power(text: Option<&str>) -> f64 {
    parse_locale_float(text).unwrap_or(0.0)
}

/// Coordinate columns: invalid or missing values stay absent, never zero.
pub fn parse_coordinate(text: Option<&str>) -> Option<f64> {
    parse_locale_float(text)
}

/// `true` only for a case-insensitive "sim".
pub fn parse_flag(text: Option<&str>) -> bool {
    text.is_some_and(|t| t.trim().to_lowercase() == "sim")
}

/// Keep the first entry of a semicolon-separated list.
///
/// The first token is not validated; `";Campinas"` yields an empty string.
pub fn first_municipality(text: Option<&str>) -> Option<String> {
    let trimmed = text?.trim();
    let first = trimmed.split(';').next().unwrap_or(trimmed);
    Some(first.trim().to_string())
}

pub fn clean_text(text: Option<&str>) -> String {
    text.map(str::trim).unwrap_or_default().to_string()
}

/// Trim and cap a name at `max_chars` characters.
///
/// The cut lands on a char boundary and any whitespace exposed by the cut is
/// trimmed again, so applying this twice gives the same result.
pub fn truncate_name(text: Option<&str>, max_chars: usize) -> (String, bool) {
    let trimmed = text.map(str::trim).unwrap_or_default();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => (trimmed[..cut].trim_end().to_string(), true),
        None => (trimmed.to_string(), false),
    }
}
