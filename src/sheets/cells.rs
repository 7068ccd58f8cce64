//! Conversions from raw spreadsheet cells.
//!
//! Cells come back as JSON values whose type depends on the render option and
//! on what people typed in the sheet. These helpers read them the way a
//! spreadsheet formula would: numeric text is a number, an empty cell is zero.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Date formats accepted in text cells, tried in order after RFC 3339.
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%B %d, %Y"];

/// Parses user or cell text as a finite number.
///
/// Surrounding whitespace is ignored and an empty string reads as `0`.
///
/// # Examples
///
/// ```
/// assert_eq!(parse_number(" 2.5 "), Some(2.5));
/// assert_eq!(parse_number(""), Some(0.0));
/// assert_eq!(parse_number("two"), None);
/// ```
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Reads a cell as a number, `None` when it holds something else.
pub fn cell_number(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Reads a cell as text. Numbers are printed, other values read as empty.
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Reads a cell as a point in time.
///
/// Text cells may hold an RFC 3339 timestamp (what the bot writes) or a plain
/// date. Number cells are spreadsheet serial dates: days since 1899-12-30, the
/// fraction being the time of day.
pub fn cell_date(cell: &Value) -> Option<NaiveDateTime> {
    match cell {
        Value::Number(n) => n.as_f64().and_then(serial_to_date),
        Value::String(s) => text_to_date(s.trim()),
        _ => None,
    }
}

fn serial_to_date(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::try_seconds(seconds)?)
}

fn text_to_date(text: &str) -> Option<NaiveDateTime> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(date_time.naive_utc());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(text, format) {
            return Some(date_time);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("3"), Some(3.0));
        assert_eq!(parse_number("-1.5"), Some(-1.5));
        assert_eq!(parse_number("  "), Some(0.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_cell_number() {
        assert_eq!(cell_number(&json!(4)), Some(4.0));
        assert_eq!(cell_number(&json!("4.25")), Some(4.25));
        assert_eq!(cell_number(&json!("")), Some(0.0));
        assert_eq!(cell_number(&json!("lots")), None);
        assert_eq!(cell_number(&json!(null)), None);
        assert_eq!(cell_number(&json!(true)), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("bob")), "bob");
        assert_eq!(cell_text(&json!(1234567)), "1234567");
        assert_eq!(cell_text(&json!(null)), "");
    }

    #[test]
    fn test_cell_date_rfc3339() {
        assert_eq!(
            cell_date(&json!("2024-03-01T10:30:00.000Z")),
            Some(date(2024, 3, 1) + Duration::minutes(630))
        );
    }

    #[test]
    fn test_cell_date_plain_dates() {
        assert_eq!(cell_date(&json!("2024-03-01")), Some(date(2024, 3, 1)));
        assert_eq!(cell_date(&json!("01/03/2024")), Some(date(2024, 3, 1)));
        assert_eq!(
            cell_date(&json!("2024-03-01 12:00:00")),
            Some(date(2024, 3, 1) + Duration::hours(12))
        );
    }

    #[test]
    fn test_cell_date_serial() {
        // 45352 is 2024-03-01 in spreadsheet serial days
        assert_eq!(cell_date(&json!(45352)), Some(date(2024, 3, 1)));
        assert_eq!(
            cell_date(&json!(45352.5)),
            Some(date(2024, 3, 1) + Duration::hours(12))
        );
    }

    #[test]
    fn test_cell_date_invalid() {
        assert_eq!(cell_date(&json!("someday")), None);
        assert_eq!(cell_date(&json!(null)), None);
    }

    #[test]
    fn test_cell_date_serial_out_of_range() {
        assert_eq!(cell_date(&json!(1e12)), None);
        assert_eq!(cell_date(&json!(-1e12)), None);
        assert_eq!(cell_date(&json!(1e300)), None);
    }
}
