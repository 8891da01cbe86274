//! Calendar date encoding for SQLite.
//!
//! Due dates are calendar dates with no time-of-day, stored as `YYYY-MM-DD`
//! text so SQLite's lexicographic comparison matches date order.

use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date for storage and SQL comparisons.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored `YYYY-MM-DD` string.
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date(&format_date(date)), Ok(date));
    }

    #[test]
    fn lexicographic_order_matches_date_order() {
        let earlier = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert!(format_date(earlier) < format_date(later));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_date("03/09/2024").is_err());
    }
}
