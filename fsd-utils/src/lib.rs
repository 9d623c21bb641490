//! Shared utility functions for FSD crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::NaiveDate;

    /// Format used for ledger and dataset dates: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| DateError(s.to_string()))
    }

    /// Parse a "Month Year" phrase such as "March 2019" into the first day of
    /// that month. Abbreviated month names are accepted as well.
    pub fn parse_month_year(s: &str) -> Result<NaiveDate, DateError> {
        NaiveDate::parse_from_str(&format!("1 {}", s.trim()), "%d %B %Y")
            .map_err(|_| DateError(s.to_string()))
    }

    /// Parse a bare four digit year into January 1 of that year.
    pub fn parse_year(s: &str) -> Result<NaiveDate, DateError> {
        let s_trim = s.trim();
        if s_trim.len() != 4 || !s_trim.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError(s.to_string()));
        }
        let year: i32 = s_trim.parse().map_err(|_| DateError(s.to_string()))?;
        NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| DateError(s.to_string()))
    }

    /// Parse "Month Year", falling back to a bare year.
    pub fn parse_month_or_year(s: &str) -> Result<NaiveDate, DateError> {
        parse_month_year(s).or_else(|_| parse_year(s))
    }

    /// Whole days elapsed from `since` to `today`. Negative when `since` is in
    /// the future.
    pub fn days_since(since: &NaiveDate, today: &NaiveDate) -> i64 {
        (*today - *since).num_days()
    }

}

/// Error types
pub mod error {
    use std::fmt;

    /// A date phrase that matched none of the accepted formats.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: unrecognised date {:?}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
