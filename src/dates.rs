// Calendar date helpers for day navigation. Dates are always local-time
// calendar days in ISO `YYYY-MM-DD` form.

use chrono::{Days, Local, NaiveDate};
use thiserror::Error;

pub const ISO_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum DateError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    Invalid(String),
    #[error("date out of range")]
    OutOfRange,
}

/// Today in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Shift `date` by `offset` calendar days in either direction.
pub fn shift_days(date: NaiveDate, offset: i64) -> Result<NaiveDate, DateError> {
    let days = Days::new(offset.unsigned_abs());
    let shifted = if offset >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    shifted.ok_or(DateError::OutOfRange)
}

pub fn parse_iso(input: &str) -> Result<NaiveDate, DateError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, ISO_FORMAT).map_err(|_| DateError::Invalid(input.to_string()))
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}
