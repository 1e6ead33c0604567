//! Value formatting for X12 data elements.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{Result, X12Error};

/// Format a monetary amount with two decimals.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Format a quantity, dropping the fraction when it is whole.
#[must_use]
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        let text = format!("{quantity:.3}");
        text.trim_end_matches('0').to_string()
    }
}

/// CCYYMMDD date.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// YYMMDD date used by ISA09.
#[must_use]
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// HHMM time.
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H%M").to_string()
}

/// Left-justify `value` in a space-padded slot of exactly `width` characters.
pub fn pad_fixed(field: &'static str, value: &str, width: usize) -> Result<String> {
    let len = value.chars().count();
    if len > width {
        return Err(X12Error::field_too_wide(field, value, width));
    }
    Ok(format!("{value:<width$}"))
}

/// Zero-pad a number to `width` digits.
#[must_use]
pub fn zero_pad(value: u64, width: usize) -> String {
    format!("{value:0width$}")
}
