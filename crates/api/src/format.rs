// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wire formats for dates, times and timestamps.

use crate::error::ApiError;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

/// `YYYY-MM-DD`
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// `HH:MM`, 24-hour clock
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// # Errors
///
/// Returns `InvalidInput` naming `field` if `value` is not `YYYY-MM-DD`.
pub fn parse_date(field: &str, value: &str) -> Result<Date, ApiError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|err| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Expected a YYYY-MM-DD date, got '{value}': {err}"),
    })
}

/// # Errors
///
/// Returns `InvalidInput` naming `field` if `value` is not `HH:MM`.
pub fn parse_time(field: &str, value: &str) -> Result<Time, ApiError> {
    Time::parse(value.trim(), TIME_FORMAT).map_err(|err| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Expected an HH:MM time, got '{value}': {err}"),
    })
}

/// # Errors
///
/// Returns `Internal` if the value cannot be rendered.
pub fn format_date(date: Date) -> Result<String, ApiError> {
    date.format(DATE_FORMAT).map_err(|err| internal(&err))
}

/// # Errors
///
/// Returns `Internal` if the value cannot be rendered.
pub fn format_time(time: Time) -> Result<String, ApiError> {
    time.format(TIME_FORMAT).map_err(|err| internal(&err))
}

/// # Errors
///
/// Returns `Internal` if the value cannot be rendered.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, ApiError> {
    timestamp.format(&Rfc3339).map_err(|err| internal(&err))
}

fn internal(err: &time::error::Format) -> ApiError {
    ApiError::Internal {
        message: format!("Failed to format timestamp: {err}"),
    }
}
