//! Timestamp formatting for axis ticks and the time range control.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

/// Second-precision format shown on the reset control
pub const FULL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tick label pattern suited to a span of `days` days
pub fn nice_time_format_by_day(days: u32) -> &'static str {
    if days > 30 {
        "%Y-%m-%d"
    } else if days > 7 {
        "%B %d"
    } else if days > 1 {
        "%m-%d %H:%M"
    } else {
        "%H:%M:%S"
    }
}

/// Format epoch milliseconds in `tz`. Out-of-range values print as raw numbers.
pub fn format_millis_in<Tz>(millis: i64, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(tz).format(pattern).to_string(),
        None => millis.to_string(),
    }
}

/// Full local timestamp, e.g. `2021-05-03 14:05:09`
pub fn format_full(millis: i64) -> String {
    format_millis_in(millis, &Local, FULL_TIME_FORMAT)
}

/// Local time axis tick label at one-day granularity
pub fn format_tick(millis: i64) -> String {
    format_millis_in(millis, &Local, nice_time_format_by_day(1))
}
