use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

/// Display format of a received time, e.g. `16, Dec 2025 10:30:00 AM`.
pub const RECEIVED_AT_FORMAT: &str = "%d, %b %Y %I:%M:%S %p";

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Formats an epoch-millisecond timestamp in the local timezone
pub fn format_received_at(epoch_millis: i64) -> String {
    format_received_at_in(epoch_millis, &Local)
}

/// Formats an epoch-millisecond timestamp in the given timezone.
/// Values outside chrono's range are returned as the plain number.
pub fn format_received_at_in<Tz>(epoch_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::from_timestamp_millis(epoch_millis) {
        Some(dt) => dt.with_timezone(tz).format(RECEIVED_AT_FORMAT).to_string(),
        None => epoch_millis.to_string(),
    }
}
