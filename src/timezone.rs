//! Resolving the configured timezone to the current UTC offset.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// The current UTC offset of `canonical_timezone`, e.g. "Europe/Moscow".
///
/// Returns `None` if `canonical_timezone` is not a known timezone name.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}
