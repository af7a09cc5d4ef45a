//! Wall-clock formatting for API payloads
//!
//! Uses the local offset when it can be determined and UTC otherwise
//! (the `time` crate refuses to read the offset in some multi-threaded
//! environments).

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

/// Current local time, UTC on failure
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `HH:MM:SS`, used for `last_update`
pub fn time_of_day(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default()
}

/// `YYYY-MM-DD HH:MM:SS`, used for `server_time`
pub fn date_time(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_default()
}

/// RFC 3339 timestamp, used by the health check
pub fn rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}
