//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// A wrapper around `Timestamp` that formats in the system timezone via the
/// `Display` trait.
///
/// The display format follows the pattern `YYYY-MM-DD HH:MM TZ`: zero-padded
/// date, 24-hour time, timezone abbreviation (e.g., UTC, EST, JST). Seconds
/// are omitted; session and plan timestamps never need that resolution.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}
