use time_tz::Tz;

use crate::Error;

/// Get the timezone for a canonical timezone name, e.g. "Africa/Luanda".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    time_tz::timezones::get_by_name(canonical_timezone)
}

/// Like [get_timezone], but an unknown timezone is an [Error::InvalidTimezone].
pub fn require_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    get_timezone(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezone(canonical_timezone.to_owned())
    })
}
