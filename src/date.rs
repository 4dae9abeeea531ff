//! Conversion between `YYYY-MM-DD` date strings and transaction timestamps.

use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};
use time_tz::{Offset, OffsetResult, PrimitiveDateTimeExt, TimeZone, Tz};

use crate::transaction::Timestamp;

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

const NANOSECONDS_PER_MILLISECOND: i128 = 1_000_000;

/// Parse a `YYYY-MM-DD` date as local midnight in `timezone` and return it in epoch milliseconds.
///
/// The UTC offset is the one in effect on that date, so daylight saving is taken into account.
/// Returns `None` if `date` is not in the expected format or is not a real calendar date.
pub fn parse_date_to_timestamp(date: &str, timezone: &Tz) -> Option<Timestamp> {
    let midnight = Date::parse(date.trim(), DATE_FORMAT).ok()?.midnight();

    let local_midnight = match midnight.assume_timezone(timezone) {
        OffsetResult::Some(datetime) | OffsetResult::Ambiguous(datetime, _) => datetime,
        // Midnight was skipped by a clock change, use the offset in effect just after it.
        OffsetResult::None => midnight.assume_timezone_utc(timezone),
    };

    Timestamp::try_from(local_midnight.unix_timestamp_nanos() / NANOSECONDS_PER_MILLISECOND).ok()
}

/// Format epoch milliseconds as the `YYYY-MM-DD` date it falls on in `timezone`.
///
/// Returns `None` if `timestamp` is outside the range of representable dates.
pub fn format_timestamp_as_date(timestamp: Timestamp, timezone: &Tz) -> Option<String> {
    let nanos = i128::from(timestamp) * NANOSECONDS_PER_MILLISECOND;
    let datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    let offset = timezone.get_offset_utc(&datetime).to_utc();

    datetime
        .checked_to_offset(offset)?
        .date()
        .format(DATE_FORMAT)
        .ok()
}
