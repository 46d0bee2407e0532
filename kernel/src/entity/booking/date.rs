use error_stack::Report;
use time::{Duration, OffsetDateTime, UtcOffset};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

/// Length of the slot a booking claims, used for display only.
pub const SLOT_LENGTH: Duration = Duration::hours(1);

/// Start instant of the slot a booking claims.
///
/// Always stored in UTC and truncated to whole minutes, so two requests for the
/// same slot compare equal no matter how precisely or in which offset they were sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Fromln, AsRefln)]
pub struct BookingDate(OffsetDateTime);

impl BookingDate {
    /// Fails with `InvalidArgument` when the instant, or the end of its slot, cannot
    /// be represented in UTC.
    pub fn new(time: impl Into<OffsetDateTime>) -> Result<Self, Report<KernelError>> {
        let time = time.into();
        time.checked_to_offset(UtcOffset::UTC)
            .and_then(|utc| utc.replace_second(0).ok())
            .and_then(|utc| utc.replace_nanosecond(0).ok())
            .filter(|start| start.checked_add(SLOT_LENGTH).is_some())
            .map(Self)
            .ok_or_else(|| {
                KernelError::InvalidArgument
                    .with_detail(format!("bookingDate is out of the supported range: {time}"))
            })
    }

    /// `"01 Jan 2024 (10:00 - 11:00)"`
    pub fn slot_label(&self) -> String {
        let start = self.0;
        // Time-of-day arithmetic wraps at midnight instead of overflowing the date.
        let end = start.time() + SLOT_LENGTH;
        let month = start.month().to_string();
        format!(
            "{:02} {} {} ({:02}:{:02} - {:02}:{:02})",
            start.day(),
            &month[..3],
            start.year(),
            start.hour(),
            start.minute(),
            end.hour(),
            end.minute()
        )
    }
}

#[cfg(test)]
mod test {
    use time::macros::{datetime, offset};
    use time::{Date, Month, OffsetDateTime, Time};

    use super::BookingDate;
    use crate::{FindDetail, KernelError};

    #[test]
    fn normalizes_to_utc_minutes() {
        let precise = BookingDate::new(datetime!(2024-01-01 10:00:42.123 UTC)).unwrap();
        let shifted = BookingDate::new(datetime!(2024-01-01 17:00 +7)).unwrap();
        assert_eq!(precise, shifted);
        assert_eq!(precise.as_ref(), &datetime!(2024-01-01 10:00 UTC));
        assert_eq!(precise.as_ref().offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn slot_label() {
        let date = BookingDate::new(datetime!(2024-03-09 23:30 UTC)).unwrap();
        assert_eq!(date.slot_label(), "09 Mar 2024 (23:30 - 00:30)");
    }

    #[test]
    fn rejects_last_representable_slots() {
        let last_day = Date::from_calendar_date(9999, Month::December, 31).unwrap();
        let late = OffsetDateTime::new_utc(last_day, Time::from_hms(23, 30, 0).unwrap());

        // Shifting to UTC leaves the supported year range.
        let report = BookingDate::new(late.replace_offset(offset!(-1))).unwrap_err();
        assert_eq!(report.current_context(), &KernelError::InvalidArgument);
        assert!(report
            .detail()
            .is_some_and(|detail| detail.as_ref().starts_with("bookingDate")));

        // Valid in UTC, but the slot would end after the last representable instant.
        let report = BookingDate::new(late).unwrap_err();
        assert_eq!(report.current_context(), &KernelError::InvalidArgument);

        let earlier = OffsetDateTime::new_utc(last_day, Time::from_hms(22, 0, 0).unwrap());
        let date = BookingDate::new(earlier).unwrap();
        assert_eq!(date.slot_label(), "31 Dec 9999 (22:00 - 23:00)");
    }
}
