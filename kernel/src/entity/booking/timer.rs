use time::OffsetDateTime;

use crate::entity::{Booking, BookingStatus};

/// How long a pending booking waits for a manager before it is considered stale.
pub const PENDING_WINDOW_SECONDS: i64 = 900;
/// How long an approved booking may keep its machine.
pub const IN_USE_WINDOW_SECONDS: i64 = 3600;

/// Seconds left on the countdown shown to clients. Advisory only, never negative.
///
/// `usage_started_at` is the occupancy start of the booking's machine; when it is
/// missing an in-progress booking is treated as just started.
pub fn remaining_seconds(
    booking: &Booking,
    usage_started_at: Option<&OffsetDateTime>,
    now: OffsetDateTime,
) -> i64 {
    let remaining = match booking.status() {
        BookingStatus::Pending => {
            PENDING_WINDOW_SECONDS - elapsed_seconds(booking.created_at().as_ref(), &now)
        }
        BookingStatus::InProgress => match usage_started_at {
            Some(started_at) => IN_USE_WINDOW_SECONDS - elapsed_seconds(started_at, &now),
            None => IN_USE_WINDOW_SECONDS,
        },
        BookingStatus::Completed | BookingStatus::Cancelled => 0,
    };
    remaining.max(0)
}

fn elapsed_seconds(since: &OffsetDateTime, now: &OffsetDateTime) -> i64 {
    (*now - *since).whole_seconds().max(0)
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use crate::entity::{
        remaining_seconds, Booking, BookingAmount, BookingDate, BookingId, MachineId, UserId,
    };

    const T: OffsetDateTime = datetime!(2024-01-01 09:00 UTC);

    fn booking() -> Booking {
        Booking::create(
            BookingId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            MachineId::new(Uuid::new_v4()),
            BookingDate::new(datetime!(2024-01-01 10:00 UTC)).unwrap(),
            BookingAmount::new(0.0),
            None,
            T,
        )
    }

    #[test]
    fn pending_counts_down_from_creation() {
        let booking = booking();
        assert_eq!(remaining_seconds(&booking, None, T), 900);
        assert_eq!(remaining_seconds(&booking, None, T + Duration::seconds(300)), 600);
        assert_eq!(remaining_seconds(&booking, None, T + Duration::seconds(900)), 0);
        assert_eq!(remaining_seconds(&booking, None, T + Duration::seconds(901)), 0);
        assert_eq!(remaining_seconds(&booking, None, T + Duration::days(2)), 0);
    }

    #[test]
    fn in_progress_counts_down_from_usage_start() {
        let mut booking = booking();
        let s = T + Duration::minutes(5);
        booking.approve(s).unwrap();

        assert_eq!(remaining_seconds(&booking, Some(&s), s), 3600);
        assert_eq!(
            remaining_seconds(&booking, Some(&s), s + Duration::seconds(1800)),
            1800
        );
        assert_eq!(
            remaining_seconds(&booking, Some(&s), s + Duration::seconds(3601)),
            0
        );
        assert_eq!(remaining_seconds(&booking, None, s + Duration::hours(3)), 3600);
    }

    #[test]
    fn terminal_is_zero() {
        let mut booking = booking();
        booking.cancel(T).unwrap();
        assert_eq!(remaining_seconds(&booking, None, T), 0);
    }
}
