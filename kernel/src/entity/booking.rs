mod amount;
mod date;
mod id;
mod rating;
mod status;
mod timer;

pub use self::{amount::*, date::*, id::*, rating::*, status::*, timer::*};
use destructure::{Destructure, Mutation};
use time::OffsetDateTime;
use vodca::References;

use crate::entity::{CreatedAt, MachineId, UpdatedAt, UserId};

#[derive(Debug, Clone, PartialEq, References, Destructure, Mutation)]
pub struct Booking {
    id: BookingId,
    user_id: UserId,
    machine_id: MachineId,
    booking_date: BookingDate,
    status: BookingStatus,
    amount: BookingAmount,
    service: Option<ServiceName>,
    rating: Option<BookingRating>,
    created_at: CreatedAt<Booking>,
    updated_at: UpdatedAt<Booking>,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookingId,
        user_id: UserId,
        machine_id: MachineId,
        booking_date: BookingDate,
        status: BookingStatus,
        amount: BookingAmount,
        service: Option<ServiceName>,
        rating: Option<BookingRating>,
        created_at: CreatedAt<Booking>,
        updated_at: UpdatedAt<Booking>,
    ) -> Self {
        Self {
            id,
            user_id,
            machine_id,
            booking_date,
            status,
            amount,
            service,
            rating,
            created_at,
            updated_at,
        }
    }

    /// A fresh reservation request, always [`BookingStatus::Pending`].
    pub fn create(
        id: BookingId,
        user_id: UserId,
        machine_id: MachineId,
        booking_date: BookingDate,
        amount: BookingAmount,
        service: Option<ServiceName>,
        now: OffsetDateTime,
    ) -> Self {
        Self::new(
            id,
            user_id,
            machine_id,
            booking_date,
            BookingStatus::Pending,
            amount,
            service,
            None,
            CreatedAt::new(now),
            UpdatedAt::new(now),
        )
    }

    pub fn approve(&mut self, now: OffsetDateTime) -> Result<Approval, TransitionError> {
        let approval = self.status.approve()?;
        if approval == Approval::Started {
            self.move_to(BookingStatus::InProgress, now);
        }
        Ok(approval)
    }

    pub fn complete(&mut self, now: OffsetDateTime) -> Result<(), TransitionError> {
        let next = self.status.complete()?;
        self.move_to(next, now);
        Ok(())
    }

    pub fn cancel(&mut self, now: OffsetDateTime) -> Result<(), TransitionError> {
        let next = self.status.cancel()?;
        self.move_to(next, now);
        Ok(())
    }

    pub fn reschedule(&mut self, booking_date: BookingDate, now: OffsetDateTime) {
        self.substitute(|booking| {
            *booking.booking_date = booking_date;
            *booking.updated_at = UpdatedAt::new(now);
        });
    }

    pub fn revise(
        &mut self,
        amount: Option<BookingAmount>,
        service: Option<ServiceName>,
        now: OffsetDateTime,
    ) {
        self.substitute(|booking| {
            if let Some(amount) = amount {
                *booking.amount = amount;
            }
            if let Some(service) = service {
                *booking.service = Some(service);
            }
            *booking.updated_at = UpdatedAt::new(now);
        });
    }

    /// Rating gate: completed, owned by `user_id`, not rated yet.
    pub fn check_rating_eligibility(&self, user_id: &UserId) -> Result<(), RatingRejection> {
        if self.status != BookingStatus::Completed {
            return Err(RatingRejection::NotCompleted(self.status));
        }
        if &self.user_id != user_id {
            return Err(RatingRejection::NotOwner);
        }
        if self.rating.is_some() {
            return Err(RatingRejection::AlreadyRated);
        }
        Ok(())
    }

    pub fn rate(
        &mut self,
        user_id: &UserId,
        rating: BookingRating,
        now: OffsetDateTime,
    ) -> Result<(), RatingRejection> {
        if !rating.is_in_range() {
            return Err(RatingRejection::OutOfRange(*rating.as_ref()));
        }
        self.check_rating_eligibility(user_id)?;
        self.substitute(|booking| {
            *booking.rating = Some(rating);
            *booking.updated_at = UpdatedAt::new(now);
        });
        Ok(())
    }

    fn move_to(&mut self, status: BookingStatus, now: OffsetDateTime) {
        self.substitute(|booking| {
            *booking.status = status;
            *booking.updated_at = UpdatedAt::new(now);
        });
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::entity::{
        Approval, Booking, BookingAmount, BookingDate, BookingId, BookingRating, BookingStatus,
        MachineId, RatingRejection, TransitionError, UserId,
    };

    const CREATED: OffsetDateTime = datetime!(2024-01-01 09:00 UTC);

    fn pending(user_id: UserId) -> Booking {
        Booking::create(
            BookingId::new(Uuid::new_v4()),
            user_id,
            MachineId::new(Uuid::new_v4()),
            BookingDate::new(datetime!(2024-01-01 10:00 UTC)).unwrap(),
            BookingAmount::new(30.0),
            None,
            CREATED,
        )
    }

    #[test]
    fn lifecycle_updates_status_and_audit_time() {
        let mut booking = pending(UserId::new(Uuid::new_v4()));
        assert_eq!(booking.status(), &BookingStatus::Pending);
        assert_eq!(booking.created_at().as_ref(), &CREATED);

        let approved_at = datetime!(2024-01-01 10:00 UTC);
        assert_eq!(booking.approve(approved_at), Ok(Approval::Started));
        assert_eq!(booking.status(), &BookingStatus::InProgress);
        assert_eq!(booking.updated_at().as_ref(), &approved_at);

        let again = datetime!(2024-01-01 10:01 UTC);
        assert_eq!(booking.approve(again), Ok(Approval::AlreadyStarted));
        assert_eq!(booking.updated_at().as_ref(), &approved_at);

        booking.complete(datetime!(2024-01-01 11:00 UTC)).unwrap();
        assert_eq!(booking.status(), &BookingStatus::Completed);

        let before = booking.clone();
        assert_eq!(
            booking.approve(datetime!(2024-01-01 12:00 UTC)),
            Err(TransitionError::Approve {
                from: BookingStatus::Completed
            })
        );
        assert_eq!(booking, before);
    }

    #[test]
    fn cancel_only_pending() {
        let mut booking = pending(UserId::new(Uuid::new_v4()));
        booking.cancel(CREATED).unwrap();
        assert_eq!(booking.status(), &BookingStatus::Cancelled);
        assert!(booking.cancel(CREATED).is_err());
        assert!(booking.complete(CREATED).is_err());
    }

    #[test]
    fn rating_gate() {
        let owner = UserId::new(Uuid::new_v4());
        let mut booking = pending(owner.clone());
        let now = datetime!(2024-01-01 12:00 UTC);

        assert_eq!(
            booking.rate(&owner, BookingRating::new(5), now),
            Err(RatingRejection::NotCompleted(BookingStatus::Pending))
        );

        booking.approve(now).unwrap();
        booking.complete(now).unwrap();

        assert_eq!(
            booking.rate(&UserId::new(Uuid::new_v4()), BookingRating::new(4), now),
            Err(RatingRejection::NotOwner)
        );
        assert_eq!(
            booking.rate(&owner, BookingRating::new(6), now),
            Err(RatingRejection::OutOfRange(6))
        );

        booking.rate(&owner, BookingRating::new(4), now).unwrap();
        assert_eq!(booking.rating(), &Some(BookingRating::new(4)));
        assert_eq!(
            booking.rate(&owner, BookingRating::new(5), now),
            Err(RatingRejection::AlreadyRated)
        );
    }
}
