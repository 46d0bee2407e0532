use time::macros::datetime;

use application::service::{
    ApproveBookingService, CompleteBookingService, CreateBookingService, RateBookingService,
};
use application::transfer::{ApproveBookingDto, CompleteBookingDto, RateBookingDto};
use driver::database::MemoryDatabase;
use kernel::KernelError;

mod common;

use common::{booking_request, detail_of, machine, user};

#[tokio::test]
async fn only_owner_rates_completed_booking_once() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let owner = user(&db, "owner").await?;
    let stranger = user(&db, "stranger").await?;
    let washer = machine(&db, "W-01").await?;
    let booking = db
        .create_booking(booking_request(&owner, &washer, datetime!(2024-01-01 10:00 UTC)))
        .await?;

    let rate = |user_id, score| RateBookingDto {
        id: booking.id,
        user_id: Some(user_id),
        score: Some(score),
    };

    let report = db.rate_booking(rate(owner.id, 5)).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidState);
    assert!(detail_of(&report).contains("current status is: Pending"));

    db.approve_booking(ApproveBookingDto { id: booking.id })
        .await?;
    db.complete_booking(CompleteBookingDto { id: booking.id })
        .await?;

    let report = db.rate_booking(rate(stranger.id, 4)).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidState);
    assert_eq!(detail_of(&report), "Cannot rate other user's booking");

    let report = db.rate_booking(rate(owner.id, 0)).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidArgument);

    let rated = db.rate_booking(rate(owner.id, 4)).await?;
    assert_eq!(rated.rating, Some(4));

    let report = db.rate_booking(rate(owner.id, 5)).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidState);
    assert_eq!(detail_of(&report), "Booking already rated");
    Ok(())
}
