use time::macros::datetime;

use application::service::{
    ApproveBookingService, CompleteBookingService, CreateBookingService, GetBookingService,
    GetBookingTimerService, GetMachineService,
};
use application::transfer::{
    ApproveBookingDto, CompleteBookingDto, CreateBookingDto, GetBookingDto, GetBookingTimerDto,
    GetMachineDto,
};
use driver::database::MemoryDatabase;
use kernel::prelude::entity::{BookingStatus, MachineStatus};
use kernel::KernelError;

mod common;

use common::{booking_request, detail_of, machine, user};

#[tokio::test]
async fn reservation_runs_through_its_lifecycle() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let first = user(&db, "first").await?;
    let second = user(&db, "second").await?;
    let washer = machine(&db, "W-05").await?;
    let slot = datetime!(2024-01-01 10:00 UTC);

    let booking = db
        .create_booking(booking_request(&first, &washer, slot))
        .await?;
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.slot, "01 Jan 2024 (10:00 - 11:00)");

    let report = db
        .create_booking(booking_request(&second, &washer, slot))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
    assert_eq!(
        detail_of(&report),
        "This time slot for this machine is already taken"
    );

    let approval = db
        .approve_booking(ApproveBookingDto { id: booking.id })
        .await?;
    assert_eq!(approval.status, BookingStatus::InProgress);
    let occupied = db.get_machine(GetMachineDto { id: washer.id }).await?;
    assert_eq!(occupied.status, MachineStatus::InUse);
    assert_eq!(occupied.current_user_id, Some(first.id));
    assert_eq!(occupied.current_booking_id, Some(booking.id));
    assert!(occupied.usage_start_time.is_some());

    let completion = db
        .complete_booking(CompleteBookingDto { id: booking.id })
        .await?;
    assert_eq!(completion.booking.status, BookingStatus::Completed);
    assert_eq!(completion.user.id, first.id);
    assert_eq!(completion.machine.status, MachineStatus::Available);
    assert_eq!(completion.machine.current_user_id, None);
    assert_eq!(completion.machine.usage_start_time, None);

    let report = db
        .approve_booking(ApproveBookingDto { id: booking.id })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidState);
    assert!(detail_of(&report).contains("current status is: Completed"));

    let stored = db.get_booking(GetBookingDto { id: booking.id }).await?;
    assert_eq!(stored.status, BookingStatus::Completed);
    Ok(())
}

#[tokio::test]
async fn approve_twice_is_idempotent() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let owner = user(&db, "owner").await?;
    let dryer = machine(&db, "D-01").await?;
    let booking = db
        .create_booking(booking_request(&owner, &dryer, datetime!(2024-01-01 12:00 UTC)))
        .await?;

    db.approve_booking(ApproveBookingDto { id: booking.id })
        .await?;
    let before = db.get_machine(GetMachineDto { id: dryer.id }).await?;
    let stored = db.get_booking(GetBookingDto { id: booking.id }).await?;

    let again = db
        .approve_booking(ApproveBookingDto { id: booking.id })
        .await?;
    assert_eq!(again.status, BookingStatus::InProgress);
    assert_eq!(db.get_machine(GetMachineDto { id: dryer.id }).await?, before);
    assert_eq!(db.get_booking(GetBookingDto { id: booking.id }).await?, stored);
    Ok(())
}

#[tokio::test]
async fn complete_requires_in_progress() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let owner = user(&db, "owner").await?;
    let washer = machine(&db, "W-01").await?;
    let booking = db
        .create_booking(booking_request(&owner, &washer, datetime!(2024-01-02 09:00 UTC)))
        .await?;

    let report = db
        .complete_booking(CompleteBookingDto { id: booking.id })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidState);
    assert!(detail_of(&report).contains("current status is: Pending"));

    let untouched = db.get_machine(GetMachineDto { id: washer.id }).await?;
    assert_eq!(untouched, washer);
    let stored = db.get_booking(GetBookingDto { id: booking.id }).await?;
    assert_eq!(stored.status, BookingStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn missing_references_are_reported() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let owner = user(&db, "owner").await?;
    let washer = machine(&db, "W-02").await?;

    let report = db
        .create_booking(CreateBookingDto {
            machine_id: None,
            ..booking_request(&owner, &washer, datetime!(2024-01-01 10:00 UTC))
        })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidArgument);
    assert_eq!(detail_of(&report), "machineId is required");

    let ghost = uuid::Uuid::new_v4();
    let report = db
        .create_booking(CreateBookingDto {
            user_id: Some(ghost),
            ..booking_request(&owner, &washer, datetime!(2024-01-01 10:00 UTC))
        })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
    assert_eq!(detail_of(&report), format!("User not found with ID: {ghost}"));

    let report = db
        .approve_booking(ApproveBookingDto { id: ghost })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
    Ok(())
}

#[tokio::test]
async fn slots_are_compared_after_normalization() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let first = user(&db, "first").await?;
    let second = user(&db, "second").await?;
    let washer = machine(&db, "W-03").await?;

    db.create_booking(booking_request(&first, &washer, datetime!(2024-01-01 10:00:30 UTC)))
        .await?;
    let report = db
        .create_booking(booking_request(&second, &washer, datetime!(2024-01-01 17:00 +7)))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);

    let other = machine(&db, "W-04").await?;
    db.create_booking(booking_request(&second, &other, datetime!(2024-01-01 10:00 UTC)))
        .await?;
    Ok(())
}

#[tokio::test]
async fn timer_follows_status() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let owner = user(&db, "owner").await?;
    let washer = machine(&db, "W-06").await?;
    let booking = db
        .create_booking(booking_request(&owner, &washer, datetime!(2024-01-01 10:00 UTC)))
        .await?;

    let timer = db
        .get_booking_timer(GetBookingTimerDto { id: booking.id })
        .await?;
    assert_eq!(timer.status, BookingStatus::Pending);
    assert!((895..=900).contains(&timer.remaining_seconds));

    db.approve_booking(ApproveBookingDto { id: booking.id })
        .await?;
    let timer = db
        .get_booking_timer(GetBookingTimerDto { id: booking.id })
        .await?;
    assert_eq!(timer.status, BookingStatus::InProgress);
    assert!((3595..=3600).contains(&timer.remaining_seconds));

    db.complete_booking(CompleteBookingDto { id: booking.id })
        .await?;
    let timer = db
        .get_booking_timer(GetBookingTimerDto { id: booking.id })
        .await?;
    assert_eq!(timer.remaining_seconds, 0);
    Ok(())
}
