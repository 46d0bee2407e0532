use time::macros::datetime;

use application::service::{
    CancelBookingService, CreateBookingService, CreateMachineService, DeleteMachineService,
    GetBookingService, GetMachineService, UpdateMachineStatusService,
};
use application::transfer::{
    CancelBookingDto, CreateMachineDto, DeleteMachineDto, GetBookingDto, GetMachineDto,
    UpdateMachineStatusDto,
};
use driver::database::MemoryDatabase;
use kernel::prelude::entity::MachineStatus;
use kernel::KernelError;

mod common;

use common::{booking_request, detail_of, machine, user};

#[tokio::test]
async fn machine_numbers_are_unique() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let washer = machine(&db, "W-01").await?;
    assert_eq!(washer.status, MachineStatus::Available);
    assert_eq!(washer.kind.as_deref(), Some("Washer"));

    let report = machine(&db, "W-01").await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
    assert_eq!(detail_of(&report), "Machine number already exists");

    let report = db
        .create_machine(CreateMachineDto {
            number: Some("  ".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidArgument);

    machine(&db, "D-01").await?;
    let numbers = db
        .get_all_machines()
        .await?
        .into_iter()
        .map(|machine| machine.number)
        .collect::<Vec<_>>();
    assert_eq!(numbers, vec!["D-01".to_string(), "W-01".to_string()]);
    Ok(())
}

#[tokio::test]
async fn status_cannot_be_set_in_use_directly() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let washer = machine(&db, "W-01").await?;

    let report = db
        .update_machine_status(UpdateMachineStatusDto {
            id: washer.id,
            status: Some("IN_USE".to_string()),
        })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidArgument);

    let report = db
        .update_machine_status(UpdateMachineStatusDto {
            id: washer.id,
            status: None,
        })
        .await
        .unwrap_err();
    assert_eq!(detail_of(&report), "status is required");

    let updated = db
        .update_machine_status(UpdateMachineStatusDto {
            id: washer.id,
            status: Some("maintenance".to_string()),
        })
        .await?;
    assert_eq!(updated.status, MachineStatus::Maintenance);
    Ok(())
}

#[tokio::test]
async fn delete_waits_for_active_bookings() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let owner = user(&db, "owner").await?;
    let washer = machine(&db, "W-01").await?;
    let booking = db
        .create_booking(booking_request(&owner, &washer, datetime!(2024-01-01 10:00 UTC)))
        .await?;

    let report = db
        .delete_machine(DeleteMachineDto { id: washer.id })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::InvalidState);

    db.cancel_booking(CancelBookingDto { id: booking.id }).await?;
    db.delete_machine(DeleteMachineDto { id: washer.id }).await?;

    let report = db
        .get_machine(GetMachineDto { id: washer.id })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
    let report = db
        .get_booking(GetBookingDto { id: booking.id })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
    Ok(())
}
