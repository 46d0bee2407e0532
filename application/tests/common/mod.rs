#![allow(dead_code)]

use time::OffsetDateTime;

use application::service::{CreateMachineService, CreateUserService};
use application::transfer::{CreateBookingDto, CreateMachineDto, CreateUserDto, MachineDto, UserDto};
use driver::database::MemoryDatabase;
use kernel::{FindDetail, KernelError};

pub async fn user(db: &MemoryDatabase, name: &str) -> error_stack::Result<UserDto, KernelError> {
    db.create_user(CreateUserDto {
        name: Some(name.to_string()),
        role: None,
    })
    .await
}

pub async fn machine(
    db: &MemoryDatabase,
    number: &str,
) -> error_stack::Result<MachineDto, KernelError> {
    db.create_machine(CreateMachineDto {
        number: Some(number.to_string()),
        kind: Some("Washer".to_string()),
        location: Some("Dorm A".to_string()),
    })
    .await
}

pub fn booking_request(user: &UserDto, machine: &MachineDto, slot: OffsetDateTime) -> CreateBookingDto {
    CreateBookingDto {
        user_id: Some(user.id),
        machine_id: Some(machine.id),
        booking_date: Some(slot),
        amount: Some(20.0),
        service: Some("Wash & Dry".to_string()),
    }
}

pub fn detail_of(report: &error_stack::Report<KernelError>) -> String {
    report
        .detail()
        .map(|detail| detail.to_string())
        .unwrap_or_default()
}
