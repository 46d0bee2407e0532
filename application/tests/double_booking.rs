use time::macros::datetime;

use application::service::{CreateBookingService, GetBookingService};
use application::transfer::{FindBookingsDto, UserDto};
use driver::database::MemoryDatabase;
use kernel::KernelError;

mod common;

use common::{booking_request, machine, user};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_for_one_slot_admit_one() -> error_stack::Result<(), KernelError> {
    let db = MemoryDatabase::new();
    let washer = machine(&db, "W-05").await?;
    let mut users: Vec<UserDto> = Vec::new();
    for index in 0..8 {
        users.push(user(&db, &format!("student-{index}")).await?);
    }
    let slot = datetime!(2024-01-01 10:00 UTC);

    let tasks = users
        .iter()
        .map(|user| {
            let db = db.clone();
            let request = booking_request(user, &washer, slot);
            tokio::spawn(async move { db.create_booking(request).await })
        })
        .collect::<Vec<_>>();

    let mut admitted = 0;
    for task in tasks {
        match task.await.expect("booking task panicked") {
            Ok(_) => admitted += 1,
            Err(report) => assert_eq!(report.current_context(), &KernelError::Conflict),
        }
    }
    assert_eq!(admitted, 1);

    let stored = db
        .find_bookings(FindBookingsDto {
            machine_id: Some(washer.id),
            ..Default::default()
        })
        .await?;
    assert_eq!(stored.len(), 1);
    Ok(())
}
