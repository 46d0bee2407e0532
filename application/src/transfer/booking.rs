use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{Booking, BookingStatus, DestructBooking};

use crate::transfer::{MachineDto, UserDto};

#[derive(Debug, Clone, PartialEq)]
pub struct BookingDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub machine_id: Uuid,
    pub booking_date: OffsetDateTime,
    pub slot: String,
    pub status: BookingStatus,
    pub amount: f64,
    pub service: Option<String>,
    pub rating: Option<i16>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Booking> for BookingDto {
    fn from(value: Booking) -> Self {
        let DestructBooking {
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
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            machine_id: machine_id.into(),
            slot: booking_date.slot_label(),
            booking_date: *booking_date.as_ref(),
            status,
            amount: amount.into(),
            service: service.map(String::from),
            rating: rating.map(i16::from),
            created_at: *created_at.as_ref(),
            updated_at: *updated_at.as_ref(),
        }
    }
}

/// Every field is optional so that a missing one is reported by name.
#[derive(Debug, Default)]
pub struct CreateBookingDto {
    pub user_id: Option<Uuid>,
    pub machine_id: Option<Uuid>,
    pub booking_date: Option<OffsetDateTime>,
    pub amount: Option<f64>,
    pub service: Option<String>,
}

#[derive(Debug)]
pub struct GetBookingDto {
    pub id: Uuid,
}

#[derive(Debug, Default)]
pub struct FindBookingsDto {
    pub machine_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug)]
pub struct GetUserBookingsDto {
    pub user_id: Uuid,
}

#[derive(Debug)]
pub struct ApproveBookingDto {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalDto {
    pub id: Uuid,
    pub status: BookingStatus,
    pub message: String,
}

#[derive(Debug)]
pub struct CompleteBookingDto {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionDto {
    pub booking: BookingDto,
    pub user: UserDto,
    pub machine: MachineDto,
}

#[derive(Debug)]
pub struct CancelBookingDto {
    pub id: Uuid,
}

#[derive(Debug, Default)]
pub struct UpdateBookingDto {
    pub id: Uuid,
    pub booking_date: Option<OffsetDateTime>,
    pub amount: Option<f64>,
    pub service: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug)]
pub struct DeleteBookingDto {
    pub id: Uuid,
}

#[derive(Debug)]
pub struct GetBookingTimerDto {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingTimerDto {
    pub id: Uuid,
    pub status: BookingStatus,
    pub remaining_seconds: i64,
}

#[derive(Debug, Default)]
pub struct RateBookingDto {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub score: Option<i16>,
}
