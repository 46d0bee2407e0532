use crate::controller::Intake;
use application::transfer::{
    ApproveBookingDto, CancelBookingDto, CompleteBookingDto, CreateBookingDto, DeleteBookingDto,
    FindBookingsDto, GetBookingDto, GetBookingTimerDto, GetUserBookingsDto, RateBookingDto,
    UpdateBookingDto,
};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    user_id: Option<Uuid>,
    machine_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    booking_date: Option<OffsetDateTime>,
    amount: Option<f64>,
    service: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindBookingsRequest {
    machine_id: Option<Uuid>,
    user_id: Option<Uuid>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[serde(default, with = "time::serde::rfc3339::option")]
    booking_date: Option<OffsetDateTime>,
    amount: Option<f64>,
    service: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBookingRequest {
    user_id: Option<Uuid>,
    rating: Option<i16>,
}

#[derive(Debug)]
pub struct GetBookingRequest {
    id: Uuid,
}

impl GetBookingRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct ApproveBookingRequest {
    id: Uuid,
}

impl ApproveBookingRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct CompleteBookingRequest {
    id: Uuid,
}

impl CompleteBookingRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct CancelBookingRequest {
    id: Uuid,
}

impl CancelBookingRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookingRequest {
    id: Uuid,
}

impl DeleteBookingRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetBookingTimerRequest {
    id: Uuid,
}

impl GetBookingTimerRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct UserBookingsRequest {
    user_id: Uuid,
}

impl UserBookingsRequest {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

pub struct BookingTransformer;

impl Intake<CreateBookingRequest> for BookingTransformer {
    type To = CreateBookingDto;
    fn emit(&self, input: CreateBookingRequest) -> Self::To {
        CreateBookingDto {
            user_id: input.user_id,
            machine_id: input.machine_id,
            booking_date: input.booking_date,
            amount: input.amount,
            service: input.service,
        }
    }
}

impl Intake<FindBookingsRequest> for BookingTransformer {
    type To = FindBookingsDto;
    fn emit(&self, input: FindBookingsRequest) -> Self::To {
        FindBookingsDto {
            machine_id: input.machine_id,
            user_id: input.user_id,
            status: input.status.filter(|status| !status.trim().is_empty()),
        }
    }
}

impl Intake<(Uuid, UpdateBookingRequest)> for BookingTransformer {
    type To = UpdateBookingDto;
    fn emit(&self, (id, req): (Uuid, UpdateBookingRequest)) -> Self::To {
        UpdateBookingDto {
            id,
            booking_date: req.booking_date,
            amount: req.amount,
            service: req.service,
            status: req.status,
        }
    }
}

impl Intake<(Uuid, RateBookingRequest)> for BookingTransformer {
    type To = RateBookingDto;
    fn emit(&self, (id, req): (Uuid, RateBookingRequest)) -> Self::To {
        RateBookingDto {
            id,
            user_id: req.user_id,
            score: req.rating,
        }
    }
}

impl Intake<UserBookingsRequest> for BookingTransformer {
    type To = GetUserBookingsDto;
    fn emit(&self, input: UserBookingsRequest) -> Self::To {
        GetUserBookingsDto {
            user_id: input.user_id,
        }
    }
}

impl Intake<GetBookingRequest> for BookingTransformer {
    type To = GetBookingDto;
    fn emit(&self, input: GetBookingRequest) -> Self::To {
        GetBookingDto { id: input.id }
    }
}

impl Intake<ApproveBookingRequest> for BookingTransformer {
    type To = ApproveBookingDto;
    fn emit(&self, input: ApproveBookingRequest) -> Self::To {
        ApproveBookingDto { id: input.id }
    }
}

impl Intake<CompleteBookingRequest> for BookingTransformer {
    type To = CompleteBookingDto;
    fn emit(&self, input: CompleteBookingRequest) -> Self::To {
        CompleteBookingDto { id: input.id }
    }
}

impl Intake<CancelBookingRequest> for BookingTransformer {
    type To = CancelBookingDto;
    fn emit(&self, input: CancelBookingRequest) -> Self::To {
        CancelBookingDto { id: input.id }
    }
}

impl Intake<DeleteBookingRequest> for BookingTransformer {
    type To = DeleteBookingDto;
    fn emit(&self, input: DeleteBookingRequest) -> Self::To {
        DeleteBookingDto { id: input.id }
    }
}

impl Intake<GetBookingTimerRequest> for BookingTransformer {
    type To = GetBookingTimerDto;
    fn emit(&self, input: GetBookingTimerRequest) -> Self::To {
        GetBookingTimerDto { id: input.id }
    }
}
