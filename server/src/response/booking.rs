use crate::controller::Exhaust;
use crate::response::{MachineResponse, UserResponse};
use application::transfer::{ApprovalDto, BookingDto, BookingTimerDto, CompletionDto};
use axum::http::StatusCode;
use axum::Json;
use kernel::prelude::entity::BookingStatus;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    id: Uuid,
    user_id: Uuid,
    machine_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    booking_date: OffsetDateTime,
    slot: String,
    status: BookingStatus,
    status_display_name: &'static str,
    amount: f64,
    service: Option<String>,
    rating: Option<i16>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<BookingDto> for BookingResponse {
    fn from(value: BookingDto) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            machine_id: value.machine_id,
            booking_date: value.booking_date,
            slot: value.slot,
            status: value.status,
            status_display_name: value.status.display_name(),
            amount: value.amount,
            service: value.service,
            rating: value.rating,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    id: Uuid,
    status: BookingStatus,
    message: String,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    #[serde(flatten)]
    booking: BookingResponse,
    user: UserResponse,
    machine: MachineResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingTimerResponse {
    id: Uuid,
    status: BookingStatus,
    remaining_seconds: i64,
}

pub struct BookingPresenter;

impl Exhaust<BookingDto> for BookingPresenter {
    type To = Json<BookingResponse>;
    fn emit(&self, input: BookingDto) -> Self::To {
        Json(input.into())
    }
}

impl Exhaust<Vec<BookingDto>> for BookingPresenter {
    type To = Json<Vec<BookingResponse>>;
    fn emit(&self, input: Vec<BookingDto>) -> Self::To {
        Json(input.into_iter().map(BookingResponse::from).collect())
    }
}

impl Exhaust<Option<BookingDto>> for BookingPresenter {
    type To = Json<Option<BookingResponse>>;
    fn emit(&self, input: Option<BookingDto>) -> Self::To {
        Json(input.map(BookingResponse::from))
    }
}

impl Exhaust<ApprovalDto> for BookingPresenter {
    type To = Json<ApprovalResponse>;
    fn emit(&self, input: ApprovalDto) -> Self::To {
        Json(ApprovalResponse {
            id: input.id,
            status: input.status,
            message: input.message,
        })
    }
}

impl Exhaust<CompletionDto> for BookingPresenter {
    type To = Json<CompletionResponse>;
    fn emit(&self, input: CompletionDto) -> Self::To {
        Json(CompletionResponse {
            booking: input.booking.into(),
            user: input.user.into(),
            machine: input.machine.into(),
        })
    }
}

impl Exhaust<BookingTimerDto> for BookingPresenter {
    type To = Json<BookingTimerResponse>;
    fn emit(&self, input: BookingTimerDto) -> Self::To {
        Json(BookingTimerResponse {
            id: input.id,
            status: input.status,
            remaining_seconds: input.remaining_seconds,
        })
    }
}

impl Exhaust<()> for BookingPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}
