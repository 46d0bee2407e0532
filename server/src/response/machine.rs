use crate::controller::Exhaust;
use application::transfer::MachineDto;
use axum::http::StatusCode;
use axum::Json;
use kernel::prelude::entity::MachineStatus;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineResponse {
    id: Uuid,
    machine_number: String,
    #[serde(rename = "type")]
    machine_type: Option<String>,
    location: Option<String>,
    status: MachineStatus,
    current_user_id: Option<Uuid>,
    current_booking_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339::option")]
    usage_start_time: Option<OffsetDateTime>,
}

impl From<MachineDto> for MachineResponse {
    fn from(value: MachineDto) -> Self {
        Self {
            id: value.id,
            machine_number: value.number,
            machine_type: value.kind,
            location: value.location,
            status: value.status,
            current_user_id: value.current_user_id,
            current_booking_id: value.current_booking_id,
            usage_start_time: value.usage_start_time,
        }
    }
}

pub struct MachinePresenter;

impl Exhaust<MachineDto> for MachinePresenter {
    type To = Json<MachineResponse>;
    fn emit(&self, input: MachineDto) -> Self::To {
        Json(input.into())
    }
}

impl Exhaust<Vec<MachineDto>> for MachinePresenter {
    type To = Json<Vec<MachineResponse>>;
    fn emit(&self, input: Vec<MachineDto>) -> Self::To {
        Json(input.into_iter().map(MachineResponse::from).collect())
    }
}

impl Exhaust<()> for MachinePresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}
