use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructMachine, DestructOccupancy, Machine, MachineStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineDto {
    pub id: Uuid,
    pub number: String,
    pub kind: Option<String>,
    pub location: Option<String>,
    pub status: MachineStatus,
    pub current_user_id: Option<Uuid>,
    pub current_booking_id: Option<Uuid>,
    pub usage_start_time: Option<OffsetDateTime>,
}

impl From<Machine> for MachineDto {
    fn from(value: Machine) -> Self {
        let status = value.status();
        let occupancy = value.occupancy().cloned().map(|occupancy| occupancy.into_destruct());
        let DestructMachine {
            id,
            number,
            kind,
            location,
            ..
        } = value.into_destruct();
        let (current_user_id, current_booking_id, usage_start_time) = match occupancy {
            Some(DestructOccupancy {
                user_id,
                booking_id,
                started_at,
            }) => (
                Some(user_id.into()),
                Some(booking_id.into()),
                Some(started_at),
            ),
            None => (None, None, None),
        };
        Self {
            id: id.into(),
            number: number.into(),
            kind: kind.map(String::from),
            location: location.map(String::from),
            status,
            current_user_id,
            current_booking_id,
            usage_start_time,
        }
    }
}

#[derive(Debug, Default)]
pub struct CreateMachineDto {
    pub number: Option<String>,
    pub kind: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug)]
pub struct GetMachineDto {
    pub id: Uuid,
}

#[derive(Debug)]
pub struct UpdateMachineStatusDto {
    pub id: Uuid,
    pub status: Option<String>,
}

#[derive(Debug)]
pub struct DeleteMachineDto {
    pub id: Uuid,
}
