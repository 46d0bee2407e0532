use crate::controller::Intake;
use application::transfer::{
    CreateMachineDto, DeleteMachineDto, GetMachineDto, UpdateMachineStatusDto,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMachineRequest {
    machine_number: Option<String>,
    #[serde(alias = "type")]
    machine_type: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMachineStatusRequest {
    status: Option<String>,
}

#[derive(Debug)]
pub struct GetMachineRequest {
    id: Uuid,
}

impl GetMachineRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteMachineRequest {
    id: Uuid,
}

impl DeleteMachineRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct MachineTransformer;

impl Intake<CreateMachineRequest> for MachineTransformer {
    type To = CreateMachineDto;
    fn emit(&self, input: CreateMachineRequest) -> Self::To {
        CreateMachineDto {
            number: input.machine_number,
            kind: input.machine_type,
            location: input.location,
        }
    }
}

impl Intake<(Uuid, UpdateMachineStatusRequest)> for MachineTransformer {
    type To = UpdateMachineStatusDto;
    fn emit(&self, (id, req): (Uuid, UpdateMachineStatusRequest)) -> Self::To {
        UpdateMachineStatusDto {
            id,
            status: req.status,
        }
    }
}

impl Intake<GetMachineRequest> for MachineTransformer {
    type To = GetMachineDto;
    fn emit(&self, input: GetMachineRequest) -> Self::To {
        GetMachineDto { id: input.id }
    }
}

impl Intake<DeleteMachineRequest> for MachineTransformer {
    type To = DeleteMachineDto;
    fn emit(&self, input: DeleteMachineRequest) -> Self::To {
        DeleteMachineDto { id: input.id }
    }
}
