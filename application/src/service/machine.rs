use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookingQuery, DependOnBookingQuery, DependOnMachineQuery, MachineQuery,
};
use kernel::interface::update::{DependOnMachineModifier, MachineModifier};
use kernel::prelude::entity::{
    LedgerError, Machine, MachineId, MachineKind, MachineLocation, MachineNumber, MachineState,
    MachineStatus,
};
use kernel::KernelError;

use crate::service::{not_found, required, required_text};
use crate::transfer::{
    CreateMachineDto, DeleteMachineDto, GetMachineDto, MachineDto, UpdateMachineStatusDto,
};

#[async_trait::async_trait]
pub trait GetMachineService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnMachineQuery
{
    async fn get_machine(&self, dto: GetMachineDto) -> error_stack::Result<MachineDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let machine = self
            .machine_query()
            .find_by_id(&mut con, &MachineId::new(dto.id))
            .await?
            .ok_or_else(|| not_found("Machine", dto.id))?;
        Ok(machine.into())
    }

    async fn get_all_machines(&self) -> error_stack::Result<Vec<MachineDto>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let machines = self.machine_query().find_all(&mut con).await?;
        Ok(machines.into_iter().map(MachineDto::from).collect())
    }
}

impl<T> GetMachineService for T where T: DependOnDatabaseConnection + DependOnMachineQuery {}

#[async_trait::async_trait]
pub trait CreateMachineService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnMachineQuery + DependOnMachineModifier
{
    async fn create_machine(
        &self,
        dto: CreateMachineDto,
    ) -> error_stack::Result<MachineDto, KernelError> {
        let number = MachineNumber::new(required_text(dto.number, "machineNumber")?);
        let kind = optional_text(dto.kind).map(MachineKind::new);
        let location = optional_text(dto.location).map(MachineLocation::new);

        let mut con = self.database_connection().transact().await?;
        let duplicated = self
            .machine_query()
            .find_by_number(&mut con, &number)
            .await?
            .is_some();
        if duplicated {
            return Err(KernelError::Conflict.with_detail("Machine number already exists"));
        }

        let machine = Machine::new(
            MachineId::new(Uuid::new_v4()),
            number,
            kind,
            location,
            MachineState::Available,
        );
        self.machine_modifier().create(&mut con, &machine).await?;
        con.commit().await?;

        tracing::info!(
            machine_id = %machine.id().as_ref(),
            number = %machine.number().as_ref(),
            "Machine registered"
        );
        Ok(machine.into())
    }
}

impl<T> CreateMachineService for T where
    T: DependOnDatabaseConnection + DependOnMachineQuery + DependOnMachineModifier
{
}

#[async_trait::async_trait]
pub trait UpdateMachineStatusService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnMachineQuery + DependOnMachineModifier
{
    /// Manager override. Leaving IN_USE this way drops the occupancy without
    /// touching the booking that held it.
    async fn update_machine_status(
        &self,
        dto: UpdateMachineStatusDto,
    ) -> error_stack::Result<MachineDto, KernelError> {
        let status = required(dto.status, "status")?.parse::<MachineStatus>()?;

        let mut con = self.database_connection().transact().await?;
        let mut machine = self
            .machine_query()
            .find_by_id_for_update(&mut con, &MachineId::new(dto.id))
            .await?
            .ok_or_else(|| not_found("Machine", dto.id))?;

        let dropped = machine
            .occupancy()
            .map(|occupancy| *occupancy.booking_id().as_ref());
        machine
            .set_status(status)
            .map_err(LedgerError::into_report)?;
        self.machine_modifier().update(&mut con, &machine).await?;
        con.commit().await?;

        if let Some(booking_id) = dropped {
            tracing::warn!(
                machine_id = %dto.id,
                %booking_id,
                %status,
                "Machine status overridden while occupied"
            );
        } else {
            tracing::info!(machine_id = %dto.id, %status, "Machine status updated");
        }
        Ok(machine.into())
    }
}

impl<T> UpdateMachineStatusService for T where
    T: DependOnDatabaseConnection + DependOnMachineQuery + DependOnMachineModifier
{
}

#[async_trait::async_trait]
pub trait DeleteMachineService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnMachineQuery
    + DependOnMachineModifier
    + DependOnBookingQuery
{
    /// Removes a machine and its booking history. Refused while any booking on it
    /// is still pending or in progress.
    async fn delete_machine(&self, dto: DeleteMachineDto) -> error_stack::Result<(), KernelError> {
        let id = MachineId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        self.machine_query()
            .find_by_id_for_update(&mut con, &id)
            .await?
            .ok_or_else(|| not_found("Machine", dto.id))?;

        let active = self
            .booking_query()
            .find_by_machine_id(&mut con, &id)
            .await?
            .iter()
            .filter(|booking| booking.status().is_active())
            .count();
        if active > 0 {
            con.roll_back().await?;
            return Err(KernelError::InvalidState.with_detail(format!(
                "Machine still has {active} active booking(s)"
            )));
        }

        self.machine_modifier().delete(&mut con, &id).await?;
        con.commit().await?;

        tracing::info!(machine_id = %dto.id, "Machine deleted");
        Ok(())
    }
}

impl<T> DeleteMachineService for T where
    T: DependOnDatabaseConnection
        + DependOnMachineQuery
        + DependOnMachineModifier
        + DependOnBookingQuery
{
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
