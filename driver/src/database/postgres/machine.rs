use error_stack::{Report, ResultExt};
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::MachineQuery;
use kernel::interface::update::MachineModifier;
use kernel::prelude::entity::{
    BookingId, Machine, MachineId, MachineKind, MachineLocation, MachineNumber, MachineState,
    MachineStatus, Occupancy, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresMachineRepository;

#[async_trait::async_trait]
impl MachineQuery for PostgresMachineRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &MachineId,
    ) -> error_stack::Result<Option<Machine>, KernelError> {
        PgMachineInternal::find_by_id(con, id, false).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &MachineId,
    ) -> error_stack::Result<Option<Machine>, KernelError> {
        PgMachineInternal::find_by_id(con, id, true).await
    }

    async fn find_by_number(
        &self,
        con: &mut PostgresTransaction,
        number: &MachineNumber,
    ) -> error_stack::Result<Option<Machine>, KernelError> {
        PgMachineInternal::find_by_number(con, number).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Machine>, KernelError> {
        PgMachineInternal::find_all(con).await
    }
}

#[async_trait::async_trait]
impl MachineModifier for PostgresMachineRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        machine: &Machine,
    ) -> error_stack::Result<(), KernelError> {
        PgMachineInternal::create(con, machine).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        machine: &Machine,
    ) -> error_stack::Result<(), KernelError> {
        PgMachineInternal::update(con, machine).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        machine_id: &MachineId,
    ) -> error_stack::Result<(), KernelError> {
        PgMachineInternal::delete(con, machine_id).await
    }
}

#[derive(sqlx::FromRow)]
struct MachineRow {
    id: Uuid,
    machine_number: String,
    machine_type: Option<String>,
    location: Option<String>,
    status: String,
    current_user_id: Option<Uuid>,
    current_booking_id: Option<Uuid>,
    usage_start_time: Option<OffsetDateTime>,
}

impl TryFrom<MachineRow> for Machine {
    type Error = Report<KernelError>;
    fn try_from(value: MachineRow) -> Result<Self, Self::Error> {
        let status = value
            .status
            .parse::<MachineStatus>()
            .change_context(KernelError::Internal)
            .attach_printable_lazy(|| format!("Invalid status stored for machine {}", value.id))?;
        let occupancy = match (
            value.current_user_id,
            value.current_booking_id,
            value.usage_start_time,
        ) {
            (Some(user_id), Some(booking_id), Some(started_at)) => Some(Occupancy::new(
                UserId::new(user_id),
                BookingId::new(booking_id),
                started_at,
            )),
            (None, None, None) => None,
            _ => {
                return Err(Report::new(KernelError::Internal).attach_printable(format!(
                    "Partial occupancy stored for machine {}",
                    value.id
                )))
            }
        };
        Ok(Machine::new(
            MachineId::new(value.id),
            MachineNumber::new(value.machine_number),
            value.machine_type.map(MachineKind::new),
            value.location.map(MachineLocation::new),
            MachineState::restore(status, occupancy)?,
        ))
    }
}

pub(in crate::database) struct PgMachineInternal;

impl PgMachineInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &MachineId,
        lock: bool,
    ) -> error_stack::Result<Option<Machine>, KernelError> {
        let sql = if lock {
            // language=postgresql
            r#"
            SELECT id, machine_number, machine_type, location, status, current_user_id, current_booking_id, usage_start_time
            FROM machines
            WHERE id = $1
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT id, machine_number, machine_type, location, status, current_user_id, current_booking_id, usage_start_time
            FROM machines
            WHERE id = $1
            "#
        };
        let row = sqlx::query_as::<_, MachineRow>(sql)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        row.map(Machine::try_from).transpose()
    }

    async fn find_by_number(
        con: &mut PgConnection,
        number: &MachineNumber,
    ) -> error_stack::Result<Option<Machine>, KernelError> {
        let row = sqlx::query_as::<_, MachineRow>(
            // language=postgresql
            r#"
            SELECT id, machine_number, machine_type, location, status, current_user_id, current_booking_id, usage_start_time
            FROM machines
            WHERE machine_number = $1
            "#,
        )
        .bind(number.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Machine::try_from).transpose()
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Machine>, KernelError> {
        let rows = sqlx::query_as::<_, MachineRow>(
            // language=postgresql
            r#"
            SELECT id, machine_number, machine_type, location, status, current_user_id, current_booking_id, usage_start_time
            FROM machines
            ORDER BY machine_number
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Machine::try_from).collect()
    }

    async fn create(con: &mut PgConnection, machine: &Machine) -> error_stack::Result<(), KernelError> {
        let (user_id, booking_id, started_at) = occupancy_columns(machine);
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO machines (id, machine_number, machine_type, location, status, current_user_id, current_booking_id, usage_start_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(machine.id().as_ref())
        .bind(machine.number().as_ref())
        .bind(machine.kind().clone().map(String::from))
        .bind(machine.location().clone().map(String::from))
        .bind(machine.status().as_str())
        .bind(user_id)
        .bind(booking_id)
        .bind(started_at)
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, machine: &Machine) -> error_stack::Result<(), KernelError> {
        let (user_id, booking_id, started_at) = occupancy_columns(machine);
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE machines
            SET machine_number = $2, machine_type = $3, location = $4, status = $5,
                current_user_id = $6, current_booking_id = $7, usage_start_time = $8
            WHERE id = $1
            "#,
        )
        .bind(machine.id().as_ref())
        .bind(machine.number().as_ref())
        .bind(machine.kind().clone().map(String::from))
        .bind(machine.location().clone().map(String::from))
        .bind(machine.status().as_str())
        .bind(user_id)
        .bind(booking_id)
        .bind(started_at)
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, machine_id: &MachineId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM machines
            WHERE id = $1
            "#,
        )
        .bind(machine_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

fn occupancy_columns(machine: &Machine) -> (Option<Uuid>, Option<Uuid>, Option<OffsetDateTime>) {
    match machine.occupancy() {
        Some(occupancy) => (
            Some(*occupancy.user_id().as_ref()),
            Some(*occupancy.booking_id().as_ref()),
            Some(*occupancy.started_at()),
        ),
        None => (None, None, None),
    }
}
