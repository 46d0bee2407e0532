use error_stack::ResultExt;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BookingQuery;
use kernel::interface::update::BookingModifier;
use kernel::prelude::entity::{
    Booking, BookingAmount, BookingDate, BookingId, BookingRating, BookingStatus, CreatedAt,
    MachineId, ServiceName, UpdatedAt, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookingRepository;

#[async_trait::async_trait]
impl BookingQuery for PostgresBookingRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        PgBookingInternal::find_by_id(con, id, false).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        PgBookingInternal::find_by_id(con, id, true).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        PgBookingInternal::find_all(con).await
    }

    async fn find_by_machine_id(
        &self,
        con: &mut PostgresTransaction,
        machine_id: &MachineId,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        PgBookingInternal::find_by_machine_id(con, machine_id).await
    }

    async fn find_by_user_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        PgBookingInternal::find_by_user_id(con, user_id).await
    }

    async fn find_by_status(
        &self,
        con: &mut PostgresTransaction,
        status: &BookingStatus,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        PgBookingInternal::find_by_status(con, status).await
    }

    async fn has_conflict(
        &self,
        con: &mut PostgresTransaction,
        machine_id: &MachineId,
        booking_date: &BookingDate,
        excluding: Option<&BookingId>,
    ) -> error_stack::Result<bool, KernelError> {
        PgBookingInternal::has_conflict(con, machine_id, booking_date, excluding).await
    }
}

#[async_trait::async_trait]
impl BookingModifier for PostgresBookingRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::create(con, booking).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::update(con, booking).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        booking_id: &BookingId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookingInternal::delete(con, booking_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    machine_id: Uuid,
    booking_date: OffsetDateTime,
    status: String,
    amount: f64,
    service: Option<String>,
    rating: Option<i16>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<BookingRow> for Booking {
    type Error = error_stack::Report<KernelError>;
    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let status = value
            .status
            .parse::<BookingStatus>()
            .change_context(KernelError::Internal)
            .attach_printable_lazy(|| format!("Invalid status stored for booking {}", value.id))?;
        Ok(Booking::new(
            BookingId::new(value.id),
            UserId::new(value.user_id),
            MachineId::new(value.machine_id),
            BookingDate::new(value.booking_date)
                .attach_printable_lazy(|| format!("Invalid slot stored for booking {}", value.id))?,
            status,
            BookingAmount::new(value.amount),
            value.service.map(ServiceName::new),
            value.rating.map(BookingRating::new),
            CreatedAt::new(value.created_at),
            UpdatedAt::new(value.updated_at),
        ))
    }
}

fn collect(rows: Vec<BookingRow>) -> error_stack::Result<Vec<Booking>, KernelError> {
    rows.into_iter().map(Booking::try_from).collect()
}

pub(in crate::database) struct PgBookingInternal;

impl PgBookingInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookingId,
        lock: bool,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        let sql = if lock {
            // language=postgresql
            r#"
            SELECT id, user_id, machine_id, booking_date, status, amount, service, rating, created_at, updated_at
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT id, user_id, machine_id, booking_date, status, amount, service, rating, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#
        };
        let row = sqlx::query_as::<_, BookingRow>(sql)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        row.map(Booking::try_from).transpose()
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Booking>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, machine_id, booking_date, status, amount, service, rating, created_at, updated_at
            FROM bookings
            ORDER BY booking_date, created_at
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn find_by_machine_id(
        con: &mut PgConnection,
        machine_id: &MachineId,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, machine_id, booking_date, status, amount, service, rating, created_at, updated_at
            FROM bookings
            WHERE machine_id = $1
            ORDER BY booking_date, created_at
            "#,
        )
        .bind(machine_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, machine_id, booking_date, status, amount, service, rating, created_at, updated_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY booking_date, created_at
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn find_by_status(
        con: &mut PgConnection,
        status: &BookingStatus,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, machine_id, booking_date, status, amount, service, rating, created_at, updated_at
            FROM bookings
            WHERE status = $1
            ORDER BY booking_date, created_at
            "#,
        )
        .bind(status.as_str())
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn has_conflict(
        con: &mut PgConnection,
        machine_id: &MachineId,
        booking_date: &BookingDate,
        excluding: Option<&BookingId>,
    ) -> error_stack::Result<bool, KernelError> {
        let excluding = excluding.map(|id| *id.as_ref());
        let taken = sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM bookings
                WHERE machine_id = $1
                  AND booking_date = $2
                  AND status IN ('PENDING', 'IN_PROGRESS')
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(machine_id.as_ref())
        .bind(booking_date.as_ref())
        .bind(excluding)
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(taken)
    }

    async fn create(con: &mut PgConnection, booking: &Booking) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, machine_id, booking_date, status, amount, service, rating, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(booking.id().as_ref())
        .bind(booking.user_id().as_ref())
        .bind(booking.machine_id().as_ref())
        .bind(booking.booking_date().as_ref())
        .bind(booking.status().as_str())
        .bind(booking.amount().as_ref())
        .bind(booking.service().clone().map(String::from))
        .bind(booking.rating().map(i16::from))
        .bind(booking.created_at().as_ref())
        .bind(booking.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, booking: &Booking) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE bookings
            SET booking_date = $2, status = $3, amount = $4, service = $5, rating = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(booking.id().as_ref())
        .bind(booking.booking_date().as_ref())
        .bind(booking.status().as_str())
        .bind(booking.amount().as_ref())
        .bind(booking.service().clone().map(String::from))
        .bind(booking.rating().map(i16::from))
        .bind(booking.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, booking_id: &BookingId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(booking_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
