use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookingQuery, DependOnBookingQuery, DependOnMachineQuery, DependOnUserQuery, MachineQuery,
    UserQuery,
};
use kernel::interface::update::{
    BookingModifier, DependOnBookingModifier, DependOnMachineModifier, MachineModifier,
};
use kernel::prelude::entity::{
    remaining_seconds, Approval, Booking, BookingAmount, BookingDate, BookingId, BookingStatus,
    LedgerError, Machine, MachineId, ServiceName, TransitionError, UserId,
};
use kernel::KernelError;

use crate::service::{not_found, required};
use crate::transfer::{
    ApprovalDto, ApproveBookingDto, BookingDto, BookingTimerDto, CancelBookingDto,
    CompleteBookingDto, CompletionDto, CreateBookingDto, DeleteBookingDto, FindBookingsDto,
    GetBookingDto, GetBookingTimerDto, GetUserBookingsDto, UpdateBookingDto,
};

const SLOT_TAKEN: &str = "This time slot for this machine is already taken";

#[async_trait::async_trait]
pub trait GetBookingService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookingQuery
{
    async fn get_booking(&self, dto: GetBookingDto) -> error_stack::Result<BookingDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let id = BookingId::new(dto.id);
        let booking = self
            .booking_query()
            .find_by_id(&mut con, &id)
            .await?
            .ok_or_else(|| not_found("Booking", dto.id))?;
        Ok(booking.into())
    }

    /// Filters combine; the most selective one present is pushed down to the store.
    async fn find_bookings(
        &self,
        dto: FindBookingsDto,
    ) -> error_stack::Result<Vec<BookingDto>, KernelError> {
        let status = dto
            .status
            .as_deref()
            .map(str::parse::<BookingStatus>)
            .transpose()?;
        let machine_id = dto.machine_id.map(MachineId::new);
        let user_id = dto.user_id.map(UserId::new);

        let mut con = self.database_connection().transact().await?;
        let query = self.booking_query();
        let bookings = match (&machine_id, &user_id, &status) {
            (Some(machine_id), _, _) => query.find_by_machine_id(&mut con, machine_id).await?,
            (None, Some(user_id), _) => query.find_by_user_id(&mut con, user_id).await?,
            (None, None, Some(status)) => query.find_by_status(&mut con, status).await?,
            (None, None, None) => query.find_all(&mut con).await?,
        };

        let found = bookings
            .into_iter()
            .filter(|booking| user_id.as_ref().map_or(true, |id| booking.user_id() == id))
            .filter(|booking| status.as_ref().map_or(true, |status| booking.status() == status))
            .map(BookingDto::from)
            .collect();
        Ok(found)
    }

    /// The PENDING or IN_PROGRESS booking of a user with the earliest slot.
    async fn get_active_booking(
        &self,
        dto: GetUserBookingsDto,
    ) -> error_stack::Result<Option<BookingDto>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let bookings = self
            .booking_query()
            .find_by_user_id(&mut con, &UserId::new(dto.user_id))
            .await?;
        Ok(bookings
            .into_iter()
            .find(|booking| booking.status().is_active())
            .map(BookingDto::from))
    }

    /// Completed bookings of a user, i.e. the ones the rating gate may accept.
    async fn get_completed_bookings(
        &self,
        dto: GetUserBookingsDto,
    ) -> error_stack::Result<Vec<BookingDto>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let bookings = self
            .booking_query()
            .find_by_user_id(&mut con, &UserId::new(dto.user_id))
            .await?;
        Ok(bookings
            .into_iter()
            .filter(|booking| booking.status() == &BookingStatus::Completed)
            .map(BookingDto::from)
            .collect())
    }
}

impl<T> GetBookingService for T where T: DependOnDatabaseConnection + DependOnBookingQuery {}

#[async_trait::async_trait]
pub trait GetBookingTimerService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookingQuery + DependOnMachineQuery
{
    async fn get_booking_timer(
        &self,
        dto: GetBookingTimerDto,
    ) -> error_stack::Result<BookingTimerDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let id = BookingId::new(dto.id);
        let booking = self
            .booking_query()
            .find_by_id(&mut con, &id)
            .await?
            .ok_or_else(|| not_found("Booking", dto.id))?;

        let usage_started_at = if booking.status() == &BookingStatus::InProgress {
            self.machine_query()
                .find_by_id(&mut con, booking.machine_id())
                .await?
                .and_then(|machine| {
                    machine
                        .occupancy()
                        .filter(|occupancy| occupancy.booking_id() == booking.id())
                        .map(|occupancy| *occupancy.started_at())
                })
        } else {
            None
        };

        let remaining = remaining_seconds(
            &booking,
            usage_started_at.as_ref(),
            OffsetDateTime::now_utc(),
        );
        Ok(BookingTimerDto {
            id: dto.id,
            status: *booking.status(),
            remaining_seconds: remaining,
        })
    }
}

impl<T> GetBookingTimerService for T where
    T: DependOnDatabaseConnection + DependOnBookingQuery + DependOnMachineQuery
{
}

#[async_trait::async_trait]
pub trait CreateBookingService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnUserQuery
    + DependOnMachineQuery
    + DependOnBookingQuery
    + DependOnBookingModifier
{
    /// Reserves a slot. The machine row stays locked from the conflict check until
    /// commit, so concurrent requests for one machine are checked one after another.
    async fn create_booking(
        &self,
        dto: CreateBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        let user_id = UserId::new(required(dto.user_id, "userId")?);
        let machine_id = MachineId::new(required(dto.machine_id, "machineId")?);
        let booking_date = BookingDate::new(required(dto.booking_date, "bookingDate")?)?;
        let amount = amount(dto.amount.unwrap_or_default())?;
        let service = service_name(dto.service);

        let mut con = self.database_connection().transact().await?;
        self.user_query()
            .find_by_id(&mut con, &user_id)
            .await?
            .ok_or_else(|| not_found("User", user_id.as_ref()))?;
        lock_machine(self, &mut con, &machine_id).await?;
        ensure_slot_free(self, &mut con, &machine_id, &booking_date, None).await?;

        let booking = Booking::create(
            BookingId::new(Uuid::new_v4()),
            user_id,
            machine_id,
            booking_date,
            amount,
            service,
            OffsetDateTime::now_utc(),
        );
        self.booking_modifier().create(&mut con, &booking).await?;
        con.commit().await?;

        tracing::info!(
            booking_id = %booking.id().as_ref(),
            machine_id = %booking.machine_id().as_ref(),
            slot = %booking.booking_date().slot_label(),
            "Booking created"
        );
        Ok(booking.into())
    }
}

impl<T> CreateBookingService for T where
    T: DependOnDatabaseConnection
        + DependOnUserQuery
        + DependOnMachineQuery
        + DependOnBookingQuery
        + DependOnBookingModifier
{
}

#[async_trait::async_trait]
pub trait ApproveBookingService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookingQuery
    + DependOnBookingModifier
    + DependOnMachineQuery
    + DependOnMachineModifier
{
    /// PENDING to IN_PROGRESS, occupying the machine in the same transaction.
    /// Approving a booking that is already in progress changes nothing.
    async fn approve_booking(
        &self,
        dto: ApproveBookingDto,
    ) -> error_stack::Result<ApprovalDto, KernelError> {
        let now = OffsetDateTime::now_utc();
        let mut con = self.database_connection().transact().await?;
        let mut booking = lock_booking(self, &mut con, &BookingId::new(dto.id)).await?;

        let approval = start(self, &mut con, &mut booking, now).await?;
        if approval == Approval::Started {
            self.booking_modifier().update(&mut con, &booking).await?;
        }
        con.commit().await?;

        let message = match approval {
            Approval::Started => "Booking approved, machine is now in use",
            Approval::AlreadyStarted => "Booking is already in progress",
        };
        Ok(ApprovalDto {
            id: dto.id,
            status: *booking.status(),
            message: message.to_string(),
        })
    }
}

impl<T> ApproveBookingService for T where
    T: DependOnDatabaseConnection
        + DependOnBookingQuery
        + DependOnBookingModifier
        + DependOnMachineQuery
        + DependOnMachineModifier
{
}

#[async_trait::async_trait]
pub trait CompleteBookingService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnUserQuery
    + DependOnBookingQuery
    + DependOnBookingModifier
    + DependOnMachineQuery
    + DependOnMachineModifier
{
    /// IN_PROGRESS to COMPLETED, releasing the machine in the same transaction.
    async fn complete_booking(
        &self,
        dto: CompleteBookingDto,
    ) -> error_stack::Result<CompletionDto, KernelError> {
        let now = OffsetDateTime::now_utc();
        let mut con = self.database_connection().transact().await?;
        let mut booking = lock_booking(self, &mut con, &BookingId::new(dto.id)).await?;

        let machine = finish(self, &mut con, &mut booking, now).await?;
        self.booking_modifier().update(&mut con, &booking).await?;
        let user = self
            .user_query()
            .find_by_id(&mut con, booking.user_id())
            .await?
            .ok_or_else(|| not_found("User", booking.user_id().as_ref()))?;
        con.commit().await?;

        Ok(CompletionDto {
            booking: booking.into(),
            user: user.into(),
            machine: machine.into(),
        })
    }
}

impl<T> CompleteBookingService for T where
    T: DependOnDatabaseConnection
        + DependOnUserQuery
        + DependOnBookingQuery
        + DependOnBookingModifier
        + DependOnMachineQuery
        + DependOnMachineModifier
{
}

#[async_trait::async_trait]
pub trait CancelBookingService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookingQuery + DependOnBookingModifier
{
    /// Only PENDING bookings can be cancelled; they never held the machine.
    async fn cancel_booking(
        &self,
        dto: CancelBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let mut booking = lock_booking(self, &mut con, &BookingId::new(dto.id)).await?;

        booking
            .cancel(OffsetDateTime::now_utc())
            .map_err(|error| rejected(dto.id, error))?;
        self.booking_modifier().update(&mut con, &booking).await?;
        con.commit().await?;

        tracing::info!(booking_id = %dto.id, "Booking cancelled");
        Ok(booking.into())
    }
}

impl<T> CancelBookingService for T where
    T: DependOnDatabaseConnection + DependOnBookingQuery + DependOnBookingModifier
{
}

#[async_trait::async_trait]
pub trait UpdateBookingService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookingQuery
    + DependOnBookingModifier
    + DependOnMachineQuery
    + DependOnMachineModifier
{
    /// Administrative correction.
    ///
    /// A requested status goes through the same transitions as approve, complete
    /// and cancel, machine synchronization included. A new slot on a booking that
    /// is still active afterwards is checked for conflicts like a fresh reservation.
    async fn update_booking(
        &self,
        dto: UpdateBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        let target = dto
            .status
            .as_deref()
            .map(str::parse::<BookingStatus>)
            .transpose()?;
        let booking_date = dto.booking_date.map(BookingDate::new).transpose()?;
        let amount = dto.amount.map(amount).transpose()?;
        let service = service_name(dto.service);
        let now = OffsetDateTime::now_utc();

        let mut con = self.database_connection().transact().await?;
        let mut booking = lock_booking(self, &mut con, &BookingId::new(dto.id)).await?;

        // Status first, so a booking leaving the active set does not claim its new slot.
        if let Some(target) = target {
            let current = *booking.status();
            match target {
                _ if target == current => {}
                BookingStatus::InProgress => {
                    start(self, &mut con, &mut booking, now).await?;
                }
                BookingStatus::Completed => {
                    finish(self, &mut con, &mut booking, now).await?;
                }
                BookingStatus::Cancelled => {
                    booking
                        .cancel(now)
                        .map_err(|error| rejected(dto.id, error))?;
                }
                BookingStatus::Pending => {
                    return Err(rejected(dto.id, TransitionError::Reopen { from: current }));
                }
            }
        }

        if let Some(date) = booking_date {
            if &date != booking.booking_date() {
                if booking.status().is_active() {
                    lock_machine(self, &mut con, booking.machine_id()).await?;
                    ensure_slot_free(
                        self,
                        &mut con,
                        booking.machine_id(),
                        &date,
                        Some(booking.id()),
                    )
                    .await?;
                }
                booking.reschedule(date, now);
            }
        }

        if amount.is_some() || service.is_some() {
            booking.revise(amount, service, now);
        }

        self.booking_modifier().update(&mut con, &booking).await?;
        con.commit().await?;

        tracing::info!(booking_id = %dto.id, status = %booking.status(), "Booking updated");
        Ok(booking.into())
    }
}

impl<T> UpdateBookingService for T where
    T: DependOnDatabaseConnection
        + DependOnBookingQuery
        + DependOnBookingModifier
        + DependOnMachineQuery
        + DependOnMachineModifier
{
}

#[async_trait::async_trait]
pub trait DeleteBookingService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookingQuery
    + DependOnBookingModifier
    + DependOnMachineQuery
    + DependOnMachineModifier
{
    /// Unconditional removal. A machine still held by the booking is released.
    async fn delete_booking(&self, dto: DeleteBookingDto) -> error_stack::Result<(), KernelError> {
        let mut con = self.database_connection().transact().await?;
        let booking = lock_booking(self, &mut con, &BookingId::new(dto.id)).await?;

        if booking.status() == &BookingStatus::InProgress {
            let mut machine = lock_machine(self, &mut con, booking.machine_id()).await?;
            if machine.release(booking.id()) {
                self.machine_modifier().update(&mut con, &machine).await?;
                tracing::info!(
                    booking_id = %dto.id,
                    machine_id = %machine.id().as_ref(),
                    "Released machine held by deleted booking"
                );
            }
        }

        self.booking_modifier()
            .delete(&mut con, booking.id())
            .await?;
        con.commit().await?;

        tracing::info!(booking_id = %dto.id, "Booking deleted");
        Ok(())
    }
}

impl<T> DeleteBookingService for T where
    T: DependOnDatabaseConnection
        + DependOnBookingQuery
        + DependOnBookingModifier
        + DependOnMachineQuery
        + DependOnMachineModifier
{
}

fn amount(value: f64) -> error_stack::Result<BookingAmount, KernelError> {
    if !value.is_finite() || value < 0.0 {
        return Err(KernelError::InvalidArgument.with_detail("amount must be a non-negative number"));
    }
    Ok(BookingAmount::new(value))
}

fn service_name(value: Option<String>) -> Option<ServiceName> {
    value
        .map(|service| service.trim().to_string())
        .filter(|service| !service.is_empty())
        .map(ServiceName::new)
}

fn rejected(id: Uuid, error: TransitionError) -> Report<KernelError> {
    tracing::warn!(booking_id = %id, %error, "Rejected booking transition");
    error.into_report()
}

async fn lock_booking<T>(
    module: &T,
    con: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    id: &BookingId,
) -> error_stack::Result<Booking, KernelError>
where
    T: ?Sized + DependOnBookingQuery,
{
    module
        .booking_query()
        .find_by_id_for_update(con, id)
        .await?
        .ok_or_else(|| not_found("Booking", id.as_ref()))
}

async fn lock_machine<T>(
    module: &T,
    con: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    id: &MachineId,
) -> error_stack::Result<Machine, KernelError>
where
    T: ?Sized + DependOnMachineQuery,
{
    module
        .machine_query()
        .find_by_id_for_update(con, id)
        .await?
        .ok_or_else(|| not_found("Machine", id.as_ref()))
}

async fn ensure_slot_free<T>(
    module: &T,
    con: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    machine_id: &MachineId,
    booking_date: &BookingDate,
    excluding: Option<&BookingId>,
) -> error_stack::Result<(), KernelError>
where
    T: ?Sized + DependOnBookingQuery,
{
    let taken = module
        .booking_query()
        .has_conflict(con, machine_id, booking_date, excluding)
        .await?;
    if taken {
        tracing::warn!(
            machine_id = %machine_id.as_ref(),
            slot = %booking_date.slot_label(),
            "Slot already claimed by an active booking"
        );
        return Err(KernelError::Conflict.with_detail(SLOT_TAKEN));
    }
    Ok(())
}

/// Approves `booking` and, when it actually starts, occupies its machine.
/// The booking itself is left for the caller to persist.
async fn start<T>(
    module: &T,
    con: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    booking: &mut Booking,
    now: OffsetDateTime,
) -> error_stack::Result<Approval, KernelError>
where
    T: ?Sized + DependOnMachineQuery + DependOnMachineModifier,
{
    let id = *booking.id().as_ref();
    let approval = booking.approve(now).map_err(|error| rejected(id, error))?;
    if approval == Approval::AlreadyStarted {
        return Ok(approval);
    }

    let mut machine = lock_machine(module, con, booking.machine_id()).await?;
    machine
        .occupy(booking.user_id().clone(), booking.id().clone(), now)
        .map_err(|error| {
            tracing::warn!(booking_id = %id, %error, "Machine refused occupancy");
            LedgerError::into_report(error)
        })?;
    module.machine_modifier().update(con, &machine).await?;

    tracing::info!(
        booking_id = %id,
        machine_id = %machine.id().as_ref(),
        "Booking started, machine occupied"
    );
    Ok(approval)
}

/// Completes `booking` and frees its machine if the booking still holds it.
async fn finish<T>(
    module: &T,
    con: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    booking: &mut Booking,
    now: OffsetDateTime,
) -> error_stack::Result<Machine, KernelError>
where
    T: ?Sized + DependOnMachineQuery + DependOnMachineModifier,
{
    let id = *booking.id().as_ref();
    booking.complete(now).map_err(|error| rejected(id, error))?;

    let mut machine = lock_machine(module, con, booking.machine_id()).await?;
    if machine.release(booking.id()) {
        module.machine_modifier().update(con, &machine).await?;
        tracing::info!(
            booking_id = %id,
            machine_id = %machine.id().as_ref(),
            "Booking completed, machine released"
        );
    } else {
        tracing::warn!(
            booking_id = %id,
            machine_id = %machine.id().as_ref(),
            status = %machine.status(),
            "Completed booking did not hold its machine, machine left unchanged"
        );
    }
    Ok(machine)
}
