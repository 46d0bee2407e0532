use error_stack::Report;

use kernel::interface::query::BookingQuery;
use kernel::interface::update::BookingModifier;
use kernel::prelude::entity::{Booking, BookingDate, BookingId, BookingStatus, MachineId, UserId};
use kernel::KernelError;

use crate::database::memory::{MemoryTransaction, Tables};
use crate::error::SLOT_TAKEN;

pub struct MemoryBookingRepository;

#[async_trait::async_trait]
impl BookingQuery for MemoryBookingRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        Ok(con.staged.bookings.get(id).cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut MemoryTransaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        self.find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        Ok(select(&con.staged, |_| true))
    }

    async fn find_by_machine_id(
        &self,
        con: &mut MemoryTransaction,
        machine_id: &MachineId,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        Ok(select(&con.staged, |booking| booking.machine_id() == machine_id))
    }

    async fn find_by_user_id(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        Ok(select(&con.staged, |booking| booking.user_id() == user_id))
    }

    async fn find_by_status(
        &self,
        con: &mut MemoryTransaction,
        status: &BookingStatus,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        Ok(select(&con.staged, |booking| booking.status() == status))
    }

    async fn has_conflict(
        &self,
        con: &mut MemoryTransaction,
        machine_id: &MachineId,
        booking_date: &BookingDate,
        excluding: Option<&BookingId>,
    ) -> error_stack::Result<bool, KernelError> {
        let taken = con.staged.bookings.values().any(|booking| {
            booking.machine_id() == machine_id
                && booking.booking_date() == booking_date
                && booking.status().is_active()
                && excluding.map_or(true, |id| booking.id() != id)
        });
        Ok(taken)
    }
}

#[async_trait::async_trait]
impl BookingModifier for MemoryBookingRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        let tables = &mut con.staged;
        if tables.bookings.contains_key(booking.id()) {
            return Err(KernelError::Conflict.with_detail("Resource already exists"));
        }
        if !tables.users.contains_key(booking.user_id())
            || !tables.machines.contains_key(booking.machine_id())
        {
            return Err(Report::new(KernelError::Internal)
                .attach_printable("booking references a missing user or machine"));
        }
        check_active_slot(tables, booking)?;
        tables.bookings.insert(booking.id().clone(), booking.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        let tables = &mut con.staged;
        if !tables.bookings.contains_key(booking.id()) {
            return Ok(());
        }
        check_active_slot(tables, booking)?;
        tables.bookings.insert(booking.id().clone(), booking.clone());
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        booking_id: &BookingId,
    ) -> error_stack::Result<(), KernelError> {
        con.staged.bookings.remove(booking_id);
        Ok(())
    }
}

/// Same ordering as the postgres queries: by slot, then by creation.
fn select(tables: &Tables, filter: impl Fn(&Booking) -> bool) -> Vec<Booking> {
    let mut found = tables
        .bookings
        .values()
        .filter(|booking| filter(*booking))
        .cloned()
        .collect::<Vec<_>>();
    found.sort_by_key(|booking| (*booking.booking_date(), *booking.created_at().as_ref()));
    found
}

/// Mirrors the partial unique index on active slots.
fn check_active_slot(tables: &Tables, booking: &Booking) -> error_stack::Result<(), KernelError> {
    if !booking.status().is_active() {
        return Ok(());
    }
    let clash = tables.bookings.values().any(|other| {
        other.id() != booking.id()
            && other.machine_id() == booking.machine_id()
            && other.booking_date() == booking.booking_date()
            && other.status().is_active()
    });
    if clash {
        return Err(KernelError::Conflict.with_detail(SLOT_TAKEN));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookingQuery;
    use kernel::interface::update::{BookingModifier, MachineModifier, UserModifier};
    use kernel::prelude::entity::{
        Booking, BookingAmount, BookingDate, BookingId, Machine, MachineId, MachineNumber,
        MachineState, User, UserId, UserName, UserRole,
    };
    use kernel::KernelError;

    use crate::database::{
        MemoryBookingRepository, MemoryDatabase, MemoryMachineRepository, MemoryUserRepository,
    };

    #[tokio::test]
    async fn active_slot_is_unique() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let mut con = db.transact().await?;

        let user = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("slot"),
            UserRole::Student,
        );
        MemoryUserRepository.create(&mut con, &user).await?;
        let machine = Machine::new(
            MachineId::new(Uuid::new_v4()),
            MachineNumber::new("M-1"),
            None,
            None,
            MachineState::Available,
        );
        MemoryMachineRepository.create(&mut con, &machine).await?;

        let slot = BookingDate::new(datetime!(2024-01-01 10:00 UTC))?;
        let booking = |now| {
            Booking::create(
                BookingId::new(Uuid::new_v4()),
                user.id().clone(),
                machine.id().clone(),
                slot,
                BookingAmount::default(),
                None,
                now,
            )
        };

        let mut first = booking(datetime!(2024-01-01 08:00 UTC));
        MemoryBookingRepository.create(&mut con, &first).await?;
        let second = booking(datetime!(2024-01-01 08:01 UTC));
        let report = MemoryBookingRepository
            .create(&mut con, &second)
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Conflict);

        first.cancel(datetime!(2024-01-01 08:02 UTC)).unwrap();
        MemoryBookingRepository.update(&mut con, &first).await?;
        MemoryBookingRepository.create(&mut con, &second).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = MemoryBookingRepository
            .find_by_machine_id(&mut con, machine.id())
            .await?;
        assert_eq!(found, vec![first, second]);
        Ok(())
    }
}
