use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnBookingQuery, DependOnMachineQuery, DependOnUserQuery};
use kernel::interface::update::{
    DependOnBookingModifier, DependOnMachineModifier, DependOnUserModifier,
};
use kernel::prelude::entity::{Booking, BookingId, Machine, MachineId, User, UserId};
use kernel::KernelError;

pub use self::{booking::*, machine::*, user::*};

mod booking;
mod machine;
mod user;

#[derive(Clone, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    machines: HashMap<MachineId, Machine>,
    bookings: HashMap<BookingId, Booking>,
}

/// Process local store with the same constraints as the postgres schema.
///
/// A transaction holds the whole store until it is committed or dropped, so
/// transactions never interleave.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = Tables::clone(&guard);
        Ok(MemoryTransaction { guard, staged })
    }
}

/// Writes go to a private copy that replaces the shared tables on commit.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let MemoryTransaction { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl DependOnBookingQuery for MemoryDatabase {
    type BookingQuery = MemoryBookingRepository;
    fn booking_query(&self) -> &Self::BookingQuery {
        &MemoryBookingRepository
    }
}

impl DependOnBookingModifier for MemoryDatabase {
    type BookingModifier = MemoryBookingRepository;
    fn booking_modifier(&self) -> &Self::BookingModifier {
        &MemoryBookingRepository
    }
}

impl DependOnMachineQuery for MemoryDatabase {
    type MachineQuery = MemoryMachineRepository;
    fn machine_query(&self) -> &Self::MachineQuery {
        &MemoryMachineRepository
    }
}

impl DependOnMachineModifier for MemoryDatabase {
    type MachineModifier = MemoryMachineRepository;
    fn machine_modifier(&self) -> &Self::MachineModifier {
        &MemoryMachineRepository
    }
}

impl DependOnUserQuery for MemoryDatabase {
    type UserQuery = MemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &MemoryUserRepository
    }
}

impl DependOnUserModifier for MemoryDatabase {
    type UserModifier = MemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &MemoryUserRepository
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::UserQuery;
    use kernel::interface::update::UserModifier;
    use kernel::prelude::entity::{User, UserId, UserName, UserRole};
    use kernel::KernelError;

    use crate::database::{MemoryDatabase, MemoryUserRepository};

    fn sample_user() -> User {
        User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("memory"),
            UserRole::Student,
        )
    }

    #[tokio::test]
    async fn commit_publishes_writes() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let user = sample_user();

        let mut con = db.transact().await?;
        MemoryUserRepository.create(&mut con, &user).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = MemoryUserRepository.find_by_id(&mut con, user.id()).await?;
        assert_eq!(found, Some(user));
        Ok(())
    }

    #[tokio::test]
    async fn dropped_transaction_discards_writes() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let user = sample_user();

        let mut con = db.transact().await?;
        MemoryUserRepository.create(&mut con, &user).await?;
        drop(con);

        let mut con = db.transact().await?;
        MemoryUserRepository.create(&mut con, &sample_user()).await?;
        con.roll_back().await?;

        let mut con = db.transact().await?;
        let found = MemoryUserRepository.find_by_id(&mut con, user.id()).await?;
        assert!(found.is_none());
        Ok(())
    }
}
