use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Booking, BookingDate, BookingId, BookingStatus, MachineId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookingQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError>;

    /// Same as [`BookingQuery::find_by_id`] but holds the row until the transaction ends.
    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError>;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Booking>, KernelError>;

    async fn find_by_machine_id(
        &self,
        con: &mut Self::Transaction,
        machine_id: &MachineId,
    ) -> error_stack::Result<Vec<Booking>, KernelError>;

    async fn find_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Booking>, KernelError>;

    async fn find_by_status(
        &self,
        con: &mut Self::Transaction,
        status: &BookingStatus,
    ) -> error_stack::Result<Vec<Booking>, KernelError>;

    /// Conflict check: does an active booking other than `excluding` already claim
    /// `booking_date` on `machine_id`? Slots match on exact instant.
    async fn has_conflict(
        &self,
        con: &mut Self::Transaction,
        machine_id: &MachineId,
        booking_date: &BookingDate,
        excluding: Option<&BookingId>,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnBookingQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookingQuery: BookingQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn booking_query(&self) -> &Self::BookingQuery;
}
