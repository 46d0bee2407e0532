use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Machine, MachineId, MachineNumber};
use crate::KernelError;

#[async_trait::async_trait]
pub trait MachineQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &MachineId,
    ) -> error_stack::Result<Option<Machine>, KernelError>;

    /// Locks the machine row for the rest of the transaction. Every write that
    /// touches a machine's slots or occupancy goes through this lock.
    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &MachineId,
    ) -> error_stack::Result<Option<Machine>, KernelError>;

    async fn find_by_number(
        &self,
        con: &mut Self::Transaction,
        number: &MachineNumber,
    ) -> error_stack::Result<Option<Machine>, KernelError>;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Machine>, KernelError>;
}

pub trait DependOnMachineQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type MachineQuery: MachineQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn machine_query(&self) -> &Self::MachineQuery;
}
