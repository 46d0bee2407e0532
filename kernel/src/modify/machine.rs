use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Machine, MachineId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait MachineModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        machine: &Machine,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        machine: &Machine,
    ) -> error_stack::Result<(), KernelError>;
    /// Removes the machine together with its bookings.
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        machine_id: &MachineId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnMachineModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type MachineModifier: MachineModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn machine_modifier(&self) -> &Self::MachineModifier;
}
