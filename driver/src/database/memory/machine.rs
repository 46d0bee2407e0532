use kernel::interface::query::MachineQuery;
use kernel::interface::update::MachineModifier;
use kernel::prelude::entity::{Machine, MachineId, MachineNumber};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;
use crate::error::NUMBER_TAKEN;

pub struct MemoryMachineRepository;

#[async_trait::async_trait]
impl MachineQuery for MemoryMachineRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &MachineId,
    ) -> error_stack::Result<Option<Machine>, KernelError> {
        Ok(con.staged.machines.get(id).cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut MemoryTransaction,
        id: &MachineId,
    ) -> error_stack::Result<Option<Machine>, KernelError> {
        self.find_by_id(con, id).await
    }

    async fn find_by_number(
        &self,
        con: &mut MemoryTransaction,
        number: &MachineNumber,
    ) -> error_stack::Result<Option<Machine>, KernelError> {
        let found = con
            .staged
            .machines
            .values()
            .find(|machine| machine.number() == number)
            .cloned();
        Ok(found)
    }

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Machine>, KernelError> {
        let mut machines = con.staged.machines.values().cloned().collect::<Vec<_>>();
        machines.sort_by(|a, b| a.number().cmp(b.number()));
        Ok(machines)
    }
}

#[async_trait::async_trait]
impl MachineModifier for MemoryMachineRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        machine: &Machine,
    ) -> error_stack::Result<(), KernelError> {
        let machines = &mut con.staged.machines;
        if machines.contains_key(machine.id()) {
            return Err(KernelError::Conflict.with_detail("Resource already exists"));
        }
        if machines.values().any(|other| other.number() == machine.number()) {
            return Err(KernelError::Conflict.with_detail(NUMBER_TAKEN));
        }
        machines.insert(machine.id().clone(), machine.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        machine: &Machine,
    ) -> error_stack::Result<(), KernelError> {
        let machines = &mut con.staged.machines;
        if !machines.contains_key(machine.id()) {
            return Ok(());
        }
        let duplicated = machines
            .values()
            .any(|other| other.id() != machine.id() && other.number() == machine.number());
        if duplicated {
            return Err(KernelError::Conflict.with_detail(NUMBER_TAKEN));
        }
        machines.insert(machine.id().clone(), machine.clone());
        Ok(())
    }

    /// Bookings on the machine go with it.
    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        machine_id: &MachineId,
    ) -> error_stack::Result<(), KernelError> {
        con.staged.machines.remove(machine_id);
        con.staged
            .bookings
            .retain(|_, booking| booking.machine_id() != machine_id);
        Ok(())
    }
}
