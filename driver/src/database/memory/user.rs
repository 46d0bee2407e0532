use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{User, UserId};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;

pub struct MemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for MemoryUserRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con.staged.users.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl UserModifier for MemoryUserRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        if con.staged.users.contains_key(user.id()) {
            return Err(KernelError::Conflict.with_detail("Resource already exists"));
        }
        con.staged.users.insert(user.id().clone(), user.clone());
        Ok(())
    }
}
