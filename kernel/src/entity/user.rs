mod id;
mod name;
mod role;

pub use self::{id::*, name::*, role::*};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct User {
    id: UserId,
    name: UserName,
    role: UserRole,
}

impl User {
    pub fn new(id: UserId, name: UserName, role: UserRole) -> Self {
        Self { id, name, role }
    }
}
