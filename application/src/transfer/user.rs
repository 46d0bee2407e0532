use uuid::Uuid;

use kernel::prelude::entity::{DestructUser, User, UserRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser { id, name, role } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

#[derive(Debug, Default)]
pub struct CreateUserDto {
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug)]
pub struct GetUserDto {
    pub id: Uuid,
}
