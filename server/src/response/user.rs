use crate::controller::Exhaust;
use application::transfer::UserDto;
use axum::Json;
use kernel::prelude::entity::UserRole;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    id: Uuid,
    name: String,
    role: UserRole,
}

impl From<UserDto> for UserResponse {
    fn from(value: UserDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            role: value.role,
        }
    }
}

pub struct UserPresenter;

impl Exhaust<UserDto> for UserPresenter {
    type To = Json<UserResponse>;
    fn emit(&self, input: UserDto) -> Self::To {
        Json(input.into())
    }
}
