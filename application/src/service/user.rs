use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{User, UserId, UserName, UserRole};
use kernel::KernelError;

use crate::service::{not_found, required_text};
use crate::transfer::{CreateUserDto, GetUserDto, UserDto};

#[async_trait::async_trait]
pub trait GetUserService: 'static + Sync + Send + DependOnDatabaseConnection + DependOnUserQuery {
    async fn get_user(&self, dto: GetUserDto) -> error_stack::Result<UserDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let user = self
            .user_query()
            .find_by_id(&mut con, &UserId::new(dto.id))
            .await?
            .ok_or_else(|| not_found("User", dto.id))?;
        Ok(user.into())
    }
}

impl<T> GetUserService for T where T: DependOnDatabaseConnection + DependOnUserQuery {}

#[async_trait::async_trait]
pub trait CreateUserService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnUserModifier
{
    async fn create_user(&self, dto: CreateUserDto) -> error_stack::Result<UserDto, KernelError> {
        let name = UserName::new(required_text(dto.name, "name")?);
        let role = match dto.role {
            Some(role) => role.parse::<UserRole>()?,
            None => UserRole::default(),
        };

        let mut con = self.database_connection().transact().await?;
        let user = User::new(UserId::new(Uuid::new_v4()), name, role);
        self.user_modifier().create(&mut con, &user).await?;
        con.commit().await?;

        tracing::info!(user_id = %user.id().as_ref(), %role, "User registered");
        Ok(user.into())
    }
}

impl<T> CreateUserService for T where T: DependOnDatabaseConnection + DependOnUserModifier {}
