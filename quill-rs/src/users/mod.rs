//! Users context: registration and email verification.

pub mod commands;
pub mod handlers;
pub mod queries;

use std::sync::Arc;

use crate::domain::UserRepository;
use crate::{Cache, Container, ContainerError, DispatchError, Module};

use commands::{RegisterUser, VerifyUserEmail};
use handlers::{EmailVerificationHandler, GetUserHandler, RegisterUserHandler};
use queries::GetUser;

fn users(c: &Container) -> Result<Arc<dyn UserRepository>, ContainerError> {
    c.resolve::<Arc<dyn UserRepository>>().cloned()
}

fn cache(c: &Container) -> Result<Arc<dyn Cache>, ContainerError> {
    c.resolve::<Arc<dyn Cache>>().cloned()
}

/// Registers user handlers. Expects `Arc<dyn UserRepository>` and `Arc<dyn Cache>` in the container.
pub struct UsersModule;

impl Module for UsersModule {
    fn register_into(&mut self, container: &mut Container) -> Result<(), DispatchError> {
        users(container)?;
        cache(container)?;

        container.register_command_handler::<RegisterUser, _, _>(|c| {
            Ok(RegisterUserHandler { users: users(c)?, cache: cache(c)? })
        });
        container.register_command_handler::<VerifyUserEmail, _, _>(|c| {
            Ok(EmailVerificationHandler { users: users(c)?, cache: cache(c)? })
        });
        container.register_query_handler::<GetUser, _, _>(|c| Ok(GetUserHandler { users: users(c)? }));
        Ok(())
    }
}
