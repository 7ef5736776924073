//! User handlers. Verification tokens live in the cache, keyed `email-verification:{token}`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::commands::{RegisterUser, Registration, VerifyUserEmail};
use super::queries::GetUser;
use crate::domain::user::normalize_email;
use crate::domain::{DomainError, User, UserRepository};
use crate::{Cache, CommandHandler, DispatchError, QueryHandler};

pub const VERIFICATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub fn verification_key(token: &str) -> String {
    format!("email-verification:{}", token)
}

pub struct RegisterUserHandler {
    pub users: Arc<dyn UserRepository>,
    pub cache: Arc<dyn Cache>,
}

#[async_trait]
impl CommandHandler<RegisterUser> for RegisterUserHandler {
    async fn handle(&self, command: RegisterUser) -> Result<Registration, DispatchError> {
        let email = normalize_email(&command.email)?;
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::EmailTaken(email).into());
        }
        let user = self.users.save(User::register(&command.name, &email)?).await?;
        let token = Uuid::new_v4().simple().to_string();
        self.cache
            .put(&verification_key(&token), user.id.to_string(), VERIFICATION_TTL)
            .await?;
        debug!(user_id = %user.id, "user registered");
        Ok(Registration {
            user_id: user.id,
            verification_token: token,
        })
    }
}

/// Consumes a verification token. A token works once.
pub struct EmailVerificationHandler {
    pub users: Arc<dyn UserRepository>,
    pub cache: Arc<dyn Cache>,
}

#[async_trait]
impl CommandHandler<VerifyUserEmail> for EmailVerificationHandler {
    async fn handle(&self, command: VerifyUserEmail) -> Result<(), DispatchError> {
        let key = verification_key(&command.token);
        let user_id = self
            .cache
            .get(&key)
            .await?
            .and_then(|raw| Uuid::parse_str(&raw).ok())
            .ok_or_else(|| DispatchError::not_found("Verification token", &command.token))?;
        let mut user = self.users.get(user_id).await?;
        user.verify_email();
        self.users.save(user).await?;
        self.cache.forget(&key).await?;
        debug!(user_id = %user_id, "email verified");
        Ok(())
    }
}

pub struct GetUserHandler {
    pub users: Arc<dyn UserRepository>,
}

#[async_trait]
impl QueryHandler<GetUser> for GetUserHandler {
    async fn handle(&self, query: GetUser) -> Result<User, DispatchError> {
        self.users.get(query.id).await
    }
}
