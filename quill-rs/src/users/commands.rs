//! User commands.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Command;

#[derive(Clone, Debug, Serialize, Deserialize, Command)]
#[command(output = Registration)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub user_id: Uuid,
    pub verification_token: String,
}

/// Handled by `EmailVerificationHandler`, not by the conventional `VerifyUserEmailHandler`.
#[derive(Clone, Debug, Serialize, Deserialize, Command)]
#[command(handler = crate::users::handlers::EmailVerificationHandler)]
pub struct VerifyUserEmail {
    /// One-time secret; kept out of the serialized fields the dispatch log prints.
    #[serde(skip_serializing)]
    pub token: String,
}
