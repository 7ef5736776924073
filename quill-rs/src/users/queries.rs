use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::User;
use crate::Query;

#[derive(Clone, Debug, Serialize, Deserialize, Query)]
#[query(output = User)]
pub struct GetUser {
    pub id: Uuid,
}
