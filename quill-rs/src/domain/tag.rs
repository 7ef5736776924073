//! Tag aggregate. Posts reference tags by slug.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregate::AggregateRoot;
use super::error::DomainError;
use super::slug::slugify;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl AggregateRoot for Tag {
    fn name() -> &'static str {
        "Tag"
    }
}

impl Tag {
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            slug,
        })
    }
}
