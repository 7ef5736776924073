//! User aggregate with email verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregate::AggregateRoot;
use super::error::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AggregateRoot for User {
    fn name() -> &'static str {
        "User"
    }
}

/// Lowercased email if it looks like `local@domain.tld`.
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::InvalidEmail(email));
    }
    Ok(email)
}

impl User {
    pub fn register(name: &str, email: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            email: normalize_email(email)?,
            email_verified_at: None,
            created_at: Utc::now(),
        })
    }

    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Marks the email verified. Verifying twice keeps the first timestamp.
    pub fn verify_email(&mut self) {
        if self.email_verified_at.is_none() {
            self.email_verified_at = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert_eq!(normalize_email(" Ada@Example.org ").unwrap(), "ada@example.org");
        for bad in ["", "ada", "@example.org", "ada@example", "ada@.org", "a@b@c.org"] {
            assert!(normalize_email(bad).is_err(), "accepted {:?}", bad);
        }
    }
}
