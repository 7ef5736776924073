//! Domain rule failures. Converted into `DispatchError` at the handler boundary.

use quill_core::DispatchError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("content must be at least {min} characters")]
    ContentTooShort { min: usize },
    #[error("name must not be empty")]
    EmptyName,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("email already registered: {0}")]
    EmailTaken(String),
    #[error("tag already exists: {0}")]
    TagExists(String),
    #[error("post is already published")]
    AlreadyPublished,
    #[error("cannot publish an archived post")]
    PublishArchived,
    #[error("post is already archived")]
    AlreadyArchived,
    #[error("archived posts cannot be edited")]
    EditArchived,
}

impl DomainError {
    /// Input problems (as opposed to state transitions that are not allowed).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyTitle
                | DomainError::TitleTooLong { .. }
                | DomainError::ContentTooShort { .. }
                | DomainError::EmptyName
                | DomainError::InvalidEmail(_)
        )
    }
}

impl From<DomainError> for DispatchError {
    fn from(e: DomainError) -> Self {
        if e.is_validation() {
            DispatchError::validation(e.to_string())
        } else {
            DispatchError::invariant(e.to_string())
        }
    }
}
