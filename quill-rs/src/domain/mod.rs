//! Domain: aggregates, rules, repository contracts.

pub mod aggregate;
pub mod error;
pub mod post;
pub mod repository;
pub mod slug;
pub mod tag;
pub mod user;

pub use aggregate::AggregateRoot;
pub use error::DomainError;
pub use post::{BlogPost, PostStatus};
pub use repository::{BlogPostRepository, Page, PostFilters, Repository, TagRepository, UserRepository};
pub use tag::Tag;
pub use user::User;
