//! Repositories: persistence for aggregates. Handlers get them from the container as `Arc<dyn ...>`.

use async_trait::async_trait;
use quill_core::DispatchError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregate::AggregateRoot;
use super::post::{BlogPost, PostStatus};
use super::tag::Tag;
use super::user::User;

pub const DEFAULT_PER_PAGE: u32 = 15;
pub const MAX_PER_PAGE: u32 = 100;

/// Repository: persistence for an aggregate.
#[async_trait]
pub trait Repository<A: AggregateRoot>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<A>, DispatchError>;

    /// Insert or replace; returns the stored record.
    async fn save(&self, aggregate: A) -> Result<A, DispatchError>;

    async fn delete(&self, id: Uuid) -> Result<(), DispatchError>;

    /// `find_by_id`, with a missing record turned into `NotFound`.
    async fn get(&self, id: Uuid) -> Result<A, DispatchError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DispatchError::not_found(A::name(), id))
    }
}

#[async_trait]
pub trait BlogPostRepository: Repository<BlogPost> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, DispatchError>;
    async fn index(&self, filters: &PostFilters) -> Result<Page<BlogPost>, DispatchError>;
}

#[async_trait]
pub trait TagRepository: Repository<Tag> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, DispatchError>;
    /// All tags ordered by name.
    async fn list(&self) -> Result<Vec<Tag>, DispatchError>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DispatchError>;
}

/// One page of results. `page` is 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Cut the requested page out of an already filtered and ordered list.
    pub fn from_all(all: Vec<T>, page: u32, per_page: u32) -> Self {
        let total = all.len();
        let skip = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let items = all.into_iter().skip(skip).take(per_page as usize).collect();
        Self {
            items,
            total,
            page,
            per_page,
        }
    }

    pub fn last_page(&self) -> u32 {
        if self.total == 0 {
            1
        } else {
            ((self.total as u64 + self.per_page as u64 - 1) / self.per_page as u64) as u32
        }
    }
}

/// Filters for listing posts. Missing fields mean "any".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFilters {
    pub status: Option<PostStatus>,
    /// Tag slug.
    pub tag: Option<String>,
    pub author_id: Option<Uuid>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PostFilters {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn matches(&self, post: &BlogPost) -> bool {
        if self.status.is_some_and(|s| s != post.status) {
            return false;
        }
        if self.author_id.is_some_and(|a| a != post.author_id) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !post.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !post.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging() {
        let page = Page::from_all((1..=32).collect::<Vec<_>>(), 3, 15);
        assert_eq!(page.items, vec![31, 32]);
        assert_eq!(page.total, 32);
        assert_eq!(page.last_page(), 3);

        let empty = Page::<u8>::from_all(Vec::new(), 1, 15);
        assert_eq!(empty.last_page(), 1);
    }

    #[test]
    fn filter_defaults_are_clamped() {
        let filters = PostFilters {
            page: Some(0),
            per_page: Some(1000),
            ..PostFilters::default()
        };
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.per_page(), MAX_PER_PAGE);
    }
}
