//! Blog post aggregate: draft -> published -> archived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::aggregate::AggregateRoot;
use super::error::DomainError;
use super::slug::slugify;

pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MIN_CHARS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author_id: Uuid,
    pub status: PostStatus,
    /// Tag slugs.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl AggregateRoot for BlogPost {
    fn name() -> &'static str {
        "Blog post"
    }
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::TitleTooLong {
            max: TITLE_MAX_CHARS,
        });
    }
    Ok(title.to_owned())
}

fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.chars().count() < CONTENT_MIN_CHARS {
        return Err(DomainError::ContentTooShort {
            min: CONTENT_MIN_CHARS,
        });
    }
    Ok(())
}

impl BlogPost {
    /// New draft with no tags. The slug is derived from the title; callers make it unique.
    pub fn draft(title: &str, content: String, author_id: Uuid) -> Result<Self, DomainError> {
        let title = validate_title(title)?;
        validate_content(&content)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            slug: base_slug(&title),
            title,
            content,
            author_id,
            status: PostStatus::Draft,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            published_at: None,
        })
    }

    pub fn publish(&mut self) -> Result<(), DomainError> {
        match self.status {
            PostStatus::Published => Err(DomainError::AlreadyPublished),
            PostStatus::Archived => Err(DomainError::PublishArchived),
            PostStatus::Draft => {
                let now = Utc::now();
                self.status = PostStatus::Published;
                self.published_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
        }
    }

    pub fn archive(&mut self) -> Result<(), DomainError> {
        if self.status == PostStatus::Archived {
            return Err(DomainError::AlreadyArchived);
        }
        self.status = PostStatus::Archived;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Change title and/or content. Returns whether the title changed (the slug may need updating).
    pub fn revise(&mut self, title: Option<&str>, content: Option<String>) -> Result<bool, DomainError> {
        if self.status == PostStatus::Archived {
            return Err(DomainError::EditArchived);
        }
        let title = title.map(validate_title).transpose()?;
        if let Some(content) = &content {
            validate_content(content)?;
        }
        let title_changed = match title {
            Some(title) if title != self.title => {
                self.title = title;
                true
            }
            _ => false,
        };
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
        Ok(title_changed)
    }

    pub fn retag(&mut self, tags: Vec<String>) -> Result<(), DomainError> {
        if self.status == PostStatus::Archived {
            return Err(DomainError::EditArchived);
        }
        let mut tags = tags;
        tags.sort();
        tags.dedup();
        self.tags = tags;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Slug for a title, before collision suffixes.
pub fn base_slug(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        "post".to_owned()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BlogPost {
        BlogPost::draft("My First Post", "0123456789".into(), Uuid::new_v4()).unwrap()
    }

    #[test]
    fn draft_starts_untagged_with_slug() {
        let post = draft();
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.slug, "my-first-post");
        assert!(post.tags.is_empty());
        assert!(post.published_at.is_none());
    }

    #[test]
    fn draft_validates_input() {
        let author = Uuid::new_v4();
        assert_eq!(
            BlogPost::draft("   ", "0123456789".into(), author),
            Err(DomainError::EmptyTitle)
        );
        assert_eq!(
            BlogPost::draft("t", "short".into(), author),
            Err(DomainError::ContentTooShort { min: CONTENT_MIN_CHARS })
        );
        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        assert_eq!(
            BlogPost::draft(&long, "0123456789".into(), author),
            Err(DomainError::TitleTooLong { max: TITLE_MAX_CHARS })
        );
    }

    #[test]
    fn status_transitions() {
        let mut post = draft();
        post.publish().unwrap();
        assert_eq!(post.publish(), Err(DomainError::AlreadyPublished));
        post.archive().unwrap();
        assert_eq!(post.archive(), Err(DomainError::AlreadyArchived));
        assert_eq!(post.publish(), Err(DomainError::PublishArchived));
        assert_eq!(post.revise(Some("New"), None), Err(DomainError::EditArchived));
    }

    #[test]
    fn revise_reports_title_change() {
        let mut post = draft();
        assert!(!post.revise(Some("My First Post"), None).unwrap());
        assert!(post.revise(Some("Another"), Some("a much longer body".into())).unwrap());
        assert_eq!(post.title, "Another");
        assert_eq!(post.content, "a much longer body");
    }
}
