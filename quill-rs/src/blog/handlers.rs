//! Blog handlers. Names follow `<Message>Handler` so the resolver finds them by convention.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::commands::{
    ArchiveBlogPost, CreateBlogPost, CreateTag, DeleteBlogPost, PublishBlogPost, UpdateBlogPost,
};
use super::queries::{GetBlogPost, GetBlogPostBySlug, ListBlogPosts, ListTags};
use crate::domain::post::base_slug;
use crate::domain::slug::{slugify, with_suffix};
use crate::domain::{BlogPost, BlogPostRepository, DomainError, Page, Tag, TagRepository};
use crate::{CommandHandler, DispatchError, QueryHandler};

/// First free slug for `title`, ignoring the post `owner` itself.
async fn unique_slug(
    posts: &dyn BlogPostRepository,
    title: &str,
    owner: Option<Uuid>,
) -> Result<String, DispatchError> {
    let base = base_slug(title);
    let mut attempt = 1;
    loop {
        let candidate = with_suffix(&base, attempt);
        match posts.find_by_slug(&candidate).await? {
            Some(existing) if Some(existing.id) != owner => attempt += 1,
            _ => return Ok(candidate),
        }
    }
}

/// Slugs for the given tag names, creating tags that do not exist yet.
async fn ensure_tags(tags: &dyn TagRepository, names: &[String]) -> Result<Vec<String>, DispatchError> {
    let mut slugs = Vec::with_capacity(names.len());
    for name in names {
        let slug = slugify(name);
        if slug.is_empty() {
            continue;
        }
        if tags.find_by_slug(&slug).await?.is_none() {
            let tag = Tag::new(name)?;
            debug!(tag = %tag.slug, "creating tag");
            tags.save(tag).await?;
        }
        slugs.push(slug);
    }
    Ok(slugs)
}

pub struct CreateBlogPostHandler {
    pub posts: Arc<dyn BlogPostRepository>,
    pub tags: Arc<dyn TagRepository>,
}

#[async_trait]
impl CommandHandler<CreateBlogPost> for CreateBlogPostHandler {
    async fn handle(&self, command: CreateBlogPost) -> Result<Uuid, DispatchError> {
        let mut post = BlogPost::draft(&command.title, command.content, command.author_id)?;
        post.slug = unique_slug(self.posts.as_ref(), &post.title, None).await?;
        if !command.tags.is_empty() {
            let slugs = ensure_tags(self.tags.as_ref(), &command.tags).await?;
            post.retag(slugs)?;
        }
        let post = self.posts.save(post).await?;
        debug!(post_id = %post.id, slug = %post.slug, "blog post drafted");
        Ok(post.id)
    }
}

pub struct UpdateBlogPostHandler {
    pub posts: Arc<dyn BlogPostRepository>,
    pub tags: Arc<dyn TagRepository>,
}

#[async_trait]
impl CommandHandler<UpdateBlogPost> for UpdateBlogPostHandler {
    async fn handle(&self, command: UpdateBlogPost) -> Result<BlogPost, DispatchError> {
        let mut post = self.posts.get(command.id).await?;
        let title_changed = post.revise(command.title.as_deref(), command.content)?;
        if title_changed {
            post.slug = unique_slug(self.posts.as_ref(), &post.title, Some(post.id)).await?;
        }
        if let Some(names) = command.tags {
            let slugs = ensure_tags(self.tags.as_ref(), &names).await?;
            post.retag(slugs)?;
        }
        self.posts.save(post).await
    }
}

pub struct PublishBlogPostHandler {
    pub posts: Arc<dyn BlogPostRepository>,
}

#[async_trait]
impl CommandHandler<PublishBlogPost> for PublishBlogPostHandler {
    async fn handle(&self, command: PublishBlogPost) -> Result<(), DispatchError> {
        let mut post = self.posts.get(command.id).await?;
        post.publish()?;
        self.posts.save(post).await?;
        debug!(post_id = %command.id, "blog post published");
        Ok(())
    }
}

pub struct ArchiveBlogPostHandler {
    pub posts: Arc<dyn BlogPostRepository>,
}

#[async_trait]
impl CommandHandler<ArchiveBlogPost> for ArchiveBlogPostHandler {
    async fn handle(&self, command: ArchiveBlogPost) -> Result<(), DispatchError> {
        let mut post = self.posts.get(command.id).await?;
        post.archive()?;
        self.posts.save(post).await?;
        debug!(post_id = %command.id, "blog post archived");
        Ok(())
    }
}

pub struct DeleteBlogPostHandler {
    pub posts: Arc<dyn BlogPostRepository>,
}

#[async_trait]
impl CommandHandler<DeleteBlogPost> for DeleteBlogPostHandler {
    async fn handle(&self, command: DeleteBlogPost) -> Result<(), DispatchError> {
        let post = self.posts.get(command.id).await?;
        self.posts.delete(post.id).await
    }
}

pub struct CreateTagHandler {
    pub tags: Arc<dyn TagRepository>,
}

#[async_trait]
impl CommandHandler<CreateTag> for CreateTagHandler {
    async fn handle(&self, command: CreateTag) -> Result<Tag, DispatchError> {
        let tag = Tag::new(&command.name)?;
        if self.tags.find_by_slug(&tag.slug).await?.is_some() {
            return Err(DomainError::TagExists(tag.slug).into());
        }
        self.tags.save(tag).await
    }
}

pub struct GetBlogPostHandler {
    pub posts: Arc<dyn BlogPostRepository>,
}

#[async_trait]
impl QueryHandler<GetBlogPost> for GetBlogPostHandler {
    async fn handle(&self, query: GetBlogPost) -> Result<BlogPost, DispatchError> {
        self.posts.get(query.id).await
    }
}

pub struct GetBlogPostBySlugHandler {
    pub posts: Arc<dyn BlogPostRepository>,
}

#[async_trait]
impl QueryHandler<GetBlogPostBySlug> for GetBlogPostBySlugHandler {
    async fn handle(&self, query: GetBlogPostBySlug) -> Result<BlogPost, DispatchError> {
        self.posts
            .find_by_slug(&query.slug)
            .await?
            .ok_or_else(|| DispatchError::not_found("Blog post", &query.slug))
    }
}

pub struct ListBlogPostsHandler {
    pub posts: Arc<dyn BlogPostRepository>,
}

#[async_trait]
impl QueryHandler<ListBlogPosts> for ListBlogPostsHandler {
    async fn handle(&self, query: ListBlogPosts) -> Result<Page<BlogPost>, DispatchError> {
        self.posts.index(&query.filters).await
    }
}

pub struct ListTagsHandler {
    pub tags: Arc<dyn TagRepository>,
}

#[async_trait]
impl QueryHandler<ListTags> for ListTagsHandler {
    async fn handle(&self, _query: ListTags) -> Result<Vec<Tag>, DispatchError> {
        self.tags.list().await
    }
}
