//! Blog context: posts and tags.

pub mod commands;
pub mod handlers;
pub mod queries;

use std::sync::Arc;

use crate::domain::{BlogPostRepository, TagRepository};
use crate::{Container, ContainerError, DispatchError, Module};

use commands::{ArchiveBlogPost, CreateBlogPost, CreateTag, DeleteBlogPost, PublishBlogPost, UpdateBlogPost};
use handlers::*;
use queries::{GetBlogPost, GetBlogPostBySlug, ListBlogPosts, ListTags};

fn posts(c: &Container) -> Result<Arc<dyn BlogPostRepository>, ContainerError> {
    c.resolve::<Arc<dyn BlogPostRepository>>().cloned()
}

fn tags(c: &Container) -> Result<Arc<dyn TagRepository>, ContainerError> {
    c.resolve::<Arc<dyn TagRepository>>().cloned()
}

/// Registers blog handlers. Expects `Arc<dyn BlogPostRepository>` and `Arc<dyn TagRepository>`
/// in the container.
pub struct BlogModule;

impl Module for BlogModule {
    fn register_into(&mut self, container: &mut Container) -> Result<(), DispatchError> {
        posts(container)?;
        tags(container)?;

        container.register_command_handler::<CreateBlogPost, _, _>(|c| {
            Ok(CreateBlogPostHandler { posts: posts(c)?, tags: tags(c)? })
        });
        container.register_command_handler::<UpdateBlogPost, _, _>(|c| {
            Ok(UpdateBlogPostHandler { posts: posts(c)?, tags: tags(c)? })
        });
        container.register_command_handler::<PublishBlogPost, _, _>(|c| {
            Ok(PublishBlogPostHandler { posts: posts(c)? })
        });
        container.register_command_handler::<ArchiveBlogPost, _, _>(|c| {
            Ok(ArchiveBlogPostHandler { posts: posts(c)? })
        });
        container.register_command_handler::<DeleteBlogPost, _, _>(|c| {
            Ok(DeleteBlogPostHandler { posts: posts(c)? })
        });
        container.register_command_handler::<CreateTag, _, _>(|c| {
            Ok(CreateTagHandler { tags: tags(c)? })
        });

        container.register_query_handler::<GetBlogPost, _, _>(|c| {
            Ok(GetBlogPostHandler { posts: posts(c)? })
        });
        container.register_query_handler::<GetBlogPostBySlug, _, _>(|c| {
            Ok(GetBlogPostBySlugHandler { posts: posts(c)? })
        });
        container.register_query_handler::<ListBlogPosts, _, _>(|c| {
            Ok(ListBlogPostsHandler { posts: posts(c)? })
        });
        container.register_query_handler::<ListTags, _, _>(|c| Ok(ListTagsHandler { tags: tags(c)? }));
        Ok(())
    }
}
