//! Blog queries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BlogPost, Page, PostFilters, Tag};
use crate::Query;

#[derive(Clone, Debug, Serialize, Deserialize, Query)]
#[query(output = BlogPost)]
pub struct GetBlogPost {
    pub id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, Query)]
#[query(output = BlogPost)]
pub struct GetBlogPostBySlug {
    pub slug: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Query)]
#[query(output = Page<BlogPost>)]
pub struct ListBlogPosts {
    #[serde(flatten)]
    pub filters: PostFilters,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Query)]
#[query(output = Vec<Tag>)]
pub struct ListTags;
