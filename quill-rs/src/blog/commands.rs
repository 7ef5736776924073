//! Blog commands.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BlogPost, Tag};
use crate::Command;

/// Create a draft. Tag names that do not exist yet are created.
#[derive(Clone, Debug, Serialize, Deserialize, Command)]
#[command(output = Uuid)]
pub struct CreateBlogPost {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Change any of title, content or tags. `None` leaves the field alone.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Command)]
#[command(output = BlogPost)]
pub struct UpdateBlogPost {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Command)]
pub struct PublishBlogPost {
    pub id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, Command)]
pub struct ArchiveBlogPost {
    pub id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, Command)]
pub struct DeleteBlogPost {
    pub id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, Command)]
#[command(output = Tag)]
pub struct CreateTag {
    pub name: String,
}
