//! In-memory store behind all repositories. Transactions snapshot the whole state on `begin`
//! and put the snapshot back on `rollback`. Only one transaction is open at a time; `begin`
//! waits for the previous one to commit or roll back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use quill_core::{DispatchError, Transaction, TransactionManager};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    BlogPost, BlogPostRepository, Page, PostFilters, Repository, Tag, TagRepository, User,
    UserRepository,
};

#[derive(Clone, Debug, Default)]
struct State {
    posts: HashMap<Uuid, BlogPost>,
    tags: HashMap<Uuid, Tag>,
    users: HashMap<Uuid, User>,
}

/// Shared in-memory persistence. Clones share the same state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    writer: Arc<AsyncMutex<()>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn post_count(&self) -> usize {
        self.state().posts.len()
    }
}

#[async_trait]
impl Repository<BlogPost> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, DispatchError> {
        Ok(self.state().posts.get(&id).cloned())
    }

    async fn save(&self, post: BlogPost) -> Result<BlogPost, DispatchError> {
        self.state().posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DispatchError> {
        self.state().posts.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl BlogPostRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, DispatchError> {
        Ok(self.state().posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn index(&self, filters: &PostFilters) -> Result<Page<BlogPost>, DispatchError> {
        let mut matching: Vec<BlogPost> = self
            .state()
            .posts
            .values()
            .filter(|p| filters.matches(p))
            .cloned()
            .collect();
        // Newest first; id breaks ties so pages are stable.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(Page::from_all(matching, filters.page(), filters.per_page()))
    }
}

#[async_trait]
impl Repository<Tag> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, DispatchError> {
        Ok(self.state().tags.get(&id).cloned())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, DispatchError> {
        self.state().tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DispatchError> {
        self.state().tags.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, DispatchError> {
        Ok(self.state().tags.values().find(|t| t.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Tag>, DispatchError> {
        let mut tags: Vec<Tag> = self.state().tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

#[async_trait]
impl Repository<User> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DispatchError> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, DispatchError> {
        self.state().users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DispatchError> {
        self.state().users.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DispatchError> {
        Ok(self.state().users.values().find(|u| u.email == email).cloned())
    }
}

struct Snapshot {
    store: InMemoryStore,
    saved: State,
    _writer: OwnedMutexGuard<()>,
}

#[async_trait]
impl TransactionManager for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DispatchError> {
        let writer = self.writer.clone().lock_owned().await;
        let saved = self.state().clone();
        Ok(Box::new(Snapshot {
            store: self.clone(),
            saved,
            _writer: writer,
        }))
    }
}

#[async_trait]
impl Transaction for Snapshot {
    async fn commit(self: Box<Self>) -> Result<(), DispatchError> {
        debug!("in-memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DispatchError> {
        let Snapshot {
            store,
            saved,
            _writer: writer,
        } = *self;
        *store.state() = saved;
        drop(writer);
        debug!("in-memory transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rollback_restores_snapshot() {
        let store = InMemoryStore::new();
        let kept = BlogPost::draft("Kept", "0123456789".into(), Uuid::new_v4()).unwrap();
        Repository::<BlogPost>::save(&store, kept.clone()).await.unwrap();

        let tx = store.begin().await.unwrap();
        let dropped = BlogPost::draft("Dropped", "0123456789".into(), Uuid::new_v4()).unwrap();
        Repository::<BlogPost>::save(&store, dropped).await.unwrap();
        Repository::<BlogPost>::delete(&store, kept.id).await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(store.post_count(), 1);
        assert!(Repository::<BlogPost>::find_by_id(&store, kept.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rollback_keeps_writes_committed_by_a_later_transaction() {
        let store = InMemoryStore::new();
        let first = store.begin().await.unwrap();

        let other = store.clone();
        let second = tokio::spawn(async move {
            let tx = other.begin().await.unwrap();
            let post = BlogPost::draft("Second", "0123456789".into(), Uuid::new_v4()).unwrap();
            Repository::<BlogPost>::save(&other, post).await.unwrap();
            tx.commit().await.unwrap();
        });
        tokio::task::yield_now().await;
        assert_eq!(store.post_count(), 0, "second transaction must wait for the first");

        first.rollback().await.unwrap();
        second.await.unwrap();
        assert_eq!(store.post_count(), 1);
    }
}
