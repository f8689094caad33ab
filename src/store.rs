use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::config::{post_key, POSTS_LIST_KEY};
use crate::core::db::KeyValue;
use crate::core::errors::{PostError, PostResult};
use crate::models::models::{NewPost, Post, PostStatus, Topic};

/// Post documents with their embedded comments, one key per post plus an
/// id list kept in creation order.
pub struct PostRepository<'a, S: KeyValue> {
    kv: &'a S,
}

impl<'a, S: KeyValue> PostRepository<'a, S> {
    pub fn new(kv: &'a S) -> Self {
        Self { kv }
    }

    pub fn create(&self, draft: NewPost, author_id: &str, now: DateTime<Utc>) -> PostResult<Post> {
        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            topic: draft.topic,
            body: draft.body,
            author_id: author_id.to_string(),
            created_at: now,
            expiration_time: draft.expiration_time,
            status: PostStatus::Live,
            likes: Vec::new(),
            dislikes: Vec::new(),
            comments: Vec::new(),
        };

        self.kv.set_json(&post_key(&post.id), &post)?;

        if let Err(e) = self.append_to_index(&post.id) {
            // An unindexed document would never be listed
            if let Err(cleanup) = self.kv.delete(&post_key(&post.id)) {
                tracing::warn!(post_id = %post.id, error = %cleanup, "could not remove unindexed post");
            }
            return Err(e.into());
        }

        Ok(post)
    }

    fn append_to_index(&self, id: &str) -> anyhow::Result<()> {
        let mut ids: Vec<String> = self.kv.get_json(POSTS_LIST_KEY)?.unwrap_or_default();
        ids.push(id.to_string());
        self.kv.set_json(POSTS_LIST_KEY, &ids)
    }

    pub fn find_by_id(&self, id: &str) -> PostResult<Post> {
        self.kv
            .get_json::<Post>(&post_key(id))?
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }

    pub fn find<F>(&self, filter: F) -> PostResult<Vec<Post>>
    where
        F: Fn(&Post) -> bool,
    {
        let ids: Vec<String> = self.kv.get_json(POSTS_LIST_KEY)?.unwrap_or_default();

        let mut posts = Vec::new();
        for id in ids {
            if let Some(post) = self.kv.get_json::<Post>(&post_key(&id))? {
                if filter(&post) {
                    posts.push(post);
                }
            }
        }
        Ok(posts)
    }

    pub fn find_all(&self) -> PostResult<Vec<Post>> {
        self.find(|_| true)
    }

    pub fn find_by_topic(&self, topic: Topic) -> PostResult<Vec<Post>> {
        self.find(|post| post.topic == topic)
    }

    /// Overwrites the whole document.
    pub fn save(&self, post: &Post) -> PostResult<()> {
        self.kv.set_json(&post_key(&post.id), post)?;
        Ok(())
    }
}
