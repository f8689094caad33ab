use chrono::{DateTime, Utc};
use crate::core::db::KeyValue;
use crate::core::errors::{PostError, PostResult};
use crate::models::models::{Comment, Post};
use crate::store::PostRepository;

pub fn add_comment<S: KeyValue>(
    repo: &PostRepository<'_, S>,
    mut post: Post,
    user_id: &str,
    text: Option<&str>,
    now: DateTime<Utc>,
) -> PostResult<Post> {
    if post.is_expired() {
        return Err(PostError::InvalidState("Cannot comment on an expired post".to_string()));
    }

    let comment = text.unwrap_or_default().to_string();
    if comment.is_empty() {
        return Err(PostError::Validation("Comment is required".to_string()));
    }

    post.comments.push(Comment {
        user_id: user_id.to_string(),
        comment,
        created_at: now,
    });
    repo.save(&post)?;

    tracing::info!(post_id = %post.id, user_id, comments = post.comments.len(), "comment added");
    Ok(post)
}
