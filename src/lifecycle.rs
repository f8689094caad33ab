use chrono::{DateTime, Utc};
use crate::core::db::KeyValue;
use crate::core::errors::PostResult;
use crate::models::models::Post;
use crate::store::PostRepository;

/// Brings a post's status up to date with `now`, persisting only when it
/// flips from live to expired.
pub fn evaluate<S: KeyValue>(
    repo: &PostRepository<'_, S>,
    mut post: Post,
    now: DateTime<Utc>,
) -> PostResult<Post> {
    if post.expire_if_due(now) {
        repo.save(&post)?;
        tracing::info!(post_id = %post.id, expiration_time = %post.expiration_time, "post expired");
    }
    Ok(post)
}

pub fn evaluate_all<S: KeyValue>(
    repo: &PostRepository<'_, S>,
    posts: Vec<Post>,
    now: DateTime<Utc>,
) -> PostResult<Vec<Post>> {
    posts.into_iter().map(|post| evaluate(repo, post, now)).collect()
}
