use crate::core::db::KeyValue;
use crate::core::errors::{PostError, PostResult};
use crate::models::models::Post;
use crate::store::PostRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    fn verb(self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
        }
    }
}

/// Adds `user_id` to the post's likes and drops it from the dislikes.
/// The post's status must already be evaluated.
pub fn like<S: KeyValue>(repo: &PostRepository<'_, S>, post: Post, user_id: &str) -> PostResult<Post> {
    react(repo, post, user_id, Reaction::Like)
}

/// Mirror of [`like`]; authors may dislike their own posts.
pub fn dislike<S: KeyValue>(repo: &PostRepository<'_, S>, post: Post, user_id: &str) -> PostResult<Post> {
    react(repo, post, user_id, Reaction::Dislike)
}

fn react<S: KeyValue>(
    repo: &PostRepository<'_, S>,
    mut post: Post,
    user_id: &str,
    reaction: Reaction,
) -> PostResult<Post> {
    if post.is_expired() {
        return Err(PostError::InvalidState(format!(
            "Cannot {} an expired post",
            reaction.verb()
        )));
    }
    if reaction == Reaction::Like && post.author_id == user_id {
        return Err(PostError::Forbidden("Users cannot like their own posts".to_string()));
    }

    let (target, opposite) = match reaction {
        Reaction::Like => (&mut post.likes, &mut post.dislikes),
        Reaction::Dislike => (&mut post.dislikes, &mut post.likes),
    };
    if target.iter().any(|id| id == user_id) {
        return Ok(post);
    }
    target.push(user_id.to_string());
    opposite.retain(|id| id != user_id);

    repo.save(&post)?;
    tracing::info!(post_id = %post.id, user_id, reaction = reaction.verb(), "reaction recorded");
    Ok(post)
}
