use chrono::{DateTime, Utc};
use serde::Serialize;
use spin_sdk::http::{Request, Response};
use crate::comments::add_comment;
use crate::core::db::KeyValue;
use crate::core::errors::{ApiError, PostError, PostResult};
use crate::core::helpers::{json_response, now, validate_uuid};
use crate::engagement::{dislike, like};
use crate::handlers::Forum;
use crate::lifecycle::{evaluate, evaluate_all};
use crate::models::models::{NewPost, Post, Topic};
use crate::store::PostRepository;

/// Store failures answer with `on_store_error`; the topic listing is the
/// only route that reports them as 500.
fn reply<T: Serialize>(
    result: PostResult<T>,
    status: u16,
    on_store_error: fn(String) -> ApiError,
) -> anyhow::Result<Response> {
    match result {
        Ok(value) => json_response(status, &value),
        Err(PostError::Store(e)) => {
            tracing::error!(error = %e, "post store failure");
            Ok(on_store_error(e.to_string()).into())
        }
        Err(e) => {
            tracing::info!(reason = %e, "post operation refused");
            Ok(ApiError::from(e).into())
        }
    }
}

/// Loads a post and brings its status up to date before anything acts on it.
fn load_current<S: KeyValue>(
    repo: &PostRepository<'_, S>,
    id: &str,
    now: DateTime<Utc>,
) -> PostResult<Post> {
    if !validate_uuid(id) {
        return Err(PostError::NotFound(id.to_string()));
    }
    let post = repo.find_by_id(id)?;
    evaluate(repo, post, now)
}

pub fn list_posts<S: KeyValue>(forum: &Forum<'_, S>, req: &Request) -> anyhow::Result<Response> {
    if forum.auth().authenticate(req).is_none() {
        return Ok(ApiError::Unauthorized.into());
    }

    let repo = forum.posts();
    let result = repo.find_all().and_then(|posts| evaluate_all(&repo, posts, now()));
    reply(result, 200, ApiError::BadRequest)
}

pub fn list_posts_by_topic<S: KeyValue>(
    forum: &Forum<'_, S>,
    req: &Request,
    raw_topic: &str,
) -> anyhow::Result<Response> {
    if forum.auth().authenticate(req).is_none() {
        return Ok(ApiError::Unauthorized.into());
    }

    // A topic outside the enum matches no post.
    let topic = match urlencoding::decode(raw_topic).ok().and_then(|t| t.parse::<Topic>().ok()) {
        Some(topic) => topic,
        None => return json_response(200, &Vec::<Post>::new()),
    };

    let repo = forum.posts();
    let result = repo
        .find_by_topic(topic)
        .and_then(|posts| evaluate_all(&repo, posts, now()));
    reply(result, 200, ApiError::InternalError)
}

pub fn create_post<S: KeyValue>(forum: &Forum<'_, S>, req: &Request) -> anyhow::Result<Response> {
    let user_id = match forum.auth().authenticate(req) {
        Some(uid) => uid,
        None => return Ok(ApiError::Unauthorized.into()),
    };

    let value: serde_json::Value = match serde_json::from_slice(req.body()) {
        Ok(v) => v,
        Err(_) => return Ok(ApiError::BadRequest("Invalid JSON body".to_string()).into()),
    };

    let result = NewPost::from_json(&value).and_then(|draft| forum.posts().create(draft, &user_id, now()));
    if let Ok(post) = &result {
        tracing::info!(post_id = %post.id, author_id = %user_id, topic = %post.topic, "post created");
    }
    reply(result, 201, ApiError::BadRequest)
}

pub fn like_post<S: KeyValue>(forum: &Forum<'_, S>, req: &Request, id: &str) -> anyhow::Result<Response> {
    let user_id = match forum.auth().authenticate(req) {
        Some(uid) => uid,
        None => return Ok(ApiError::Unauthorized.into()),
    };

    let repo = forum.posts();
    let result = load_current(&repo, id, now()).and_then(|post| like(&repo, post, &user_id));
    reply(result, 200, ApiError::BadRequest)
}

pub fn dislike_post<S: KeyValue>(forum: &Forum<'_, S>, req: &Request, id: &str) -> anyhow::Result<Response> {
    let user_id = match forum.auth().authenticate(req) {
        Some(uid) => uid,
        None => return Ok(ApiError::Unauthorized.into()),
    };

    let repo = forum.posts();
    let result = load_current(&repo, id, now()).and_then(|post| dislike(&repo, post, &user_id));
    reply(result, 200, ApiError::BadRequest)
}

pub fn comment_post<S: KeyValue>(forum: &Forum<'_, S>, req: &Request, id: &str) -> anyhow::Result<Response> {
    let user_id = match forum.auth().authenticate(req) {
        Some(uid) => uid,
        None => return Ok(ApiError::Unauthorized.into()),
    };

    // A missing or unreadable body is just a missing comment.
    let value: serde_json::Value = serde_json::from_slice(req.body()).unwrap_or_default();
    let text = value["comment"].as_str();

    let repo = forum.posts();
    let now = now();
    let result = load_current(&repo, id, now)
        .and_then(|post| add_comment(&repo, post, &user_id, text, now));
    reply(result, 201, ApiError::BadRequest)
}
