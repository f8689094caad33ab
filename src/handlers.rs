use spin_sdk::http::{Request, Response};
use crate::auth::{self, TokenAuth};
use crate::config::Config;
use crate::core::db::KeyValue;
use crate::core::errors::ApiError;
use crate::store::PostRepository;
use crate::{posts, users};

/// Everything a request handler needs, built once per entry point and
/// passed down by reference.
pub struct Forum<'a, S: KeyValue> {
    pub kv: &'a S,
    pub config: &'a Config,
}

impl<'a, S: KeyValue> Forum<'a, S> {
    pub fn new(kv: &'a S, config: &'a Config) -> Self {
        Self { kv, config }
    }

    pub fn posts(&self) -> PostRepository<'a, S> {
        PostRepository::new(self.kv)
    }

    pub fn auth(&self) -> TokenAuth<'a, S> {
        TokenAuth::new(self.kv, self.config)
    }
}

pub fn handle_request<S: KeyValue>(forum: &Forum<'_, S>, req: Request) -> Response {
    let method = req.method().to_string();
    let path = req.path().to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let result = match (method.as_str(), segments.as_slice()) {
        ("POST", ["users"]) => users::create_user(forum, &req),
        ("POST", ["login"]) => auth::login_user(forum, &req),
        ("POST", ["logout"]) => auth::logout_user(forum, &req),
        ("GET", ["posts"]) => posts::list_posts(forum, &req),
        ("POST", ["posts", "create"]) => posts::create_post(forum, &req),
        ("GET", ["posts", topic]) => posts::list_posts_by_topic(forum, &req, topic),
        ("POST", ["posts", id, "like"]) => posts::like_post(forum, &req, id),
        ("POST", ["posts", id, "dislike"]) => posts::dislike_post(forum, &req, id),
        ("POST", ["posts", id, "comment"]) => posts::comment_post(forum, &req, id),
        _ => Ok(ApiError::NotFound("No route found".to_string()).into()),
    };

    let response = result.unwrap_or_else(|err| {
        tracing::error!(%method, %path, error = %err, "request failed");
        ApiError::from(err).into()
    });
    tracing::debug!(%method, %path, status = *response.status(), "request handled");
    response
}
