use spin_sdk::http::{Request, Response};
use uuid::Uuid;
use crate::config::*;
use crate::core::db::KeyValue;
use crate::core::errors::ApiError;
use crate::core::helpers::{hash_password, json_response, sanitize_text};
use crate::handlers::Forum;
use crate::models::models::User;

fn build_user_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "username": user.username,
    })
}

pub fn create_user<S: KeyValue>(forum: &Forum<'_, S>, req: &Request) -> anyhow::Result<Response> {
    let new_user: serde_json::Value = match serde_json::from_slice(req.body()) {
        Ok(v) => v,
        Err(_) => return Ok(ApiError::BadRequest("Invalid JSON body".to_string()).into()),
    };
    let username = new_user["username"].as_str().unwrap_or("");
    let password = new_user["password"].as_str().unwrap_or("");

    if username.is_empty() {
        return Ok(ApiError::BadRequest("Username is required".to_string()).into());
    }
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Ok(ApiError::BadRequest(format!(
            "Username must be {}-{} characters",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        ))
        .into());
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Ok(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ))
        .into());
    }

    let sanitized_username = sanitize_text(username);

    let existing_users: Vec<String> = forum.kv.get_json(USERS_LIST_KEY)?.unwrap_or_default();
    for id in &existing_users {
        if let Some(u) = forum.kv.get_json::<User>(&user_key(id))? {
            if u.username == sanitized_username {
                return Ok(ApiError::Conflict("Username exists".to_string()).into());
            }
        }
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: sanitized_username,
        password: hash_password(password)?,
    };
    forum.kv.set_json(&user_key(&user.id), &user)?;

    let mut users = existing_users;
    users.push(user.id.clone());
    forum.kv.set_json(USERS_LIST_KEY, &users)?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    json_response(201, &build_user_json(&user))
}
