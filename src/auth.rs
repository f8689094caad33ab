use chrono::{DateTime, Utc};
use spin_sdk::http::{Request, Response};
use uuid::Uuid;
use crate::config::{token_key, user_key, Config, USERS_LIST_KEY};
use crate::core::db::KeyValue;
use crate::core::errors::ApiError;
use crate::core::helpers::{json_response, now, now_iso, validate_uuid, verify_password};
use crate::handlers::Forum;
use crate::models::models::{TokenData, User};

/// Resolves bearer tokens to user ids. Nothing past this point sees the
/// token itself.
pub struct TokenAuth<'a, S: KeyValue> {
    kv: &'a S,
    token_expiration_hours: i64,
}

impl<'a, S: KeyValue> TokenAuth<'a, S> {
    pub fn new(kv: &'a S, config: &Config) -> Self {
        Self {
            kv,
            token_expiration_hours: config.token_expiration_hours,
        }
    }

    pub fn issue_token(&self, user_id: &str) -> anyhow::Result<String> {
        let token = Uuid::new_v4().to_string();
        let data = TokenData {
            user_id: user_id.to_string(),
            created_at: now_iso(),
        };
        self.kv.set_json(&token_key(&token), &data)?;
        Ok(token)
    }

    pub fn authenticate(&self, req: &Request) -> Option<String> {
        let token = bearer_token(req)?;
        let user_id = self.user_for_token(token, now());
        if user_id.is_none() {
            tracing::debug!(path = req.path(), "rejected bearer token");
        }
        user_id
    }

    pub fn user_for_token(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let data = self.kv.get_json::<TokenData>(&token_key(token)).ok()??;

        let created = DateTime::parse_from_rfc3339(&data.created_at).ok()?;
        let age_hours = (now - created.with_timezone(&Utc)).num_hours();
        if age_hours > self.token_expiration_hours {
            return None;
        }

        // Tokens of deleted users die with them
        self.kv.get_json::<User>(&user_key(&data.user_id)).ok()??;
        Some(data.user_id)
    }

    pub fn revoke(&self, token: &str) -> anyhow::Result<()> {
        self.kv.delete(&token_key(token))
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.header("Authorization")?
        .as_str()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

pub fn login_user<S: KeyValue>(forum: &Forum<'_, S>, req: &Request) -> anyhow::Result<Response> {
    let creds: serde_json::Value = match serde_json::from_slice(req.body()) {
        Ok(v) => v,
        Err(_) => return Ok(ApiError::BadRequest("Invalid JSON body".to_string()).into()),
    };
    let username = creds["username"].as_str().unwrap_or_default();
    let password = creds["password"].as_str().unwrap_or_default();

    let users: Vec<String> = forum.kv.get_json(USERS_LIST_KEY)?.unwrap_or_default();

    for id in users {
        if let Some(u) = forum.kv.get_json::<User>(&user_key(&id))? {
            if !validate_uuid(&u.id) {
                continue;
            }
            if u.username == username && verify_password(password, &u.password) {
                let token = forum.auth().issue_token(&u.id)?;
                tracing::info!(user_id = %u.id, "user logged in");
                return json_response(200, &serde_json::json!({
                    "token": token,
                    "user_id": u.id
                }));
            }
        }
    }

    tracing::info!(username, "login failed");
    Ok(ApiError::Unauthorized.into())
}

pub fn logout_user<S: KeyValue>(forum: &Forum<'_, S>, req: &Request) -> anyhow::Result<Response> {
    let auth = forum.auth();
    let token = match bearer_token(req) {
        Some(token) if auth.authenticate(req).is_some() => token,
        _ => return Ok(ApiError::Unauthorized.into()),
    };

    auth.revoke(token)?;

    json_response(200, &serde_json::json!({
        "message": "Logged out successfully"
    }))
}
