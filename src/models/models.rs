use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Serialize, Deserialize};
use crate::config::{MAX_TITLE_LENGTH, MIN_TITLE_LENGTH};
use crate::core::errors::{PostError, PostResult};

#[derive(Serialize, Deserialize, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct TokenData {
    pub user_id: String,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic {
    Politics,
    Health,
    Sport,
    Tech,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Politics, Topic::Health, Topic::Sport, Topic::Tech];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Politics => "Politics",
            Topic::Health => "Health",
            Topic::Sport => "Sport",
            Topic::Tech => "Tech",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s)
            .ok_or_else(|| {
                PostError::Validation(format!(
                    "Topic must be one of Politics, Health, Sport, Tech (got {:?})",
                    s
                ))
            })
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PostStatus {
    #[default]
    Live,
    Expired,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user_id: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub topic: Topic,
    pub body: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub expiration_time: DateTime<Utc>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn is_expired(&self) -> bool {
        self.status == PostStatus::Expired
    }

    /// Moves a live post past its deadline to `Expired`. Returns whether the
    /// status changed; an expired post never goes back to live.
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == PostStatus::Live && self.expiration_time < now {
            self.status = PostStatus::Expired;
            return true;
        }
        false
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    pub fn is_disliked_by(&self, user_id: &str) -> bool {
        self.dislikes.iter().any(|id| id == user_id)
    }
}

/// Validated input of the create-post operation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub topic: Topic,
    pub body: String,
    pub expiration_time: DateTime<Utc>,
}

impl NewPost {
    pub fn from_json(value: &serde_json::Value) -> PostResult<Self> {
        let title = required_str(value, "title")?.to_string();
        let title_len = title.chars().count();
        if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&title_len) {
            return Err(PostError::Validation(format!(
                "Title must be {}-{} characters",
                MIN_TITLE_LENGTH, MAX_TITLE_LENGTH
            )));
        }

        let topic: Topic = required_str(value, "topic")?.parse()?;

        let body = required_str(value, "body")?.to_string();
        if body.is_empty() {
            return Err(PostError::Validation("Body is required".to_string()));
        }

        let expiration_time = parse_timestamp(&value["expirationTime"])?;

        Ok(Self {
            title,
            topic,
            body,
            expiration_time,
        })
    }
}

fn required_str<'a>(value: &'a serde_json::Value, field: &str) -> PostResult<&'a str> {
    value[field]
        .as_str()
        .ok_or_else(|| PostError::Validation(format!("{} is required", field)))
}

// RFC 3339 strings or epoch milliseconds.
fn parse_timestamp(value: &serde_json::Value) -> PostResult<DateTime<Utc>> {
    match value {
        serde_json::Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| PostError::Validation(format!("expirationTime is not a valid date: {}", e))),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(|| PostError::Validation("expirationTime is out of range".to_string())),
        serde_json::Value::Null => Err(PostError::Validation("expirationTime is required".to_string())),
        _ => Err(PostError::Validation("expirationTime is not a valid date".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn live_post(expiration_time: DateTime<Utc>) -> Post {
        Post {
            id: "p1".into(),
            title: "Hello".into(),
            topic: Topic::Tech,
            body: "body".into(),
            author_id: "a".into(),
            created_at: Utc::now(),
            expiration_time,
            status: PostStatus::Live,
            likes: vec![],
            dislikes: vec![],
            comments: vec![],
        }
    }

    #[test]
    fn expire_if_due_transitions_once() {
        let now = Utc::now();
        let mut post = live_post(now - Duration::seconds(1));

        assert!(post.expire_if_due(now));
        assert!(post.is_expired());
        assert!(!post.expire_if_due(now));
        assert!(post.is_expired());
    }

    #[test]
    fn future_deadline_stays_live() {
        let now = Utc::now();
        let mut post = live_post(now + Duration::hours(1));
        assert!(!post.expire_if_due(now));
        assert_eq!(post.status, PostStatus::Live);

        // deadline equal to now is not yet in the past
        let mut edge = live_post(now);
        assert!(!edge.expire_if_due(now));
    }

    #[test]
    fn post_serializes_with_camel_case_fields() {
        let post = live_post(Utc::now());
        let value = serde_json::to_value(&post).unwrap();

        assert_eq!(value["authorId"], "a");
        assert_eq!(value["status"], "Live");
        assert_eq!(value["topic"], "Tech");
        assert!(value["expirationTime"].is_string());
        assert!(value["likes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn topic_parsing() {
        assert_eq!("Sport".parse::<Topic>().unwrap(), Topic::Sport);
        assert!(matches!("sport".parse::<Topic>(), Err(PostError::Validation(_))));
    }

    #[test]
    fn new_post_from_json() {
        let draft = NewPost::from_json(&json!({
            "title": "Election news",
            "topic": "Politics",
            "body": "Some text",
            "expirationTime": "2030-01-01T00:00:00Z",
        }))
        .unwrap();

        assert_eq!(draft.topic, Topic::Politics);
        assert_eq!(draft.expiration_time.to_rfc3339(), "2030-01-01T00:00:00+00:00");
    }

    #[test]
    fn new_post_accepts_epoch_millis() {
        let draft = NewPost::from_json(&json!({
            "title": "Match report",
            "topic": "Sport",
            "body": "3-1",
            "expirationTime": 1_893_456_000_000i64,
        }))
        .unwrap();

        assert_eq!(draft.expiration_time.timestamp(), 1_893_456_000);
    }

    #[test]
    fn new_post_rejects_bad_fields() {
        let base = json!({
            "title": "Valid title",
            "topic": "Health",
            "body": "text",
            "expirationTime": "2030-01-01T00:00:00Z",
        });

        let mut short_title = base.clone();
        short_title["title"] = json!("ab");
        let mut long_title = base.clone();
        long_title["title"] = json!("x".repeat(257));
        let mut bad_topic = base.clone();
        bad_topic["topic"] = json!("Cooking");
        let mut empty_body = base.clone();
        empty_body["body"] = json!("");
        let mut missing_deadline = base.clone();
        missing_deadline.as_object_mut().unwrap().remove("expirationTime");
        let mut bad_deadline = base.clone();
        bad_deadline["expirationTime"] = json!("tomorrow");

        for input in [short_title, long_title, bad_topic, empty_body, missing_deadline, bad_deadline] {
            assert!(
                matches!(NewPost::from_json(&input), Err(PostError::Validation(_))),
                "accepted {}",
                input
            );
        }
    }

    #[test]
    fn title_length_counts_characters() {
        let draft = NewPost::from_json(&json!({
            "title": "ééé",
            "topic": "Tech",
            "body": "text",
            "expirationTime": "2030-01-01T00:00:00Z",
        }));
        assert!(draft.is_ok());
    }

    #[test]
    fn text_fields_are_kept_verbatim() {
        let title = format!("{}&", "x".repeat(255));
        let draft = NewPost::from_json(&json!({
            "title": title,
            "topic": "Tech",
            "body": "1 < 2 & \"x\"",
            "expirationTime": "2030-01-01T00:00:00Z",
        }))
        .unwrap();

        assert_eq!(draft.title.chars().count(), 256);
        assert_eq!(draft.title, title);
        assert_eq!(draft.body, "1 < 2 & \"x\"");
    }

    #[test]
    fn whitespace_body_is_not_empty() {
        let draft = NewPost::from_json(&json!({
            "title": "Spaces",
            "topic": "Tech",
            "body": "   ",
            "expirationTime": "2030-01-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(draft.body, "   ");
    }
}
