//! Runs against a live server (`FORUM_BIND_ADDR=127.0.0.1:3000 cargo run`).
use serde_json::json;
use std::sync::Mutex;

const BASE_URL: &str = "http://127.0.0.1:3000";
static TEST_LOCK: Mutex<()> = Mutex::new(());

fn lock_test() -> std::sync::MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn sign_up(client: &reqwest::Client, prefix: &str) -> (String, String) {
    let username = format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8]);

    let user_resp = client
        .post(&format!("{}/users", BASE_URL))
        .json(&json!({"username": username, "password": "test"}))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(user_resp.status(), 201);
    let user = user_resp.json::<serde_json::Value>().await.unwrap();
    let user_id = user["id"].as_str().unwrap().to_string();

    let login_resp = client
        .post(&format!("{}/login", BASE_URL))
        .json(&json!({"username": username, "password": "test"}))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(login_resp.status(), 200);
    let token_data = login_resp.json::<serde_json::Value>().await.unwrap();
    let token = token_data["token"].as_str().unwrap().to_string();

    (user_id, token)
}

#[ignore]
#[tokio::test]
async fn test_full_engagement_flow() {
    let _lock = lock_test();
    let client = reqwest::Client::new();

    let (_, author_token) = sign_up(&client, "author").await;
    let (bob_id, bob_token) = sign_up(&client, "bob").await;

    let expiration = (chrono::Utc::now() + chrono::Duration::hours(1)).to_rfc3339();
    let post_resp = client
        .post(&format!("{}/posts/create", BASE_URL))
        .bearer_auth(&author_token)
        .json(&json!({
            "title": "Integration post",
            "topic": "Tech",
            "body": "Posted from the integration test",
            "expirationTime": expiration,
        }))
        .send()
        .await
        .expect("Failed to create post");
    assert_eq!(post_resp.status(), 201);
    let post = post_resp.json::<serde_json::Value>().await.unwrap();
    let post_id = post["id"].as_str().unwrap().to_string();

    let like_resp = client
        .post(&format!("{}/posts/{}/like", BASE_URL, post_id))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("Failed to like");
    assert_eq!(like_resp.status(), 200);
    let liked = like_resp.json::<serde_json::Value>().await.unwrap();
    assert_eq!(liked["likes"], json!([bob_id]));

    let dislike_resp = client
        .post(&format!("{}/posts/{}/dislike", BASE_URL, post_id))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("Failed to dislike");
    assert_eq!(dislike_resp.status(), 200);
    let disliked = dislike_resp.json::<serde_json::Value>().await.unwrap();
    assert_eq!(disliked["likes"], json!([]));
    assert_eq!(disliked["dislikes"], json!([bob_id]));

    let self_like = client
        .post(&format!("{}/posts/{}/like", BASE_URL, post_id))
        .bearer_auth(&author_token)
        .send()
        .await
        .expect("Failed to send self like");
    assert_eq!(self_like.status(), 400);

    let comment_resp = client
        .post(&format!("{}/posts/{}/comment", BASE_URL, post_id))
        .bearer_auth(&bob_token)
        .json(&json!({"comment": "hi"}))
        .send()
        .await
        .expect("Failed to comment");
    assert_eq!(comment_resp.status(), 201);
    let commented = comment_resp.json::<serde_json::Value>().await.unwrap();
    assert_eq!(commented["comments"][0]["comment"], "hi");
    assert_eq!(commented["comments"][0]["userId"], bob_id.as_str());
}

#[ignore]
#[tokio::test]
async fn test_expired_post_listing() {
    let _lock = lock_test();
    let client = reqwest::Client::new();
    let (_, token) = sign_up(&client, "expiry").await;

    let expiration = (chrono::Utc::now() - chrono::Duration::seconds(1)).to_rfc3339();
    let post_resp = client
        .post(&format!("{}/posts/create", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Already over",
            "topic": "Health",
            "body": "This one is past its deadline",
            "expirationTime": expiration,
        }))
        .send()
        .await
        .expect("Failed to create post");
    assert_eq!(post_resp.status(), 201);
    let post_id = post_resp.json::<serde_json::Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let list_resp = client
        .get(&format!("{}/posts/Health", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list posts");
    assert_eq!(list_resp.status(), 200);
    let posts = list_resp.json::<Vec<serde_json::Value>>().await.unwrap();
    let listed = posts
        .iter()
        .find(|p| p["id"] == post_id.as_str())
        .expect("created post missing from topic listing");
    assert_eq!(listed["status"], "Expired");
}

#[ignore]
#[tokio::test]
async fn test_create_post_requires_auth() {
    let _lock = lock_test();
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/posts/create", BASE_URL))
        .json(&json!({"title": "No auth", "topic": "Tech", "body": "x", "expirationTime": 0}))
        .send()
        .await
        .expect("Failed to make request");

    assert_eq!(response.status(), 401);
}
