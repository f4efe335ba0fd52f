mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use blog_api::config::AppConfig;
use common::TestServer;

async fn comment(server: &TestServer, token: &str, article: i64, content: &str) -> Result<reqwest::Response> {
    Ok(server
        .client
        .post(server.url(&format!("/articles/{article}/comments")))
        .bearer_auth(token)
        .json(&json!({ "content": content }))
        .send()
        .await?)
}

#[tokio::test]
async fn comments_are_listed_with_usernames() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.signup("alice").await?;
    let bob = server.signup("bob").await?;
    let article = server.create_article(&alice, "T", "C").await?;

    let res = comment(&server, &bob, article, "first!").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["content"], "first!");
    assert_eq!(body["data"]["article_id"], article);
    assert!(body["data"]["user_id"].is_i64());

    comment(&server, &alice, article, "thanks").await?;

    let (status, body) = server.get_json(&format!("/articles/{article}/comments")).await?;
    assert_eq!(status, StatusCode::OK);
    let comments = body["data"]["comments"].as_array().cloned().unwrap_or_default();
    let pairs: Vec<(&str, &str)> = comments
        .iter()
        .map(|c| (c["content"].as_str().unwrap_or_default(), c["user"].as_str().unwrap_or_default()))
        .collect();
    assert_eq!(pairs, [("first!", "bob"), ("thanks", "alice")]);
    Ok(())
}

#[tokio::test]
async fn comment_content_is_stored_verbatim() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.signup("alice").await?;
    let article = server.create_article(&alice, "T", "C").await?;

    let text = "  > quoted\nreply\n";
    let res = comment(&server, &alice, article, text).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["content"], text);

    let (_, body) = server.get_json(&format!("/articles/{article}/comments")).await?;
    assert_eq!(body["data"]["comments"][0]["content"], text);
    Ok(())
}

#[tokio::test]
async fn commenting_checks_article_before_content() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.signup("alice").await?;
    let article = server.create_article(&alice, "T", "C").await?;

    let res = comment(&server, &alice, 999, "").await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = comment(&server, &alice, article, "   ").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url(&format!("/articles/{article}/comments")))
        .json(&json!({ "content": "anon" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = server.get_json("/articles/999/comments").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn commenters_delete_their_own_comments() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.signup("alice").await?;
    let bob = server.signup("bob").await?;
    let article = server.create_article(&alice, "T", "C").await?;
    let body: Value = comment(&server, &bob, article, "mine").await?.json().await?;
    let id = body["data"]["id"].as_i64().unwrap_or_default();

    let res = server
        .client
        .delete(server.url(&format!("/comments/{id}")))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .delete(server.url(&format!("/comments/{id}")))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["deleted_comment_id"], id);

    let res = server
        .client
        .delete(server.url(&format!("/comments/{id}")))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (_, body) = server.get_json(&format!("/articles/{article}/comments")).await?;
    assert_eq!(body["data"]["comments"], json!([]));
    Ok(())
}

#[tokio::test]
async fn relaxed_ownership_allows_any_user_to_delete_comments() -> Result<()> {
    let mut config = AppConfig::testing();
    config.security.strict_ownership = false;
    let server = TestServer::spawn_with(config).await?;
    let alice = server.signup("alice").await?;
    let bob = server.signup("bob").await?;
    let article = server.create_article(&alice, "T", "C").await?;
    let body: Value = comment(&server, &bob, article, "mine").await?.json().await?;
    let id = body["data"]["id"].as_i64().unwrap_or_default();

    let res = server.client.delete(server.url(&format!("/comments/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .delete(server.url(&format!("/comments/{id}")))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
