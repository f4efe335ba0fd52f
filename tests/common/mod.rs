#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use blog_api::config::AppConfig;
use blog_api::database::repository::users;
use blog_api::database::DatabaseManager;
use blog_api::state::AppState;

/// The real router served on an ephemeral port, backed by its own in-memory database.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pool: SqlitePool,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(AppConfig::testing()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        let pool = DatabaseManager::in_memory()
            .await
            .context("failed to create in-memory database")?;
        Self::serve(config, pool).await
    }

    /// Serve from a database file inside `dir` through a pool of several connections.
    pub async fn spawn_on_file(dir: &tempfile::TempDir) -> Result<Self> {
        let mut config = AppConfig::testing();
        config.database.url = format!("sqlite://{}", dir.path().join("blog.db").display());
        config.database.max_connections = 8;

        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to open database file")?;
        DatabaseManager::migrate(&pool).await?;
        Self::serve(config, pool).await
    }

    async fn serve(config: AppConfig, pool: SqlitePool) -> Result<Self> {
        let app = blog_api::app(AppState::new(config, pool.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let base_url = format!("http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("test server stopped: {e}");
            }
        });

        Ok(Self {
            base_url,
            client: Client::new(),
            pool,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/register"))
            .json(&json!({ "username": username, "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Register `username` with `<username>@example.com` / `pw-<username>` and return a token.
    pub async fn signup(&self, username: &str) -> Result<String> {
        let email = format!("{username}@example.com");
        let password = format!("pw-{username}");

        let res = self.register(username, &email, &password).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register {username}: {}", res.status());

        let res = self.login(&email, &password).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login {username}: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    /// Grant the admin flag directly in the store
    pub async fn promote(&self, username: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        anyhow::ensure!(users::set_admin(&mut conn, username, true).await?, "no user {username}");
        Ok(())
    }

    pub async fn create_article(&self, token: &str, title: &str, content: &str) -> Result<i64> {
        let res = self
            .client
            .post(self.url("/articles"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create article: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["id"].as_i64().context("article id missing")
    }

    pub async fn create_category(&self, name: &str) -> Result<i64> {
        let res = self
            .client
            .post(self.url("/categories"))
            .json(&json!({ "name": name }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create category: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["id"].as_i64().context("category id missing")
    }

    pub async fn get_json(&self, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }
}
