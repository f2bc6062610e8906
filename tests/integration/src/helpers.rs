//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, issuing bearer tokens and
//! making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use relynt_api::{create_app, create_app_state};
use relynt_common::{AppConfig, JwtService};
use relynt_core::UserId;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Shared secret the test server verifies tokens with
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on the memory store with the given memberships
    ///
    /// Each entry is `organization_id:user_id[:role]`.
    pub async fn start(memberships: &[&str]) -> Result<Self> {
        let config = test_config(memberships);
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let jwt = JwtService::from_config(&config.jwt);

        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        // Port 0: the OS picks a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            jwt,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Issue an access token for `user_id`, valid for an hour
    pub fn token_for(&self, user_id: &str) -> Result<String> {
        let user_id = UserId::parse(user_id)?;
        Ok(self.jwt.issue_access_token(&user_id, 3600)?)
    }

    /// Make a GET request without auth
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a POST request without auth
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }
}

/// Memory-store configuration with seeded memberships
pub fn test_config(memberships: &[&str]) -> AppConfig {
    let mut config = AppConfig::in_memory(TEST_JWT_SECRET);
    config.store.seed_memberships = memberships.iter().map(ToString::to_string).collect();
    config
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("missing error code in {body}"))
}
