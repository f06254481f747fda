//! Integration tests for Style Mingle.
//!
//! Each test spawns the assistant on an ephemeral port with the bundled demo
//! catalog and drives it over HTTP with a cookie-keeping client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p style-mingle-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use style_mingle_assistant::config::AssistantConfig;
use style_mingle_assistant::state::AppState;

/// Emma Wilson's email in the demo catalog.
pub const EMMA_EMAIL: &str = "emma.wilson@example.com";
/// A sales associate's email in the demo catalog.
pub const SOPHIA_EMAIL: &str = "sophia.lee@retailco.com";

/// A running assistant and a client with its own cookie jar.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    server: tokio::task::JoinHandle<()>,
}

impl TestContext {
    /// Spawn a server whose swipe decisions apply immediately.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind or the client cannot be built.
    pub async fn new() -> Self {
        Self::with_settle_delay(Duration::ZERO).await
    }

    /// Spawn a server with the given settle delay.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind or the client cannot be built.
    #[allow(clippy::expect_used)]
    pub async fn with_settle_delay(settle_delay: Duration) -> Self {
        let config = AssistantConfig {
            port: 0,
            settle_delay,
            ..AssistantConfig::default()
        };
        let state = AppState::new(config).expect("Failed to build application state");
        let app = style_mingle_assistant::app(state);

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            client: Self::client(),
            base_url: format!("http://{addr}"),
            server,
        }
    }

    /// A fresh client with its own cookie jar, for a second user.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sign the context's client in as a shopper.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or is rejected.
    pub async fn login_customer(&self, identifier: &str) -> Value {
        let resp = self
            .post("/auth/customer/login", &serde_json::json!({ "identifier": identifier }))
            .await;
        expect_json(resp, StatusCode::OK).await
    }

    /// Sign the context's client in as an associate.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or is rejected.
    pub async fn login_associate(&self, email: &str) -> Value {
        let resp = self
            .post("/auth/associate/login", &serde_json::json!({ "email": email }))
            .await;
        expect_json(resp, StatusCode::OK).await
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::expect_used)]
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::expect_used)]
    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST failed")
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::expect_used)]
    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE failed")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Assert the status and decode the JSON body.
///
/// # Panics
///
/// Panics if the status differs or the body is not valid JSON for `T`.
#[allow(clippy::expect_used)]
pub async fn expect_json<T: DeserializeOwned>(resp: Response, status: StatusCode) -> T {
    assert_eq!(resp.status(), status, "unexpected status for {}", resp.url());
    resp.json().await.expect("Response body is not the expected JSON")
}
