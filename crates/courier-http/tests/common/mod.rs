//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mock server wrapper with convenience methods.
pub struct TestHttpServer {
    server: MockServer,
}

impl TestHttpServer {
    /// Start a new mock server.
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get URL for a specific path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    /// Access the underlying MockServer.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Respond to any `verb` request on `endpoint` with `template`.
    pub async fn respond(&self, verb: &str, endpoint: &str, template: ResponseTemplate) {
        Mock::given(method(verb))
            .and(path(endpoint))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Respond with an empty 200 after `latency`.
    pub async fn with_latency(&self, verb: &str, endpoint: &str, latency: Duration) {
        self.respond(verb, endpoint, ResponseTemplate::new(200).set_delay(latency))
            .await;
    }

    /// The single request received so far.
    pub async fn only_request(&self) -> Request {
        let mut received = self.server.received_requests().await.unwrap_or_default();
        assert_eq!(received.len(), 1, "expected exactly one request");
        received.remove(0)
    }
}
