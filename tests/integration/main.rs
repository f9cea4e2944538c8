//! Integration tests using WireMock
//!
//! These run the real reqwest transport against a local mock server, covering
//! signing headers, path escaping, form bodies and the retry loop end to end.

mod folders;
mod users;
mod webhooks;

use contextio_lite::prelude::*;
use std::time::Duration;
use wiremock::matchers::{header, header_exists};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Helper to create a client pointed at the mock server
pub fn client_for(server: &MockServer, hooks: RequestHooks) -> LiteClient {
    let config = LiteConfigBuilder::new()
        .credential("test-key", "test-secret")
        .base_url(&server.uri())
        .expect("mock server URI")
        .retry(
            RetryConfig::new()
                .max_attempts(3)
                .initial_delay(Duration::ZERO)
                .with_jitter(false),
        )
        .hooks(hooks)
        .build()
        .expect("valid config");
    contextio_lite::create_client(config).expect("client")
}

/// Helper to match signed requests
pub fn signed(mock: wiremock::MockBuilder) -> wiremock::MockBuilder {
    mock.and(header_exists("authorization"))
        .and(header("accept", "application/json"))
}

/// Helper to create success response templates
pub fn success_response(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Helper to reject anything that was not explicitly mounted
pub async fn fail_unmatched(server: &MockServer) {
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(599))
        .with_priority(u8::MAX)
        .mount(server)
        .await;
}
