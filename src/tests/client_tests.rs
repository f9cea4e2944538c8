//! Client tests.

use crate::client::LiteClient;
use crate::config::LiteConfigBuilder;
use crate::errors::{ConfigurationError, LiteError};
use crate::mocks::{MockHttpTransport, MockResponse};
use crate::services::users::{ListUsersRequest, UsersServiceTrait};
use crate::webhooks::WebhookCallback;
use std::sync::Arc;

#[test]
fn test_create_client_rejects_missing_credential() {
    let err = crate::create_client(LiteConfigBuilder::new().build_unchecked()).unwrap_err();
    assert!(matches!(
        err,
        LiteError::Configuration(ConfigurationError::MissingCredential)
    ));
}

#[test]
fn test_create_client_rejects_zero_attempts() {
    let config = LiteConfigBuilder::new()
        .credential("key", "secret")
        .max_attempts(0)
        .build_unchecked();
    assert!(matches!(
        crate::create_client(config),
        Err(LiteError::Configuration(
            ConfigurationError::InvalidConfiguration { .. }
        ))
    ));
}

#[test]
fn test_custom_base_url() {
    let config = LiteConfigBuilder::new()
        .credential("key", "secret")
        .base_url("http://localhost:8080")
        .unwrap()
        .build()
        .unwrap();
    let client = crate::create_client(config).unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080/");
}

#[tokio::test]
async fn test_requests_resolve_against_base_url() {
    let mock = Arc::new(MockHttpTransport::new().add_response(MockResponse::ok("[]")));
    let config = LiteConfigBuilder::new()
        .credential("key", "secret")
        .base_url("http://localhost:8080")
        .unwrap()
        .build_unchecked();
    let client = LiteClient::with_transport(config, mock.clone());

    let users = client
        .users()
        .list(ListUsersRequest::new().email("me@example.com"))
        .await
        .unwrap();

    assert!(users.is_empty());
    let sent = mock.last_request().unwrap();
    assert!(sent.url.starts_with("http://localhost:8080/lite/users?"));
    assert_eq!(sent.query_param("email"), Some("me@example.com"));
}

#[test]
fn test_client_verifies_decoded_callback() {
    let client = LiteClient::with_transport(
        LiteConfigBuilder::new()
            .credential("key", "s3cr3t")
            .build_unchecked(),
        Arc::new(MockHttpTransport::new()),
    );
    let callback = WebhookCallback::from_slice(
        br#"{
            "account_id": "u1",
            "webhook_id": "wh1",
            "token": "token123",
            "signature": "e179ee3b6ba5956e945fad9a204bda6a1eafcae6f905c944e4d268955958ee2e",
            "timestamp": 1700000000,
            "message_data": []
        }"#,
    )
    .unwrap();

    assert!(client.callback_verifier().verify(&callback));
}

#[test]
fn test_clones_share_configuration() {
    let client = LiteClient::with_transport(
        LiteConfigBuilder::new()
            .credential("key", "secret")
            .build_unchecked(),
        Arc::new(MockHttpTransport::new()),
    );
    let clone = client.clone();
    assert_eq!(clone.base_url(), client.base_url());
}
