//! Integration tests for webhook registration and callbacks

use super::*;
use contextio_lite::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::Mock;

#[tokio::test]
async fn test_create_user_webhook() {
    let server = setup_mock_server().await;

    signed(Mock::given(method("POST")))
        .and(path("/lite/users/u1/webhooks"))
        .and(body_string_contains(
            "callback_url=https%3A%2F%2Fhooks.example.com%2Fin",
        ))
        .and(body_string_contains("include_body=1"))
        .respond_with(success_response(json!({
            "success": true,
            "webhook_id": "wh1",
            "resource_url": "r"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, RequestHooks::new());
    let created = client
        .webhooks()
        .create_for_user(
            "u1",
            CreateWebhookRequest::new("https://hooks.example.com/in").include_body("text/plain"),
        )
        .await
        .unwrap();

    assert_eq!(created.webhook_id, "wh1");
}

#[test]
fn test_callback_round_trip_through_client() {
    let config = LiteConfigBuilder::new()
        .credential("key", "s3cr3t")
        .build()
        .unwrap();
    let client = contextio_lite::create_client(config).unwrap();

    let payload = json!({
        "account_id": "u1",
        "webhook_id": "wh1",
        "token": "token123",
        "signature": "e179ee3b6ba5956e945fad9a204bda6a1eafcae6f905c944e4d268955958ee2e",
        "timestamp": 1_700_000_000,
        "message_data": {
            "message_id": "<abc@mail.example.com>",
            "subject": "hello",
            "addresses": { "from": { "email": "a@b.com", "name": "A" } },
            "person_info": []
        }
    });
    let callback = WebhookCallback::from_slice(payload.to_string().as_bytes()).unwrap();

    assert!(client.callback_verifier().verify(&callback));
    assert!(!client.validate_callback("token124", &callback.signature, callback.timestamp));
}
