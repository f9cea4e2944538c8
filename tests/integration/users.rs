//! Integration tests for users and email accounts

use super::*;
use contextio_lite::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_list_users_sends_signed_query() {
    let server = setup_mock_server().await;

    signed(Mock::given(method("GET")))
        .and(path("/lite/users"))
        .and(query_param("email", "me@example.com"))
        .and(query_param("status_ok", "1"))
        .respond_with(success_response(json!([{
            "id": "u1",
            "email_addresses": ["me@example.com"],
            "email_accounts": [{
                "label": "work",
                "username": "me@example.com",
                "status": "OK"
            }]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, RequestHooks::new());
    let users = client
        .users()
        .list(ListUsersRequest::new().email("me@example.com").status_ok(true))
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(
        users[0].email_account_matching("ME@example.com").unwrap().label,
        "work"
    );
}

#[tokio::test]
async fn test_authorization_header_shape() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/lite/users/u1"))
        .respond_with(success_response(json!({ "id": "u1" })))
        .mount(&server)
        .await;

    let client = client_for(&server, RequestHooks::new());
    client.users().get("u1").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(auth.starts_with("OAuth "));
    assert!(auth.contains(r#"oauth_consumer_key="test-key""#));
    assert!(auth.contains(r#"oauth_version="1.0""#));
    assert!(auth.contains("oauth_signature="));
    assert!(!auth.contains("test-secret"));
}

#[tokio::test]
async fn test_create_user_posts_form() {
    let server = setup_mock_server().await;

    signed(Mock::given(method("POST")))
        .and(path("/lite/users"))
        .and(body_string_contains("email=me%40example.com"))
        .and(body_string_contains("use_ssl=1"))
        .respond_with(success_response(json!({
            "success": true,
            "id": "u1",
            "email_account": { "success": true, "label": "work" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, RequestHooks::new());
    let created = client
        .users()
        .create(
            CreateUserRequest::new()
                .account("me@example.com", "imap.example.com", "me@example.com", true, 993)
                .password("pw"),
        )
        .await
        .unwrap();

    assert_eq!(created.id, "u1");
    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/x-www-form-urlencoded"
    );
}

#[tokio::test]
async fn test_retry_hook_recovers_from_server_error() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/lite/users/u1/email_accounts/work"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lite/users/u1/email_accounts/work"))
        .respond_with(success_response(json!({ "label": "work", "status": "OK" })))
        .mount(&server)
        .await;

    let client = client_for(&server, TracingHooks::new().into_hooks());
    let account = client.email_accounts().get("u1", "work").await.unwrap();

    assert!(account.is_ok());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_retry_budget_bounds_attempts() {
    let server = setup_mock_server().await;

    Mock::given(method("DELETE"))
        .and(path("/lite/users/u1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, TracingHooks::new().into_hooks());
    let err = client.users().delete("u1").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.payload(), Some("down"));
}

#[tokio::test]
async fn test_unsuccessful_acknowledgement_is_an_error() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/lite/users/u1"))
        .respond_with(success_response(json!({ "success": false })))
        .mount(&server)
        .await;

    let client = client_for(&server, RequestHooks::new());
    let err = client
        .users()
        .modify("u1", ModifyUserRequest::new("Ada", "Lovelace"))
        .await
        .unwrap_err();

    assert!(matches!(err, LiteError::Application { .. }));
}
