//! Integration tests for folders and messages

use super::*;
use contextio_lite::prelude::*;
use contextio_lite::services::messages::MessageHeadersRequest;
use serde_json::json;
use wiremock::matchers::{body_string, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const ACCOUNT: &str = "/lite/users/u1/email_accounts/me%40example.com";

#[tokio::test]
async fn test_safe_create_creates_missing_folder() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/folders/Projects%2F2024", ACCOUNT)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/folders", ACCOUNT)))
        .and(query_param("include_names_only", "1"))
        .respond_with(success_response(json!([{ "name": "INBOX" }])))
        .mount(&server)
        .await;
    signed(Mock::given(method("POST")))
        .and(path(format!("{}/folders/Projects%2F2024", ACCOUNT)))
        .and(body_string("delimiter=%2F"))
        .respond_with(success_response(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    fail_unmatched(&server).await;

    let client = client_for(&server, RequestHooks::new());
    let created = client
        .folders()
        .safe_create(
            "u1",
            "me@example.com",
            "Projects/2024",
            DelimiterParams::delimiter("/"),
        )
        .await
        .unwrap();

    assert!(created);
}

#[tokio::test]
async fn test_safe_create_leaves_existing_folder() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/folders/INBOX", ACCOUNT)))
        .respond_with(success_response(json!({ "name": "INBOX" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(success_response(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, RequestHooks::new());
    let created = client
        .folders()
        .safe_create("u1", "me@example.com", "INBOX", DelimiterParams::new())
        .await
        .unwrap();

    assert!(!created);
}

#[tokio::test]
async fn test_move_message_uses_put_with_query() {
    let server = setup_mock_server().await;

    signed(Mock::given(method("PUT")))
        .and(path(format!(
            "{}/folders/INBOX/messages/%3Cabc%40mail.example.com%3E",
            ACCOUNT
        )))
        .and(query_param("new_folder_id", "Archive"))
        .respond_with(success_response(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, RequestHooks::new());
    client
        .messages()
        .move_message(
            "u1",
            "me@example.com",
            "INBOX",
            "<abc@mail.example.com>",
            MoveMessageRequest::new("Archive"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_raw_headers_come_back_as_text() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/folders/INBOX/messages/m1/headers", ACCOUNT)))
        .and(query_param("raw", "1"))
        .respond_with(success_response(json!({
            "resource_url": "r",
            "headers": "Subject: hello\r\nFrom: a@b.com\r\n"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, RequestHooks::new());
    let headers = client
        .messages()
        .headers(
            "u1",
            "me@example.com",
            "INBOX",
            "m1",
            MessageHeadersRequest::new().raw(),
        )
        .await
        .unwrap();

    assert!(headers.headers.raw().unwrap().starts_with("Subject: hello"));
}

#[tokio::test]
async fn test_raw_message_body_is_plain_text() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/folders/INBOX/messages/m1/raw", ACCOUNT)))
        .respond_with(ResponseTemplate::new(200).set_body_string("From: a@b.com\r\n\r\nhi"))
        .mount(&server)
        .await;

    let client = client_for(&server, RequestHooks::new());
    let raw = client
        .messages()
        .raw("u1", "me@example.com", "INBOX", "m1", DelimiterParams::new())
        .await
        .unwrap();

    assert!(raw.as_bytes().ends_with(b"hi"));
}
