//! Service tests against the mock transport.

use crate::client::LiteClient;
use crate::config::LiteConfigBuilder;
use crate::errors::{ConnectTokenError, LiteError, RequestError};
use crate::fixtures::{
    connect_token_fixtures, email_account_fixtures, failure, folder_fixtures, message_fixtures,
    success, user_fixtures, webhook_fixtures,
};
use crate::mocks::{MockHttpTransport, MockResponse};
use crate::services::app::{AppServiceTrait, CreateStatusCallbackUrlRequest};
use crate::services::connect_tokens::ConnectTokensServiceTrait;
use crate::services::discovery::{DiscoveryRequest, DiscoveryServiceTrait};
use crate::services::email_accounts::{
    EmailAccountsServiceTrait, ListEmailAccountsRequest, ModifyEmailAccountRequest,
};
use crate::services::folders::{DelimiterParams, FoldersServiceTrait};
use crate::services::messages::{
    AttachmentRequest, GetMessageRequest, IncludeHeaders, ListMessagesRequest,
    MessageHeadersRequest, MessagesServiceTrait, MoveMessageRequest,
};
use crate::services::oauth_providers::OAuthProvidersServiceTrait;
use crate::services::users::{CreateUserRequest, ModifyUserRequest, UsersServiceTrait};
use crate::services::webhooks::{CreateWebhookRequest, ModifyWebhookRequest, WebhooksServiceTrait};
use crate::transport::HttpMethod;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn client(mock: MockHttpTransport) -> (LiteClient, Arc<MockHttpTransport>) {
    let mock = Arc::new(mock);
    let config = LiteConfigBuilder::new()
        .credential("key", "secret")
        .build_unchecked();
    (LiteClient::with_transport(config, mock.clone()), mock)
}

fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_string(), v.to_string())
}

#[tokio::test]
async fn test_safe_create_skips_folder_found_by_lookup() {
    let mock = MockHttpTransport::new().add_json_response(&folder_fixtures::folder("Receipts"));
    let (client, mock) = client(mock);

    let created = client
        .folders()
        .safe_create("u1", "work", "Receipts", DelimiterParams::new())
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(mock.count_method(HttpMethod::Post), 0);
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_safe_create_skips_folder_found_by_listing() {
    let mock = MockHttpTransport::new()
        .add_response(MockResponse::status(404, r#"{"type":"error"}"#))
        .add_json_response(&folder_fixtures::names(&["INBOX", "Receipts"]));
    let (client, mock) = client(mock);

    let created = client
        .folders()
        .safe_create("u1", "work", "Receipts", DelimiterParams::new())
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(mock.count_method(HttpMethod::Post), 0);
    let listing = mock.last_request().unwrap();
    assert_eq!(listing.path, "/lite/users/u1/email_accounts/work/folders");
    assert_eq!(listing.query_param("include_names_only"), Some("1"));
}

#[tokio::test]
async fn test_safe_create_creates_missing_folder_once() {
    let mock = MockHttpTransport::new()
        .add_response(MockResponse::status(404, ""))
        .add_json_response(&folder_fixtures::names(&["INBOX"]))
        .add_json_response(&success());
    let (client, mock) = client(mock);

    let created = client
        .folders()
        .safe_create("u1", "work", "Projects/2024", DelimiterParams::delimiter("/"))
        .await
        .unwrap();

    assert!(created);
    assert_eq!(mock.count_method(HttpMethod::Post), 1);
    let create = mock.last_request().unwrap();
    assert_eq!(
        create.path,
        "/lite/users/u1/email_accounts/work/folders/Projects%2F2024"
    );
    assert_eq!(create.form(), vec![pair("delimiter", "/")]);
}

#[tokio::test]
async fn test_safe_create_surfaces_unsuccessful_creation() {
    let mock = MockHttpTransport::new()
        .add_json_response(&folder_fixtures::folder("Other"))
        .add_json_response(&folder_fixtures::names(&[]))
        .add_response(MockResponse::unsuccessful());
    let (client, mock) = client(mock);

    let err = client
        .folders()
        .safe_create("u1", "work", "Receipts", DelimiterParams::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LiteError::Application {
            operation: "folders.create",
            ..
        }
    ));
    assert_eq!(mock.count_method(HttpMethod::Post), 1);
}

#[tokio::test]
async fn test_safe_create_propagates_status_error_from_create() {
    let mock = MockHttpTransport::new()
        .add_response(MockResponse::status(404, ""))
        .add_response(MockResponse::status(500, ""))
        .add_response(MockResponse::status(409, "exists"));
    let (client, mock) = client(mock);

    let err = client
        .folders()
        .safe_create("u1", "work", "Receipts", DelimiterParams::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(mock.count_method(HttpMethod::Post), 1);
}

#[tokio::test]
async fn test_create_user_with_account() {
    let mock = MockHttpTransport::new().add_json_response(&user_fixtures::created("u1", "work"));
    let (client, mock) = client(mock);

    let request = CreateUserRequest::new()
        .account("me@example.com", "imap.example.com", "me@example.com", true, 993)
        .password("hunter2");
    let response = client.users().create(request).await.unwrap();

    assert_eq!(response.id, "u1");
    assert_eq!(response.email_account.label, "work");

    let sent = mock.last_request().unwrap();
    assert_eq!(sent.method, HttpMethod::Post);
    assert_eq!(sent.path, "/lite/users");
    let form = sent.form();
    assert!(form.contains(&pair("email", "me@example.com")));
    assert!(form.contains(&pair("use_ssl", "1")));
    assert!(form.contains(&pair("port", "993")));
    assert!(form.contains(&pair("password", "hunter2")));
    assert!(!form.iter().any(|(k, _)| k == "first_name"));
}

#[tokio::test]
async fn test_create_user_failure_carries_feedback_code() {
    let mock = MockHttpTransport::new().add_json_response(&failure("invalid_credentials"));
    let (client, _) = client(mock);

    let err = client.users().create(CreateUserRequest::new()).await.unwrap_err();

    match err {
        LiteError::Application { operation, message } => {
            assert_eq!(operation, "users.create");
            assert_eq!(message, "invalid_credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_user_email_account_matching() {
    let user = user_fixtures::with_accounts(
        "u1",
        vec![
            email_account_fixtures::healthy("work", "me@work.com"),
            email_account_fixtures::healthy("home", "me@home.com"),
        ],
    );
    let mock = MockHttpTransport::new().add_json_response(&user);
    let (client, mock) = client(mock);

    let user = client.users().get("u1").await.unwrap();

    assert_eq!(user.email_account_matching("ME@HOME.COM").unwrap().label, "home");
    assert!(matches!(
        user.email_account_matching("other@x.com"),
        Err(LiteError::EmailAccountNotFound { .. })
    ));
    assert_eq!(mock.last_request().unwrap().path, "/lite/users/u1");
}

#[tokio::test]
async fn test_list_email_accounts_filters() {
    let mock = MockHttpTransport::new().add_json_response(&vec![
        email_account_fixtures::healthy("work", "me@work.com"),
    ]);
    let (client, mock) = client(mock);

    let accounts = client
        .email_accounts()
        .list("u1", ListEmailAccountsRequest::new().status_ok(true))
        .await
        .unwrap();

    assert_eq!(accounts.len(), 1);
    assert!(accounts[0].is_ok());
    let sent = mock.last_request().unwrap();
    assert_eq!(sent.path, "/lite/users/u1/email_accounts");
    assert_eq!(sent.query, vec![pair("status_ok", "1")]);
}

#[tokio::test]
async fn test_list_messages_with_options() {
    let mock = MockHttpTransport::new().add_json_response(&vec![
        message_fixtures::simple("<a@x>", "first"),
        message_fixtures::with_attachment("<b@x>"),
    ]);
    let (client, mock) = client(mock);

    let request = ListMessagesRequest::new()
        .message(GetMessageRequest::new().include_headers(IncludeHeaders::Parsed))
        .limit(2);
    let messages = client.messages().list("u1", "work", request).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert!(messages[0].person_info.is_empty());
    assert_eq!(messages[1].attachments[0].file_name, "report.pdf");
    assert!(messages[1].headers.structured().is_some());

    let sent = mock.last_request().unwrap();
    assert_eq!(sent.path, "/lite/users/u1/email_accounts/work/messages");
    assert_eq!(sent.query_param("include_headers"), Some("1"));
    assert_eq!(sent.query_param("limit"), Some("2"));
}

#[tokio::test]
async fn test_get_message_in_folder_escapes_identifiers() {
    let mock = MockHttpTransport::new().add_json_response(&message_fixtures::simple("<a@x>", "hi"));
    let (client, mock) = client(mock);

    let message = client
        .messages()
        .get_in_folder("u1", "work", "INBOX/Sub", "<a@x>", GetMessageRequest::new())
        .await
        .unwrap();

    assert_eq!(message.subject, "hi");
    assert_eq!(
        mock.last_request().unwrap().path,
        "/lite/users/u1/email_accounts/work/folders/INBOX%2FSub/messages/%3Ca%40x%3E"
    );
}

#[tokio::test]
async fn test_move_message_uses_put() {
    let mock = MockHttpTransport::new().add_json_response(&success());
    let (client, mock) = client(mock);

    client
        .messages()
        .move_message(
            "u1",
            "work",
            "INBOX",
            "m1",
            MoveMessageRequest::new("Archive"),
        )
        .await
        .unwrap();

    let sent = mock.last_request().unwrap();
    assert_eq!(sent.method, HttpMethod::Put);
    assert_eq!(sent.query_param("new_folder_id"), Some("Archive"));
}

#[tokio::test]
async fn test_mark_read_and_unread() {
    let mock = MockHttpTransport::new()
        .add_json_response(&success())
        .add_json_response(&success());
    let (client, mock) = client(mock);

    client
        .messages()
        .mark_read("u1", "work", "INBOX", "m1", DelimiterParams::new())
        .await
        .unwrap();
    client
        .messages()
        .mark_unread("u1", "work", "INBOX", "m1", DelimiterParams::delimiter("."))
        .await
        .unwrap();

    let requests = mock.recorded_requests();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[1].method, HttpMethod::Delete);
    assert!(requests[1].path.ends_with("/messages/m1/read"));
    assert_eq!(requests[1].form(), vec![pair("delimiter", ".")]);
}

#[tokio::test]
async fn test_raw_headers_and_attachment_link() {
    let mock = MockHttpTransport::new()
        .add_response(MockResponse::ok(
            r#"{"resource_url": "r", "headers": "Subject: hi\r\n"}"#,
        ))
        .add_response(MockResponse::ok("https://files.example.com/a.pdf?sig=1"));
    let (client, mock) = client(mock);

    let headers = client
        .messages()
        .headers("u1", "work", "INBOX", "m1", MessageHeadersRequest::new().raw())
        .await
        .unwrap();
    assert_eq!(headers.headers.raw(), Some("Subject: hi\r\n"));

    let attachment = client
        .messages()
        .attachment("u1", "work", "INBOX", "m1", "1", AttachmentRequest::new().as_link())
        .await
        .unwrap();
    assert_eq!(attachment.link(), Some("https://files.example.com/a.pdf?sig=1"));

    let requests = mock.recorded_requests();
    assert_eq!(requests[0].query_param("raw"), Some("1"));
    assert_eq!(requests[1].query_param("as_link"), Some("1"));
    assert!(requests[1].path.ends_with("/messages/m1/attachments/1"));
}

#[tokio::test]
async fn test_connect_token_check() {
    let mock = MockHttpTransport::new()
        .add_json_response(&connect_token_fixtures::used("tok", "me@example.com", "OK"))
        .add_json_response(&connect_token_fixtures::unused("tok2"))
        .add_json_response(&connect_token_fixtures::used(
            "tok3",
            "me@example.com",
            "INVALID_CREDENTIALS",
        ));
    let (client, mock) = client(mock);
    let tokens = client.connect_tokens();

    let used = tokens.get_for_user("u1", "tok").await.unwrap();
    assert!(tokens.check(&used, "me@example.com").is_ok());
    assert!(matches!(
        tokens.check(&used, "someone@else.com"),
        Err(LiteError::ConnectToken(ConnectTokenError::AccountMissing { .. }))
    ));

    let unused = tokens.get("tok2").await.unwrap();
    assert!(matches!(
        tokens.check(&unused, "me@example.com"),
        Err(LiteError::ConnectToken(ConnectTokenError::NotUsed { .. }))
    ));

    let unhealthy = tokens.get_for_account("u1", "work", "tok3").await.unwrap();
    assert!(matches!(
        tokens.check(&unhealthy, "me@example.com"),
        Err(LiteError::ConnectToken(ConnectTokenError::AccountNotOk { .. }))
    ));

    let paths: Vec<String> = mock.recorded_requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/lite/users/u1/connect_tokens/tok".to_string(),
            "/lite/connect_tokens/tok2".to_string(),
            "/lite/users/u1/email_accounts/work/connect_tokens/tok3".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_webhooks_app_and_user_level() {
    let mock = MockHttpTransport::new()
        .add_json_response(&vec![webhook_fixtures::active("wh1")])
        .add_response(MockResponse::ok(
            r#"{"success": true, "webhook_id": "wh2", "resource_url": "r"}"#,
        ))
        .add_json_response(&success());
    let (client, mock) = client(mock);

    let hooks = client.webhooks().list().await.unwrap();
    assert!(hooks[0].active);

    let created = client
        .webhooks()
        .create_for_user(
            "u1",
            CreateWebhookRequest::new("https://hooks.example.com/in").filter_folder_added("INBOX"),
        )
        .await
        .unwrap();
    assert_eq!(created.webhook_id, "wh2");

    client
        .webhooks()
        .modify_for_user("u1", "wh2", ModifyWebhookRequest::deactivate())
        .await
        .unwrap();

    let requests = mock.recorded_requests();
    assert_eq!(requests[0].path, "/lite/webhooks");
    assert_eq!(requests[1].path, "/lite/users/u1/webhooks");
    assert!(requests[1]
        .form()
        .contains(&pair("filter_folder_added", "INBOX")));
    assert_eq!(requests[2].method, HttpMethod::Post);
    assert_eq!(requests[2].path, "/lite/users/u1/webhooks/wh2");
    assert_eq!(requests[2].form(), vec![pair("active", "0")]);
}

#[tokio::test]
async fn test_app_status_callback_url() {
    let mock = MockHttpTransport::new()
        .add_response(MockResponse::ok(
            r#"{"status_callback_url": "https://app.example.com/status", "resource_url": "r"}"#,
        ))
        .add_json_response(&success())
        .add_json_response(&failure(""));
    let (client, mock) = client(mock);

    let current = client.app().get_status_callback_url().await.unwrap();
    assert_eq!(current.status_callback_url, "https://app.example.com/status");

    client
        .app()
        .create_status_callback_url(CreateStatusCallbackUrlRequest::new(
            "https://app.example.com/status2",
        ))
        .await
        .unwrap();

    let err = client.app().delete_status_callback_url().await.unwrap_err();
    assert!(matches!(err, LiteError::Application { .. }));

    let requests = mock.recorded_requests();
    assert!(requests.iter().all(|r| r.path == "/app/status_callback_url"));
    assert_eq!(requests[2].method, HttpMethod::Delete);
}

#[tokio::test]
async fn test_discovery_and_oauth_providers() {
    let mock = MockHttpTransport::new()
        .add_response(MockResponse::ok(
            r#"{"email": "me@gmail.com", "found": true, "type": "gmail", "imap": {"server": "imap.gmail.com", "port": 993, "use_ssl": true, "oauth": true}}"#,
        ))
        .add_json_response(&success());
    let (client, mock) = client(mock);

    let discovered = client
        .discovery()
        .get(DiscoveryRequest::new("me@gmail.com"))
        .await
        .unwrap();
    assert!(discovered.found);
    assert_eq!(discovered.imap.port, 993);

    client.oauth_providers().delete("ck/1").await.unwrap();

    let requests = mock.recorded_requests();
    assert_eq!(requests[0].path, "/lite/discovery");
    assert_eq!(requests[0].query_param("email"), Some("me@gmail.com"));
    assert_eq!(requests[1].path, "/lite/oauth_providers/ck%2F1");
}

fn assert_dot_segment_rejected<T: std::fmt::Debug>(result: Result<T, LiteError>, segment: &str) {
    match result.unwrap_err() {
        LiteError::Request(RequestError::InvalidPathSegment { segment: rejected }) => {
            assert_eq!(rejected, segment)
        }
        other => panic!("expected InvalidPathSegment, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dot_segments_never_reach_the_transport() {
    let mock = MockHttpTransport::new().with_default_response(MockResponse::json(&success()));
    let (client, mock) = client(mock);

    assert_dot_segment_rejected(client.users().delete("..").await, "..");
    assert_dot_segment_rejected(
        client
            .users()
            .modify(".", ModifyUserRequest::new("Ada", "Lovelace"))
            .await,
        ".",
    );
    assert_dot_segment_rejected(
        client
            .email_accounts()
            .modify("u1", "..", ModifyEmailAccountRequest::new().force_status_check())
            .await,
        "..",
    );
    assert_dot_segment_rejected(client.email_accounts().delete("u1", "..").await, "..");
    assert_dot_segment_rejected(
        client
            .folders()
            .safe_create("u1", "work", "..", DelimiterParams::new())
            .await,
        "..",
    );
    assert_dot_segment_rejected(
        client
            .messages()
            .move_message("u1", "work", "INBOX", ".", MoveMessageRequest::new("Archive"))
            .await,
        ".",
    );
    assert_dot_segment_rejected(
        client
            .messages()
            .mark_read("u1", "work", "..", "m1", DelimiterParams::new())
            .await,
        "..",
    );
    assert_dot_segment_rejected(client.webhooks().delete("..").await, "..");
    assert_dot_segment_rejected(
        client
            .webhooks()
            .modify_for_user("u1", ".", ModifyWebhookRequest::deactivate())
            .await,
        ".",
    );
    assert_dot_segment_rejected(client.connect_tokens().delete_for_user("u1", "..").await, "..");
    assert_dot_segment_rejected(
        client
            .connect_tokens()
            .delete_for_account("..", "work", "tok")
            .await,
        "..",
    );
    assert_dot_segment_rejected(client.oauth_providers().delete("..").await, "..");

    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_mutating_endpoints_escape_reserved_characters() {
    let mock = MockHttpTransport::new().with_default_response(MockResponse::json(&success()));
    let (client, mock) = client(mock);

    client
        .users()
        .modify("u 1", ModifyUserRequest::new("Ada", "Lovelace"))
        .await
        .unwrap();
    client.users().delete("u/1").await.unwrap();
    client
        .email_accounts()
        .delete("u1", "me@example.com")
        .await
        .unwrap();
    client
        .messages()
        .mark_read("u1", "work", "Work/Receipts", "<m1@example.com>", DelimiterParams::new())
        .await
        .unwrap();
    client
        .webhooks()
        .modify_for_user("u1", "w/1", ModifyWebhookRequest::activate())
        .await
        .unwrap();
    client.webhooks().delete("w?1").await.unwrap();
    client
        .connect_tokens()
        .delete_for_account("u1", "me@example.com", "t/1")
        .await
        .unwrap();
    client.oauth_providers().delete("a#b").await.unwrap();

    let paths: Vec<(HttpMethod, String)> = mock
        .recorded_requests()
        .into_iter()
        .map(|request| (request.method, request.path))
        .collect();
    assert_eq!(
        paths,
        vec![
            (HttpMethod::Post, "/lite/users/u%201".to_string()),
            (HttpMethod::Delete, "/lite/users/u%2F1".to_string()),
            (
                HttpMethod::Delete,
                "/lite/users/u1/email_accounts/me%40example.com".to_string()
            ),
            (
                HttpMethod::Post,
                "/lite/users/u1/email_accounts/work/folders/Work%2FReceipts/messages/%3Cm1%40example.com%3E/read"
                    .to_string()
            ),
            (HttpMethod::Post, "/lite/users/u1/webhooks/w%2F1".to_string()),
            (HttpMethod::Delete, "/lite/webhooks/w%3F1".to_string()),
            (
                HttpMethod::Delete,
                "/lite/users/u1/email_accounts/me%40example.com/connect_tokens/t%2F1".to_string()
            ),
            (HttpMethod::Delete, "/lite/oauth_providers/a%23b".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_raw_message_keeps_non_utf8_bytes() {
    let body: &'static [u8] = b"Subject: caf\xe9\r\n\r\nd\xe9j\xe0 vu";
    let mock = MockHttpTransport::new().add_response(MockResponse::bytes(200, body));
    let (client, _) = client(mock);

    let raw = client
        .messages()
        .raw("u1", "work", "INBOX", "m1", DelimiterParams::new())
        .await
        .unwrap();

    assert_eq!(raw.as_bytes(), body);
    assert_eq!(raw.to_str(), None);
}

#[tokio::test]
async fn test_attachment_body_starting_with_bracket_stays_raw() {
    let mock = MockHttpTransport::new().add_response(MockResponse::ok("[1,2,3]"));
    let (client, _) = client(mock);

    let attachment = client
        .messages()
        .attachment("u1", "work", "INBOX", "m1", "1", AttachmentRequest::new())
        .await
        .unwrap();

    assert_eq!(attachment.raw(), Some(&b"[1,2,3]"[..]));
    assert!(attachment.metadata().is_none());
}
