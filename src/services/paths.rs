//! Endpoint paths under `/lite/users`.

use crate::errors::RequestError;
use crate::request::{build_path, Segment};

pub(crate) const USERS_PATH: &str = "/lite/users";

pub(crate) fn user_path(user_id: &str) -> Result<String, RequestError> {
    build_path(&[Segment::Literal(USERS_PATH), Segment::Id(user_id)])
}

pub(crate) fn account_path(user_id: &str, label: &str) -> Result<String, RequestError> {
    build_path(&[
        Segment::Literal(USERS_PATH),
        Segment::Id(user_id),
        Segment::Literal("email_accounts"),
        Segment::Id(label),
    ])
}

pub(crate) fn folder_path(
    user_id: &str,
    label: &str,
    folder: &str,
) -> Result<String, RequestError> {
    child(
        account_path(user_id, label)?,
        &[Segment::Literal("folders"), Segment::Id(folder)],
    )
}

pub(crate) fn folder_message_path(
    user_id: &str,
    label: &str,
    folder: &str,
    message_id: &str,
) -> Result<String, RequestError> {
    child(
        folder_path(user_id, label, folder)?,
        &[Segment::Literal("messages"), Segment::Id(message_id)],
    )
}

/// `base` followed by more segments
pub(crate) fn child(base: String, segments: &[Segment<'_>]) -> Result<String, RequestError> {
    let mut path = base;
    path.push_str(&build_path(segments)?);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_paths_escape_each_identifier() {
        assert_eq!(user_path("u 1").unwrap(), "/lite/users/u%201");
        assert_eq!(
            account_path("u1", "me@example.com").unwrap(),
            "/lite/users/u1/email_accounts/me%40example.com"
        );
        assert_eq!(
            folder_message_path("u1", "work", "INBOX/Sub", "<id@mail>").unwrap(),
            "/lite/users/u1/email_accounts/work/folders/INBOX%2FSub/messages/%3Cid%40mail%3E"
        );
        assert_eq!(
            child(
                user_path("u1").unwrap(),
                &[Segment::Literal("webhooks"), Segment::Id("w/1")]
            )
            .unwrap(),
            "/lite/users/u1/webhooks/w%2F1"
        );
    }

    #[test]
    fn test_dot_segment_anywhere_fails_the_whole_path() {
        assert!(folder_path("u1", "work", "..").is_err());
        assert!(folder_path("u1", ".", "INBOX").is_err());
        assert!(folder_message_path("..", "work", "INBOX", "m1").is_err());
        assert!(folder_message_path("u1", "work", "INBOX", ".").is_err());
    }
}
