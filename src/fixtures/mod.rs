//! Test fixtures for Context.IO Lite API responses.
//!
//! Provides realistic payloads, including the `[]` placeholders the service
//! sends for empty objects.

use serde_json::{json, Value};

/// Email account fixtures
pub mod email_account_fixtures {
    use super::*;

    /// An IMAP account in the given status
    pub fn imap(label: &str, email: &str, status: &str) -> Value {
        json!({
            "status": status,
            "resource_url": format!("https://api.context.io/lite/users/u1/email_accounts/{}", label),
            "type": "imap",
            "authentication_type": "password",
            "use_ssl": true,
            "server": "imap.example.com",
            "label": label,
            "username": email,
            "port": 993
        })
    }

    /// A healthy IMAP account
    pub fn healthy(label: &str, email: &str) -> Value {
        imap(label, email, "OK")
    }
}

/// User fixtures
pub mod user_fixtures {
    use super::*;

    /// A user with the given accounts
    pub fn with_accounts(id: &str, accounts: Vec<Value>) -> Value {
        let emails: Vec<Value> = accounts
            .iter()
            .filter_map(|a| a.get("username").cloned())
            .collect();
        json!({
            "id": id,
            "username": format!("user_{}", id),
            "email_addresses": emails,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "resource_url": format!("https://api.context.io/lite/users/{}", id),
            "created": 1_700_000_000,
            "suspended": 0,
            "password_expired": 0,
            "email_accounts": accounts
        })
    }

    /// Successful user creation
    pub fn created(id: &str, label: &str) -> Value {
        json!({
            "success": true,
            "id": id,
            "resource_url": format!("https://api.context.io/lite/users/{}", id),
            "access_token": "at",
            "access_token_secret": "ats",
            "email_account": {
                "success": true,
                "label": label,
                "resource_url": format!("https://api.context.io/lite/users/{}/email_accounts/{}", id, label)
            }
        })
    }
}

/// Folder fixtures
pub mod folder_fixtures {
    use super::*;

    /// One folder
    pub fn folder(name: &str) -> Value {
        json!({
            "name": name,
            "symbolic_name": "",
            "nb_messages": 12,
            "nb_unseen_messages": 3,
            "delimiter": "/",
            "resource_url": format!("https://api.context.io/lite/users/u1/email_accounts/work/folders/{}", name)
        })
    }

    /// A names-only listing
    pub fn names(names: &[&str]) -> Value {
        Value::Array(names.iter().map(|n| json!({ "name": n })).collect())
    }
}

/// Message fixtures
pub mod message_fixtures {
    use super::*;

    /// A plain message with no attachments and empty person info
    pub fn simple(message_id: &str, subject: &str) -> Value {
        json!({
            "message_id": message_id,
            "subject": subject,
            "in_reply_to": "",
            "folders": ["INBOX"],
            "references": [],
            "received_headers": [],
            "list_headers": [],
            "addresses": {
                "from": [{"email": "sender@example.com", "name": "Sender"}],
                "to": [{"email": "me@example.com", "name": "Me"}]
            },
            "person_info": [],
            "attachments": [],
            "sent_at": 1_700_000_000,
            "received_at": 1_700_000_005
        })
    }

    /// A message with one attachment and parsed headers
    pub fn with_attachment(message_id: &str) -> Value {
        let mut message = simple(message_id, "Report attached");
        message["attachments"] = json!([{
            "type": "application/pdf",
            "file_name": "report.pdf",
            "body_section": "2",
            "content_disposition": "attachment",
            "message_id": message_id,
            "size": 2048,
            "attachment_id": 1,
            "x_attachment_id": "f_abc"
        }]);
        message["headers"] = json!({
            "Subject": ["Report attached"],
            "Received": ["by mx1", "by mx2"]
        });
        message
    }
}

/// Connect token fixtures
pub mod connect_token_fixtures {
    use super::*;

    /// A token that has not been redeemed
    pub fn unused(token: &str) -> Value {
        json!({
            "token": token,
            "email": "",
            "callback_url": "https://app.example.com/connected",
            "browser_redirect_url": format!("https://connect.context.io/{}", token),
            "used": 0,
            "expires": 1_700_086_400,
            "user": []
        })
    }

    /// A token redeemed for an account in the given status
    pub fn used(token: &str, email: &str, status: &str) -> Value {
        json!({
            "token": token,
            "email": email,
            "callback_url": "https://app.example.com/connected",
            "used": 1_700_000_100,
            "expires": false,
            "user": {
                "id": "u1",
                "email_addresses": [email],
                "created": 1_700_000_100,
                "email_accounts": [email_account_fixtures::imap("work", email, status)]
            }
        })
    }
}

/// Webhook fixtures
pub mod webhook_fixtures {
    use super::*;

    /// An active webhook
    pub fn active(webhook_id: &str) -> Value {
        json!({
            "callback_url": "https://hooks.example.com/in",
            "webhook_id": webhook_id,
            "filter_folder_added": "INBOX",
            "resource_url": format!("https://api.context.io/lite/webhooks/{}", webhook_id),
            "active": true,
            "failure": false,
            "include_body": false
        })
    }
}

/// Acknowledgement fixtures
pub fn success() -> Value {
    json!({ "success": true })
}

/// Failed acknowledgement with a reason
pub fn failure(feedback_code: &str) -> Value {
    json!({ "success": false, "feedback_code": feedback_code })
}
