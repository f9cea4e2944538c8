//! Response types for users service.

use crate::errors::{LiteError, LiteResult};
use crate::response::Acknowledgement;
use crate::services::email_accounts::CreateEmailAccountResponse;
use crate::types::{find_email_account_matching, EmailAccount};
use serde::Deserialize;

/// A Context.IO user
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct User {
    /// User id
    #[serde(default)]
    pub id: String,
    /// Username
    #[serde(default)]
    pub username: String,
    /// Addresses known for the user
    #[serde(default)]
    pub email_addresses: Vec<String>,
    /// First name
    #[serde(default)]
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// Linked email accounts
    #[serde(default)]
    pub email_accounts: Vec<EmailAccount>,
    /// Creation time (Unix)
    #[serde(default)]
    pub created: i64,
    /// Suspension time (Unix), zero if active
    #[serde(default)]
    pub suspended: i64,
    /// Password expiry time (Unix), zero if not expired
    #[serde(default)]
    pub password_expired: i64,
}

impl User {
    /// The linked account whose login matches `email`, ignoring case
    pub fn email_account_matching(&self, email: &str) -> LiteResult<&EmailAccount> {
        find_email_account_matching(&self.email_accounts, email).ok_or_else(|| {
            LiteError::EmailAccountNotFound {
                email: email.to_string(),
            }
        })
    }
}

/// Response from creating a user
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateUserResponse {
    /// Success indicator
    #[serde(default)]
    pub success: bool,
    /// New user id
    #[serde(default)]
    pub id: String,
    /// Account linked at creation time
    #[serde(default)]
    pub email_account: CreateEmailAccountResponse,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// Per-user access token
    #[serde(default)]
    pub access_token: String,
    /// Per-user access token secret
    #[serde(default)]
    pub access_token_secret: String,
    /// IMAP connection log, on failure
    #[serde(default)]
    pub connection_log: String,
    /// Failure reason code
    #[serde(default)]
    pub feedback_code: String,
}

impl Acknowledgement for CreateUserResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn failure_message(&self) -> Option<&str> {
        Some(self.feedback_code.as_str()).filter(|s| !s.is_empty())
    }
}
