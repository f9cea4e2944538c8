//! Records shared by several resources.

use crate::response::{Acknowledgement, OneOrMany};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Header name to one or more values
pub type MessageHeaders = BTreeMap<String, OneOrMany<String>>;

/// Status the service reports for a healthy email account
pub const ACCOUNT_STATUS_OK: &str = "OK";

/// Plain acknowledgement of a mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SuccessResponse {
    /// Whether the service applied the change
    #[serde(default)]
    pub success: bool,
    /// Resource URL, when returned
    #[serde(default)]
    pub resource_url: String,
}

impl Acknowledgement for SuccessResponse {
    fn success(&self) -> bool {
        self.success
    }
}

/// A mailbox address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Email address
    #[serde(default)]
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Extra details about a correspondent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetails {
    /// Avatar URL
    #[serde(default)]
    pub thumbnail: String,
}

/// Correspondent details keyed by email address
pub type PersonInfo = HashMap<String, PersonDetails>;

/// An email account linked to a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAccount {
    /// Account status, `OK` when healthy
    #[serde(default)]
    pub status: String,
    /// Account label used in paths
    #[serde(default)]
    pub label: String,
    /// Mail server host
    #[serde(default)]
    pub server: String,
    /// Login name, usually the email address
    #[serde(default)]
    pub username: String,
    /// Server type, e.g. `IMAP`
    #[serde(default, rename = "type")]
    pub account_type: String,
    /// `password` or `oauth`
    #[serde(default)]
    pub authentication_type: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// Whether TLS is used
    #[serde(default)]
    pub use_ssl: bool,
    /// Server port
    #[serde(default)]
    pub port: u16,
}

impl EmailAccount {
    /// Whether the account's login matches `email`, ignoring case
    pub fn matches_email(&self, email: &str) -> bool {
        self.username.eq_ignore_ascii_case(email)
    }

    /// Whether the service reports the account as healthy
    pub fn is_ok(&self) -> bool {
        self.status == ACCOUNT_STATUS_OK
    }
}

/// Find the account whose login matches `email`, ignoring case.
pub fn find_email_account_matching<'a>(
    accounts: &'a [EmailAccount],
    email: &str,
) -> Option<&'a EmailAccount> {
    accounts.iter().find(|a| a.matches_email(email))
}
