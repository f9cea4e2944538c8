//! One logical API call, before it becomes an HTTP request.

use super::codec::{encode_params, to_form_urlencoded};
use crate::errors::RequestError;
use crate::transport::HttpMethod;
use serde::Serialize;
use url::Url;

/// Method, resolved path, parameters and context tags for one call.
///
/// The path must already be interpolated and escaped (see
/// [`build_path`](super::path::build_path)). The user id and account label
/// are only passed to hooks; they never reach the wire on their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute path, e.g. `/lite/users/u1`
    pub path: String,
    /// Query string pairs
    pub query: Vec<(String, String)>,
    /// Form body pairs
    pub form: Vec<(String, String)>,
    /// User the call is about, if any
    pub user_id: Option<String>,
    /// Email account label the call is about, if any
    pub account_label: Option<String>,
}

impl RequestDescriptor {
    /// Create a descriptor with no parameters
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
            user_id: None,
            account_label: None,
        }
    }

    /// GET descriptor
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// POST descriptor
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// PUT descriptor
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// DELETE descriptor
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Encode `params` into the query string
    pub fn query<P: Serialize + ?Sized>(mut self, params: &P) -> Result<Self, RequestError> {
        self.query = encode_params(params)?;
        Ok(self)
    }

    /// Encode `params` into the form body
    pub fn form<P: Serialize + ?Sized>(mut self, params: &P) -> Result<Self, RequestError> {
        self.form = encode_params(params)?;
        Ok(self)
    }

    /// Tag the call with a user id
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Tag the call with an email account label
    pub fn account(mut self, label: impl Into<String>) -> Self {
        self.account_label = Some(label.into());
        self
    }

    /// Full URL against `base`, query string included.
    pub fn url(&self, base: &Url) -> Result<Url, RequestError> {
        let raw = format!("{}{}", base.as_str().trim_end_matches('/'), self.path);
        let mut url = Url::parse(&raw).map_err(|e| RequestError::InvalidUrl {
            message: format!("{}: {}", raw, e),
        })?;
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    /// Form-encoded body, if the call has form parameters.
    pub fn form_body(&self) -> Option<String> {
        if self.form.is_empty() {
            None
        } else {
            Some(to_form_urlencoded(&self.form))
        }
    }
}
