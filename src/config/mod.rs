//! Configuration management for the Context.IO Lite client.
//!
//! Supports configuration via:
//! - Explicit values
//! - Environment variables
//! - Builder pattern

use crate::errors::{ConfigurationError, LiteError, LiteResult};
use crate::hooks::RequestHooks;
use crate::resilience::RetryConfig;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// API key and secret issued by Context.IO
#[derive(Clone)]
pub struct Credential {
    key: String,
    secret: SecretString,
}

impl Credential {
    /// Create a new credential
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: SecretString::new(secret.into()),
        }
    }

    /// The consumer key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Expose the secret for signing
    pub(crate) fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }

    /// Whether both halves are present
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.secret.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({:?}, [REDACTED])", self.key)
    }
}

/// Configuration for the Context.IO Lite client
#[derive(Clone)]
pub struct LiteConfig {
    /// API key and secret
    pub(crate) credential: Option<Credential>,
    /// Base URL for API requests
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
    /// Retry budget and backoff
    pub retry: RetryConfig,
    /// Request hooks
    pub hooks: RequestHooks,
    /// User agent sent with every request
    pub user_agent: String,
}

impl std::fmt::Debug for LiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiteConfig")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("hooks", &self.hooks)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for LiteConfig {
    fn default() -> Self {
        Self {
            credential: None,
            base_url: default_base_url(),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
            hooks: RequestHooks::default(),
            user_agent: crate::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(crate::DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

impl LiteConfig {
    /// Create a new configuration builder
    pub fn builder() -> LiteConfigBuilder {
        LiteConfigBuilder::new()
    }

    /// Create configuration from environment variables
    pub fn from_env() -> LiteResult<Self> {
        let mut builder = LiteConfigBuilder::new();

        let key = std::env::var("CONTEXTIO_API_KEY").map_err(|e| {
            ConfigurationError::EnvVar(format!("CONTEXTIO_API_KEY: {}", e))
        })?;
        let secret = std::env::var("CONTEXTIO_API_SECRET").map_err(|e| {
            ConfigurationError::EnvVar(format!("CONTEXTIO_API_SECRET: {}", e))
        })?;
        builder = builder.credential(&key, &secret);

        if let Ok(url) = std::env::var("CONTEXTIO_BASE_URL") {
            builder = builder.base_url(&url)?;
        }

        if let Ok(timeout) = std::env::var("CONTEXTIO_TIMEOUT") {
            if let Ok(secs) = timeout.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(secs));
            }
        }

        if let Ok(attempts) = std::env::var("CONTEXTIO_MAX_ATTEMPTS") {
            if let Ok(n) = attempts.parse::<u32>() {
                builder = builder.max_attempts(n);
            }
        }

        builder.build()
    }

    /// Get the credential if set
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Validate the configuration
    pub fn validate(&self) -> LiteResult<()> {
        match &self.credential {
            Some(credential) if credential.is_complete() => {}
            _ => {
                return Err(LiteError::Configuration(
                    ConfigurationError::MissingCredential,
                ))
            }
        }

        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(LiteError::Configuration(
                ConfigurationError::InvalidConfiguration {
                    message: format!("Unsupported base URL scheme: {}", self.base_url.scheme()),
                },
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(LiteError::Configuration(
                ConfigurationError::InvalidConfiguration {
                    message: "max_attempts must be at least 1".to_string(),
                },
            ));
        }

        Ok(())
    }
}

/// Builder for LiteConfig
#[derive(Default)]
pub struct LiteConfigBuilder {
    config: LiteConfig,
}

impl LiteConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: LiteConfig::default(),
        }
    }

    /// Set the API key and secret
    pub fn credential(mut self, key: &str, secret: &str) -> Self {
        self.config.credential = Some(Credential::new(key, secret));
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: &str) -> Result<Self, ConfigurationError> {
        self.config.base_url =
            Url::parse(url).map_err(|e| ConfigurationError::InvalidConfiguration {
                message: format!("Invalid URL: {}", e),
            })?;
        Ok(self)
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry configuration
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set the maximum number of attempts per call
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    /// Set the request hooks
    pub fn hooks(mut self, hooks: RequestHooks) -> Self {
        self.config.hooks = hooks;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> LiteResult<LiteConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build the configuration without validation (for testing)
    pub fn build_unchecked(self) -> LiteConfig {
        self.config
    }
}
