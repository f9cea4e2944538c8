//! Resilience patterns for the Context.IO Lite client.

pub mod retry;

pub use retry::RetryConfig;
