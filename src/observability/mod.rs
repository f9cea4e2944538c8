//! Observability helpers: redaction and tracing-backed hooks.

pub mod hooks;
pub mod logging;

pub use hooks::TracingHooks;
pub use logging::{redact_params, redact_url, Redacted};
