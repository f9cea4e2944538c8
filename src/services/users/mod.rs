//! Users service for Context.IO Lite.
//!
//! Provides methods for managing users and their email accounts.

mod requests;
mod responses;
mod service;

pub use requests::*;
pub use responses::*;
pub use service::*;
