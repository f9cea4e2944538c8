//! Messages service.
//!
//! Account-wide message lookups, plus the per-folder message endpoints
//! (bodies, flags, headers, source, read state and attachments).

mod requests;
mod responses;
mod service;

pub use requests::*;
pub use responses::*;
pub use service::*;
