//! Request descriptors and the parameter codec.

pub mod codec;
pub mod descriptor;
pub mod path;

pub use codec::{encode_params, is_false, is_zero};
pub use descriptor::RequestDescriptor;
pub use path::{build_path, escape_segment, Segment};
