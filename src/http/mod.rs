//! HTTP Protocol values.
mod method;
mod status;
mod version;

pub use method::Method;
pub use status::{StatusCode, IntoStatusCode};
pub use version::ProtocolVersion;

pub(crate) use status::into_status_code;
