//! Uniform Resource Identifier ([RFC3986])
//!
//! [RFC3986]: <https://datatracker.ietf.org/doc/html/rfc3986>
//!
//! # Percent Encoding
//!
//! Path, query and fragment are always stored percent encoded. Already encoded sequences are
//! never encoded twice, and a literal `%` that does not start a valid sequence is encoded as
//! `%25`. User info and host are decoded when parsed from a string.
pub mod components;
mod uri;
mod parts;
mod resolve;
mod error;

pub use uri::{Uri, IntoUri};
pub(crate) use uri::into_uri;
pub use parts::UriParts;
pub use resolve::{resolve, remove_dot_segments, is_cross_origin};
pub use error::UriError;
