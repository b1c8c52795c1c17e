//! HTTP Header Multimap.
mod name;
mod value;
mod map;
mod iter;
mod error;

pub use name::{HeaderName, IntoHeaderName, standard};
pub use value::{HeaderValue, IntoHeaderValues};
pub use map::{HeaderMap, AsHeaderName};
pub use iter::Iter;
pub use error::HeaderError;

pub(crate) use value::into_header_values;
pub(crate) use name::into_header_name;

#[cfg(test)]
mod test;
