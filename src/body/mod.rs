//! HTTP Message Body.
//!
//! - [`Stream`] the capability a message body must provide
//! - [`Body`] shared handle to a stream, stored in messages
//! - [`MemoryStream`] in memory stream, the default body
//!
mod stream;
mod memory;
mod handle;

pub use stream::Stream;
pub use memory::MemoryStream;
pub use handle::Body;
