//! Immutable HTTP Message, URI and Header values.
//!
//! Every modification returns a new value, the receiver is never changed.
//!
//! ```
//! use httpval::{HttpMessage, HttpRequest, Request};
//!
//! let req = Request::new("get", "http://example.com:8080/users?id=1").unwrap();
//! assert_eq!(req.method(), "GET");
//! assert_eq!(req.header_line("Host"), "example.com:8080");
//! assert_eq!(req.request_target(), "/users?id=1");
//!
//! let new = req.with_header("Accept", ["text/html", "application/json"]).unwrap();
//! assert_eq!(new.header_line("accept"), "text/html, application/json");
//! assert!(!req.has_header("Accept"));
//! ```
#![warn(missing_debug_implementations)]

mod matches;
mod log;

pub mod common;
pub mod uri;
pub mod headers;
pub mod http;
pub mod body;
pub mod message;
pub mod request;
pub mod response;
pub mod server_request;
mod error;

pub use common::ByteStr;
pub use uri::Uri;
pub use body::Body;
pub use message::{HttpMessage, Message};
pub use request::{HttpRequest, Request};
pub use response::Response;
pub use server_request::ServerRequest;
pub use error::{Error, ErrorKind};
