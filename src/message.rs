//! HTTP Message.
//!
//! [`Message`] holds the parts shared by [`Request`][crate::request::Request] and
//! [`Response`][crate::response::Response], and [`HttpMessage`] provides the message operations
//! on all of them.
use std::sync::OnceLock;

use crate::body::Body;
use crate::error::Error;
use crate::headers::{self, AsHeaderName, HeaderMap, HeaderName, HeaderValue, IntoHeaderName};
use crate::headers::IntoHeaderValues;
use crate::http::ProtocolVersion;

/// Protocol version, headers and body of an HTTP message.
#[derive(Clone, Debug, Default)]
pub struct Message {
    version: ProtocolVersion,
    headers: HeaderMap,
    /// created on first access
    body: OnceLock<Body>,
}

impl Message {
    /// Create new empty [`Message`] with protocol version `1.1`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[inline]
    pub(crate) fn set_version(&mut self, version: ProtocolVersion) {
        self.version = version;
    }
}

/// Operations of an immutable HTTP message.
///
/// Every `with_*` method returns a modified copy, the receiver is never changed. On error nothing
/// is returned, so a partially modified message is never observable.
///
/// This trait is sealed and implemented for [`Message`] and every message type of this crate.
#[allow(private_bounds)]
pub trait HttpMessage: MessageParts + Clone {
    /// Returns the protocol version, e.g: `1.1`.
    #[inline]
    fn protocol_version(&self) -> &ProtocolVersion {
        &self.message().version
    }

    /// Returns a copy with the given protocol version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedProtocolVersion`] if the version is not supported.
    fn with_protocol_version(&self, version: &str) -> Result<Self, Error> {
        let version = ProtocolVersion::try_from_str(version)?;
        let mut new = self.clone();
        new.message_mut().version = version;
        Ok(new)
    }

    /// Returns all headers, `Host` is always the first one if present.
    #[inline]
    fn headers(&self) -> &HeaderMap {
        &self.message().headers
    }

    /// Returns `true` if header is present, case-insensitively.
    #[inline]
    fn has_header<K: AsHeaderName>(&self, name: K) -> bool {
        self.headers().contains_key(name)
    }

    /// Returns all values of a header, empty if not present.
    #[inline]
    fn header<K: AsHeaderName>(&self, name: K) -> &[HeaderValue] {
        self.headers().get_all(name)
    }

    /// Returns all values of a header joined with `", "`, empty string if not present.
    #[inline]
    fn header_line<K: AsHeaderName>(&self, name: K) -> String {
        self.headers().get_line(name)
    }

    /// Returns a copy with the header replaced by the given values.
    ///
    /// The header takes the casing of `name`.
    ///
    /// # Errors
    ///
    /// Returns error if the name or one of the values is invalid, or when setting more than one
    /// distinct `Host` value.
    fn with_header<N, V>(&self, name: N, values: V) -> Result<Self, Error>
    where
        N: IntoHeaderName,
        V: IntoHeaderValues,
    {
        let name = headers::into_header_name(name)?;
        let values = headers::into_header_values(values)?;
        let mut new = self.clone();
        new.message_mut().headers.insert(name.clone(), values)?;
        new.on_header_set(&name);
        Ok(new)
    }

    /// Returns a copy with the values appended to the header.
    ///
    /// The casing of an existing header name is kept.
    ///
    /// # Errors
    ///
    /// Same as [`with_header`][HttpMessage::with_header].
    fn with_added_header<N, V>(&self, name: N, values: V) -> Result<Self, Error>
    where
        N: IntoHeaderName,
        V: IntoHeaderValues,
    {
        let name = headers::into_header_name(name)?;
        let values = headers::into_header_values(values)?;
        let mut new = self.clone();
        new.message_mut().headers.append(name.clone(), values)?;
        new.on_header_set(&name);
        Ok(new)
    }

    /// Returns a copy without the header.
    ///
    /// Returns an unchanged copy if the header is not present.
    fn without_header<K: AsHeaderName>(&self, name: K) -> Self {
        let mut new = self.clone();
        let Some(name) = new.headers().get_name(&name).cloned() else {
            return new;
        };
        new.message_mut().headers.remove(&name);
        new.on_header_removed(&name);
        new
    }

    /// Returns the message body.
    ///
    /// An empty in memory body is created on first access if none is set.
    #[inline]
    fn body(&self) -> &Body {
        self.message().body.get_or_init(Body::empty)
    }

    /// Returns a copy with the given body.
    fn with_body(&self, body: Body) -> Self {
        let mut new = self.clone();
        if new.message().body.get() == Some(&body) {
            return new;
        }
        new.message_mut().body = OnceLock::from(body);
        new.on_body_replaced();
        new
    }
}

/// Access to the embedded [`Message`], with hooks for message types that keep derived state.
pub(crate) trait MessageParts {
    fn message(&self) -> &Message;

    fn message_mut(&mut self) -> &mut Message;

    fn on_header_set(&mut self, _name: &HeaderName) { }

    fn on_header_removed(&mut self, _name: &HeaderName) { }

    fn on_body_replaced(&mut self) { }
}

impl MessageParts for Message {
    #[inline]
    fn message(&self) -> &Message {
        self
    }

    #[inline]
    fn message_mut(&mut self) -> &mut Message {
        self
    }
}

impl HttpMessage for Message { }
