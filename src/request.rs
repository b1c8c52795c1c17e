//! HTTP Request.
use std::borrow::Cow;

use crate::common::ByteStr;
use crate::error::Error;
use crate::headers::{HeaderName, HeaderValue};
use crate::http::Method;
use crate::log::trace;
use crate::message::{HttpMessage, Message, MessageParts};
use crate::uri::{self, IntoUri, Uri};

/// HTTP Request.
///
/// The `Host` header follows the host of the [`Uri`]: it is set on construction and when the
/// [`Uri`] is replaced, and cannot be removed while the [`Uri`] has a host.
///
/// ```
/// use httpval::{HttpMessage, HttpRequest, request::Request};
///
/// let req = Request::new("get", "http://example.com:8080/path?q").unwrap();
/// assert_eq!(req.method(), "GET");
/// assert_eq!(req.header_line("host"), "example.com:8080");
/// assert_eq!(req.request_target(), "/path?q");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Request {
    message: Message,
    method: Method,
    target: Option<ByteStr>,
    uri: Uri,
}

impl Request {
    /// Create new [`Request`].
    ///
    /// The method is uppercased, and the `Host` header is set if the URI has a host.
    ///
    /// # Errors
    ///
    /// Returns error if the method or the URI is invalid.
    pub fn new<U: IntoUri>(method: &str, uri: U) -> Result<Self, Error> {
        let method = Method::try_from_str(method)?.to_uppercase();
        let mut req = Request {
            message: Message::new(),
            method,
            target: None,
            uri: uri::into_uri(uri)?,
        };
        req.update_host_header();
        Ok(req)
    }

    /// Set `Host` header from the URI, does nothing if the URI has no host.
    fn update_host_header(&mut self) {
        let host = self.uri.host();
        if host.is_empty() {
            return;
        }
        let value = match self.uri.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        };
        match HeaderValue::from_shared(ByteStr::from(value)) {
            Ok(value) => {
                trace!("setting Host header to {value}");
                self.message.headers_mut().set_host(value);
            }
            Err(_err) => {
                trace!("skipping Host header: {_err}");
            }
        }
    }
}

impl MessageParts for Request {
    #[inline]
    fn message(&self) -> &Message {
        &self.message
    }

    #[inline]
    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    fn on_header_removed(&mut self, name: &HeaderName) {
        if name.is_host() {
            self.update_host_header();
        }
    }
}

impl HttpMessage for Request { }

/// Operations of an immutable HTTP request.
///
/// This trait is sealed and implemented for [`Request`] and
/// [`ServerRequest`][crate::server_request::ServerRequest].
#[allow(private_bounds)]
pub trait HttpRequest: HttpMessage + RequestParts {
    /// Returns the request method.
    #[inline]
    fn method(&self) -> &Method {
        &self.request().method
    }

    /// Returns a copy with the given method.
    ///
    /// Unlike [`Request::new`], the casing of `method` is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMethod`] if the method is not a non-empty alphabetic string.
    fn with_method(&self, method: &str) -> Result<Self, Error> {
        let method = Method::try_from_str(method)?;
        let mut new = self.clone();
        new.request_mut().method = method;
        Ok(new)
    }

    /// Returns the request URI.
    #[inline]
    fn uri(&self) -> &Uri {
        &self.request().uri
    }

    /// Returns a copy with the given URI.
    ///
    /// The `Host` header is updated from the new URI if it has a host, unless `preserve_host` is
    /// `true` and the request already has a `Host` header.
    fn with_uri(&self, uri: Uri, preserve_host: bool) -> Self {
        let mut new = self.clone();
        let preserve = preserve_host && new.has_header("host");
        let req = new.request_mut();
        req.uri = uri;
        if !preserve {
            req.update_host_header();
        }
        new.on_uri_replaced();
        new
    }

    /// Returns the request target.
    ///
    /// If no request target is set, returns the origin-form built from the URI path and query,
    /// with `/` for an empty path.
    fn request_target(&self) -> Cow<'_, str> {
        let req = self.request();
        if let Some(target) = &req.target {
            return Cow::Borrowed(target.as_str());
        }
        let path = match req.uri.path() {
            "" => "/",
            path => path,
        };
        match req.uri.query() {
            "" => Cow::Borrowed(path),
            query => Cow::Owned(format!("{path}?{query}")),
        }
    }

    /// Returns a copy with the given request target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequestTarget`] if the target contains whitespace.
    fn with_request_target(&self, target: &str) -> Result<Self, Error> {
        if target.chars().any(char::is_whitespace) {
            return Err(Error::InvalidRequestTarget(ByteStr::copy_from_str(target)));
        }
        let mut new = self.clone();
        new.request_mut().target = Some(ByteStr::copy_from_str(target));
        Ok(new)
    }
}

/// Access to the embedded [`Request`].
pub(crate) trait RequestParts {
    fn request(&self) -> &Request;

    fn request_mut(&mut self) -> &mut Request;

    fn on_uri_replaced(&mut self) { }
}

impl RequestParts for Request {
    #[inline]
    fn request(&self) -> &Request {
        self
    }

    #[inline]
    fn request_mut(&mut self) -> &mut Request {
        self
    }
}

impl HttpRequest for Request { }

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    fn names(req: &Request) -> Vec<&str> {
        req.headers().iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn test_new() {
        let req = Request::new("post", "https://Example.com:443/a").unwrap();
        assert_eq!(req.method(), "POST");
        assert_eq!(req.header("Host"), ["example.com"]);
        assert_eq!(req.request_target(), "/a");

        let req = Request::new("GET", "").unwrap();
        assert!(req.headers().is_empty());
        assert_eq!(req.request_target(), "/");

        let req = Request::default();
        assert_eq!(req.method(), &Method::GET);

        let err = Request::new("G3T", "/").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMethod);
        let err = Request::new("GET", "http://a:99999").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUri);
    }

    #[test]
    fn test_with_method_preserves_case() {
        let req = Request::new("get", "/").unwrap();
        let new = req.with_method("patch").unwrap();
        assert_eq!(new.method(), "patch");
        assert_eq!(req.method(), "GET");
        assert_eq!(req.with_method("").unwrap_err().kind(), ErrorKind::InvalidMethod);
    }

    #[test]
    fn test_with_uri() {
        let req = Request::new("GET", "http://a.com/")
            .unwrap()
            .with_header("X-Foo", "bar")
            .unwrap();

        let new = req.with_uri(Uri::parse("http://b.com:8080/x").unwrap(), false);
        assert_eq!(new.header_line("Host"), "b.com:8080");
        assert_eq!(names(&new), ["Host", "X-Foo"]);
        assert_eq!(req.header_line("Host"), "a.com");

        let new = req.with_uri(Uri::parse("http://b.com/").unwrap(), true);
        assert_eq!(new.header_line("Host"), "a.com");
        assert_eq!(new.uri().host(), "b.com");

        // empty host keeps the existing Host header
        let new = req.with_uri(Uri::parse("/path").unwrap(), false);
        assert_eq!(new.header_line("Host"), "a.com");

        let bare = Request::new("GET", "/").unwrap();
        let new = bare.with_uri(Uri::parse("http://c.com/").unwrap(), true);
        assert_eq!(new.header_line("Host"), "c.com");
    }

    #[test]
    fn test_host_survives_removal() {
        let req = Request::new("GET", "http://a.com/").unwrap();
        let new = req.without_header("host");
        assert_eq!(new.header_line("Host"), "a.com");

        let req = Request::new("GET", "/").unwrap().with_header("Host", "a.com").unwrap();
        assert!(!req.without_header("HOST").has_header("Host"));
    }

    #[test]
    fn test_request_target() {
        let req = Request::new("GET", "http://a.com/p?q=1#f").unwrap();
        assert_eq!(req.request_target(), "/p?q=1");

        let new = req.with_request_target("*").unwrap();
        assert_eq!(new.request_target(), "*");
        assert_eq!(req.request_target(), "/p?q=1");

        let err = req.with_request_target("/a b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequestTarget);
        let err = req.with_request_target("/a\tb").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequestTarget);
    }
}
