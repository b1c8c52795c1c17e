use std::borrow::Cow;

use super::UriError;
use super::components::{
    assert_port, assert_scheme, create_uri_path, filter_host, filter_password, filter_path,
    filter_query_and_fragment, filter_user, is_standard_port, lowercase, percent_decode,
};
use crate::common::ByteStr;
use crate::log::debug;

/// URI Generic Syntax ([RFC3986])
///
/// [RFC3986]: <https://datatracker.ietf.org/doc/html/rfc3986>
///
/// # Syntax Component
///
/// ```not_rust
///   foo://user@example.com:8042/over/there?name=ferret#nose
///   \_/   \___________________/\_________/ \_________/ \__/
///    |              |              |            |        |
/// scheme        authority        path         query   fragment
/// ```
///
/// `Uri` is immutable, every `with_*` method returns a new `Uri`, leaving the receiver untouched.
/// Components are stored normalized: scheme and host are lowercase, path, query and fragment are
/// percent encoded.
///
/// ```
/// use httpval::uri::Uri;
///
/// let uri = Uri::parse("HTTP://Example.COM:80/a b?q#f").unwrap();
/// assert_eq!(uri.host(), "example.com");
/// assert_eq!(uri.port(), None);
/// assert_eq!(uri.to_string(), "http://example.com/a%20b?q#f");
/// ```
#[derive(Clone, Default)]
pub struct Uri {
    scheme: ByteStr,
    user_info: ByteStr,
    host: ByteStr,
    port: Option<u16>,
    path: ByteStr,
    query: ByteStr,
    fragment: ByteStr,
}

impl Uri {
    /// Create new empty [`Uri`].
    #[inline]
    pub const fn new() -> Uri {
        Uri {
            scheme: ByteStr::new(),
            user_info: ByteStr::new(),
            host: ByteStr::new(),
            port: None,
            path: ByteStr::new(),
            query: ByteStr::new(),
            fragment: ByteStr::new(),
        }
    }

    /// Parse a URI reference.
    ///
    /// User info and host are percent decoded, then every component is normalized the same way
    /// the corresponding `with_*` method does.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidUri`] if the string cannot be parsed or any of its component is
    /// invalid.
    pub fn parse(input: &str) -> Result<Uri, UriError> {
        let source = ByteStr::copy_from_str(input);
        match parse_shared(&source) {
            Ok(uri) => Ok(uri),
            Err(_err) => {
                debug!("unable to parse uri {input:?}: {_err}");
                Err(UriError::InvalidUri(source))
            }
        }
    }
}

// ===== Getters =====

impl Uri {
    /// Returns the lowercase scheme, empty if not present.
    #[inline]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the percent encoded `user[:password]`, empty if not present.
    #[inline]
    pub fn user_info(&self) -> &str {
        &self.user_info
    }

    /// Returns the lowercase host, empty if not present.
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port, `None` if absent or standard for the current scheme.
    #[inline]
    pub fn port(&self) -> Option<u16> {
        match self.port {
            Some(port) if !is_standard_port(&self.scheme, port) => Some(port),
            _ => None,
        }
    }

    /// Returns the percent encoded path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the percent encoded query without the leading `?`.
    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the percent encoded fragment without the leading `#`.
    #[inline]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Returns `[user-info@]host[:port]`.
    ///
    /// Returns empty string if host is empty.
    pub fn authority(&self) -> Cow<'_, str> {
        if self.host.is_empty() {
            return Cow::Borrowed("");
        }
        match (self.user_info.is_empty(), self.port()) {
            (true, None) => Cow::Borrowed(&self.host),
            (true, Some(port)) => Cow::Owned(format!("{}:{port}", self.host)),
            (false, None) => Cow::Owned(format!("{}@{}", self.user_info, self.host)),
            (false, Some(port)) => {
                Cow::Owned(format!("{}@{}:{port}", self.user_info, self.host))
            }
        }
    }

    /// Returns `true` if all components are empty.
    pub fn is_empty(&self) -> bool {
        self.scheme.is_empty()
            && self.host.is_empty()
            && self.path.is_empty()
            && self.query.is_empty()
            && self.fragment.is_empty()
    }
}

// ===== Modifiers =====

impl Uri {
    /// Returns a new [`Uri`] with given scheme, lowercased.
    ///
    /// Empty scheme removes the scheme.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidScheme`] if the scheme is invalid.
    pub fn with_scheme(&self, scheme: &str) -> Result<Uri, UriError> {
        assert_scheme(scheme)?;
        Ok(Uri {
            scheme: ByteStr::from(lowercase(scheme)),
            ..self.clone()
        })
    }

    /// Returns a new [`Uri`] with given user and optional password.
    ///
    /// Empty user removes the user info. Reserved characters are percent encoded, `:` is encoded
    /// in user but not in password.
    pub fn with_user_info(&self, user: &str, password: Option<&str>) -> Uri {
        let user_info = match password {
            _ if user.is_empty() => ByteStr::new(),
            Some(password) if !password.is_empty() => ByteStr::from(format!(
                "{}:{}",
                filter_user(user),
                filter_password(password)
            )),
            _ => ByteStr::from(filter_user(user)),
        };
        Uri {
            user_info,
            ..self.clone()
        }
    }

    /// Returns a new [`Uri`] with given host, lowercased.
    ///
    /// Empty host removes the host. IPv6 literal without brackets is enclosed in brackets.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidHost`] if the host is neither a hostname nor an IP literal.
    pub fn with_host(&self, host: &str) -> Result<Uri, UriError> {
        let host = filter_host(host)?;
        Ok(Uri {
            host: ByteStr::from(host),
            ..self.clone()
        })
    }

    /// Returns a new [`Uri`] with given port, `None` removes the port.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidPort`] if the port is not in range of `1..=65535`.
    pub fn with_port(&self, port: Option<u32>) -> Result<Uri, UriError> {
        let port = match port {
            Some(port) => Some(assert_port(port)?),
            None => None,
        };
        Ok(Uri {
            port,
            ..self.clone()
        })
    }

    /// Returns a new [`Uri`] with given path, percent encoded.
    pub fn with_path(&self, path: &str) -> Uri {
        Uri {
            path: ByteStr::from(filter_path(path)),
            ..self.clone()
        }
    }

    /// Returns a new [`Uri`] with given query, percent encoded.
    pub fn with_query(&self, query: &str) -> Uri {
        Uri {
            query: ByteStr::from(filter_query_and_fragment(query)),
            ..self.clone()
        }
    }

    /// Returns a new [`Uri`] with given fragment, percent encoded.
    pub fn with_fragment(&self, fragment: &str) -> Uri {
        Uri {
            fragment: ByteStr::from(filter_query_and_fragment(fragment)),
            ..self.clone()
        }
    }

    /// Resolve a relative reference against this [`Uri`].
    ///
    /// See [`resolve`][super::resolve].
    #[inline]
    pub fn resolve(&self, relative: &Uri) -> Uri {
        super::resolve(self, relative)
    }

    /// Returns `true` if `other` is not of the same origin.
    ///
    /// See [`is_cross_origin`][super::is_cross_origin].
    #[inline]
    pub fn is_cross_origin(&self, other: &Uri) -> bool {
        super::is_cross_origin(self, other)
    }

    /// Replace components that are already normalized.
    pub(crate) fn with_raw(
        &self,
        path: ByteStr,
        query: Option<ByteStr>,
        fragment: ByteStr,
    ) -> Uri {
        Uri {
            path,
            query: query.unwrap_or_else(|| self.query.clone()),
            fragment,
            ..self.clone()
        }
    }

    pub(crate) fn with_raw_scheme(&self, scheme: ByteStr) -> Uri {
        Uri {
            scheme,
            ..self.clone()
        }
    }
}

// ===== Parser =====

fn share(source: &ByteStr, value: Cow<'_, str>) -> ByteStr {
    match value {
        Cow::Borrowed(value) => source.slice_ref(value),
        Cow::Owned(value) => ByteStr::from(value),
    }
}

/// Split a URI reference following [RFC3986 Appendix B].
///
/// ```not_rust
/// ^(([^:/?#]+):)?(//([^/?#]*))?([^?#]*)(\?([^#]*))?(#(.*))?
/// ```
///
/// [RFC3986 Appendix B]: <https://datatracker.ietf.org/doc/html/rfc3986#appendix-B>
struct Split<'a> {
    scheme: &'a str,
    authority: Option<&'a str>,
    path: &'a str,
    query: &'a str,
    fragment: &'a str,
}

fn split(input: &str) -> Split<'_> {
    let (rest, fragment) = input.split_once('#').unwrap_or((input, ""));
    let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));

    let (scheme, rest) = match rest.find([':', '/']) {
        Some(i) if i != 0 && rest.as_bytes()[i] == b':' => (&rest[..i], &rest[i + 1..]),
        _ => ("", rest),
    };

    let (authority, path) = match rest.strip_prefix("//") {
        Some(rest) => {
            let end = rest.find('/').unwrap_or(rest.len());
            (Some(&rest[..end]), &rest[end..])
        }
        None => (None, rest),
    };

    Split {
        scheme,
        authority,
        path,
        query,
        fragment,
    }
}

fn parse_shared(source: &ByteStr) -> Result<Uri, UriError> {
    let invalid = || UriError::InvalidUri(source.clone());
    let parts = split(source.as_str());

    assert_scheme(parts.scheme)?;
    let scheme = share(source, lowercase(parts.scheme));

    let (user_info, host, port) = match parts.authority {
        Some("") if scheme == "file" => (ByteStr::new(), ByteStr::new(), None),
        Some(authority) => parse_authority(source, authority)?,
        None => (ByteStr::new(), ByteStr::new(), None),
    };

    if parts.authority.is_some() && host.is_empty() && scheme != "file" {
        return Err(invalid());
    }

    Ok(Uri {
        scheme,
        user_info,
        host,
        port,
        path: share(source, filter_path(parts.path)),
        query: share(source, filter_query_and_fragment(parts.query)),
        fragment: share(source, filter_query_and_fragment(parts.fragment)),
    })
}

fn parse_authority(
    source: &ByteStr,
    authority: &str,
) -> Result<(ByteStr, ByteStr, Option<u16>), UriError> {
    let (user_info, host_port) = match authority.rsplit_once('@') {
        Some((user_info, host_port)) => (Some(user_info), host_port),
        None => (None, authority),
    };

    let (host, port) = if host_port.starts_with('[') {
        match host_port.find(']') {
            Some(end) => match &host_port[end + 1..] {
                "" => (&host_port[..=end], None),
                rest => match rest.strip_prefix(':') {
                    Some(port) => (&host_port[..=end], Some(port)),
                    None => return Err(UriError::InvalidHost(source.slice_ref(host_port))),
                },
            },
            None => return Err(UriError::InvalidHost(source.slice_ref(host_port))),
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    let port = match port {
        Some("") | None => None,
        Some(port) => {
            if !port.bytes().all(|b| b.is_ascii_digit()) {
                return Err(UriError::InvalidPort(source.slice_ref(port)));
            }
            match port.parse::<u32>() {
                Ok(port) => Some(assert_port(port)?),
                Err(_) => return Err(UriError::InvalidPort(source.slice_ref(port))),
            }
        }
    };

    let host = match percent_decode(host) {
        Cow::Borrowed(host) => share(source, filter_host(host)?),
        Cow::Owned(host) => ByteStr::from(filter_host(&host)?.into_owned()),
    };

    let user_info = match user_info {
        Some(user_info) => {
            let (user, password) = match user_info.split_once(':') {
                Some((user, password)) => (user, Some(password)),
                None => (user_info, None),
            };
            let user = percent_decode(user);
            let password = password.map(percent_decode);
            Uri::new().with_user_info(&user, password.as_deref()).user_info
        }
        None => ByteStr::new(),
    };

    Ok((user_info, host, port))
}

// ===== Traits =====

impl std::str::FromStr for Uri {
    type Err = UriError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = UriError;

    #[inline]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Uri::parse(value)
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme
            && self.user_info == other.user_info
            && self.host == other.host
            && self.port() == other.port()
            && self.path == other.path
            && self.query == other.query
            && self.fragment == other.fragment
    }
}

impl Eq for Uri { }

impl std::hash::Hash for Uri {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.scheme.hash(state);
        self.user_info.hash(state);
        self.host.hash(state);
        self.port().hash(state);
        self.path.hash(state);
        self.query.hash(state);
        self.fragment.hash(state);
    }
}

// ===== Coercion =====

/// A type that can be converted into a [`Uri`].
///
/// Strings are parsed with [`Uri::parse`].
#[allow(private_bounds)]
pub trait IntoUri: Sealed { }
trait Sealed: Sized {
    fn into_uri(self) -> Result<Uri, UriError>;
}

pub(crate) fn into_uri<U: IntoUri>(uri: U) -> Result<Uri, UriError> {
    uri.into_uri()
}

impl IntoUri for Uri { }
impl Sealed for Uri {
    #[inline]
    fn into_uri(self) -> Result<Uri, UriError> {
        Ok(self)
    }
}

impl IntoUri for &Uri { }
impl Sealed for &Uri {
    #[inline]
    fn into_uri(self) -> Result<Uri, UriError> {
        Ok(self.clone())
    }
}

impl IntoUri for &str { }
impl Sealed for &str {
    #[inline]
    fn into_uri(self) -> Result<Uri, UriError> {
        Uri::parse(self)
    }
}

impl IntoUri for String { }
impl Sealed for String {
    #[inline]
    fn into_uri(self) -> Result<Uri, UriError> {
        Uri::parse(&self)
    }
}

// ===== Formatting =====

impl std::fmt::Display for Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }

        let authority = self.authority();
        let file_root =
            self.scheme == "file" && (self.path.is_empty() || self.path.starts_with('/'));
        if !authority.is_empty() || file_root {
            write!(f, "//{authority}")?;
        }

        let path = create_uri_path(&authority, &self.path);
        // a colon in the first segment of a relative reference would read as a scheme
        if self.scheme.is_empty()
            && authority.is_empty()
            && path.split('/').next().is_some_and(|segment| segment.contains(':'))
        {
            f.write_str("./")?;
        }
        f.write_str(&path)?;

        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}
