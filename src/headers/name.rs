use crate::common::ByteStr;
use crate::headers::error::HeaderError;
use crate::log::debug;
use crate::matches;

/// HTTP Header name.
///
/// # Case Preservation
///
/// The original casing is preserved for output, while comparison, hashing and map lookup are
/// case-insensitive.
///
/// ```
/// use httpval::headers::HeaderName;
///
/// let name = HeaderName::try_from_str("X-Foo").unwrap();
/// assert_eq!(name.as_str(), "X-Foo");
/// assert_eq!(name, HeaderName::from_static("x-foo"));
/// ```
//
// the hash of the lowercased name is computed once at construction
#[derive(Clone)]
pub struct HeaderName {
    /// is valid token
    name: ByteStr,
    hash: u64,
}

impl HeaderName {
    /// Parse header name from static str.
    ///
    /// # Panics
    ///
    /// Panics if the input is not a valid header name.
    #[inline]
    pub const fn from_static(name: &'static str) -> Self {
        if !is_header_name(name.as_bytes()) {
            panic!("static header name must be a valid token")
        }
        Self {
            hash: matches::hash_to_lowercase(name.as_bytes()),
            name: ByteStr::from_static(name),
        }
    }

    /// Parse header name by copying from str.
    ///
    /// # Errors
    ///
    /// Returns error if the input is empty or not a `token`.
    #[inline]
    pub fn try_from_str(name: &str) -> Result<Self, HeaderError> {
        validate_header_name(name)?;
        Ok(Self::new_unchecked(ByteStr::copy_from_str(name)))
    }

    /// Parse header name from [`ByteStr`] without copying.
    ///
    /// # Errors
    ///
    /// Returns error if the input is empty or not a `token`.
    #[inline]
    pub fn from_shared(name: ByteStr) -> Result<Self, HeaderError> {
        validate_header_name(&name)?;
        Ok(Self::new_unchecked(name))
    }

    fn new_unchecked(name: ByteStr) -> Self {
        Self {
            hash: matches::hash_to_lowercase(name.as_bytes()),
            name,
        }
    }

    /// Extracts a string slice of the header name in its original casing.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    /// Returns `true` if header name is equal to `name` ignoring ASCII case.
    #[inline]
    pub fn eq_ignore_ascii_case(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    #[inline]
    pub(crate) const fn hash(&self) -> u64 {
        self.hash
    }

    pub(crate) fn is_host(&self) -> bool {
        self.hash == standard::HOST.hash && self.eq_ignore_ascii_case("host")
    }
}

// ===== Validation =====

const fn is_header_name(mut bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    while let [byte, rest @ ..] = bytes {
        if !matches::is_token(*byte) {
            return false;
        }
        bytes = rest;
    }
    true
}

/// token       = 1*tchar
/// field-name  = token
pub(crate) fn validate_header_name(name: &str) -> Result<(), HeaderError> {
    if is_header_name(name.as_bytes()) {
        Ok(())
    } else {
        debug!("rejected header name {name:?}");
        Err(HeaderError::InvalidName(ByteStr::copy_from_str(name)))
    }
}

// ===== Traits =====

impl std::fmt::Display for HeaderName {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for HeaderName {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HeaderName").field(&self.as_str()).finish()
    }
}

impl std::hash::Hash for HeaderName {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialEq for HeaderName {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.eq_ignore_ascii_case(other.as_str())
    }
}

impl Eq for HeaderName { }

impl PartialEq<str> for HeaderName {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for HeaderName {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl std::str::FromStr for HeaderName {
    type Err = HeaderError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(s)
    }
}

// ===== Coercion =====

/// A type that can be converted into a validated [`HeaderName`].
#[allow(private_bounds)]
pub trait IntoHeaderName: Sealed { }
trait Sealed: Sized {
    fn into_header_name(self) -> Result<HeaderName, HeaderError>;
}

pub(crate) fn into_header_name<N: IntoHeaderName>(name: N) -> Result<HeaderName, HeaderError> {
    name.into_header_name()
}

impl IntoHeaderName for HeaderName { }
impl Sealed for HeaderName {
    #[inline]
    fn into_header_name(self) -> Result<HeaderName, HeaderError> {
        Ok(self)
    }
}

impl IntoHeaderName for &HeaderName { }
impl Sealed for &HeaderName {
    #[inline]
    fn into_header_name(self) -> Result<HeaderName, HeaderError> {
        Ok(self.clone())
    }
}

impl IntoHeaderName for &str { }
impl Sealed for &str {
    #[inline]
    fn into_header_name(self) -> Result<HeaderName, HeaderError> {
        HeaderName::try_from_str(self)
    }
}

impl IntoHeaderName for String { }
impl Sealed for String {
    #[inline]
    fn into_header_name(self) -> Result<HeaderName, HeaderError> {
        HeaderName::from_shared(ByteStr::from(self))
    }
}

// ===== Standard Headers =====

macro_rules! standard_header {
    (
        $(#[$mod_doc:meta])*
        mod $mod_name:ident;

        $(
            $(#[$doc:meta])*
            const $id:ident = $name:literal;
        )*
    ) => {
        $(#[$mod_doc])*
        pub mod $mod_name {
            use super::HeaderName;

            $(
                $(#[$doc])*
                pub const $id: HeaderName = HeaderName::from_static($name);
            )*
        }
    };
}

standard_header! {
    /// HTTP Standard Headers in their conventional casing.
    mod standard;

    const ACCEPT = "Accept";
    const ACCEPT_ENCODING = "Accept-Encoding";
    const ACCEPT_LANGUAGE = "Accept-Language";
    const AUTHORIZATION = "Authorization";
    const CACHE_CONTROL = "Cache-Control";
    const CONNECTION = "Connection";
    const CONTENT_LENGTH = "Content-Length";
    const CONTENT_MD5 = "Content-MD5";
    const CONTENT_TYPE = "Content-Type";
    const COOKIE = "Cookie";
    const DATE = "Date";
    /// Always stored first in a [`HeaderMap`][crate::headers::HeaderMap].
    const HOST = "Host";
    const LOCATION = "Location";
    const REFERER = "Referer";
    const SET_COOKIE = "Set-Cookie";
    const USER_AGENT = "User-Agent";
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_header_name() {
        assert!(HeaderName::try_from_str("X-Foo").is_ok());
        assert!(HeaderName::try_from_str("x~foo!#$%&'*+.^_`|").is_ok());

        for name in ["", "X Foo", "X-Foo:", "Fo\u{e9}", "X-Foo\r\n", "(comment)"] {
            assert!(
                matches!(HeaderName::try_from_str(name), Err(HeaderError::InvalidName(_))),
                "{name:?}"
            );
        }
    }

    #[test]
    fn test_case_insensitive_eq() {
        let name = HeaderName::try_from_str("CONTENT-type").unwrap();
        assert_eq!(name, standard::CONTENT_TYPE);
        assert_eq!(name.hash(), standard::CONTENT_TYPE.hash());
        assert_eq!(name.as_str(), "CONTENT-type");
        assert!(HeaderName::try_from_str("hOsT").unwrap().is_host());
        assert!(!standard::ACCEPT.is_host());
    }
}
