//! Crate level error.
use crate::common::ByteStr;
use crate::headers::HeaderError;
use crate::uri::UriError;

/// An error that can occur when building or modifying HTTP values.
///
/// Every variant is an invalid input, the receiver of the failing operation is never modified.
/// Use [`Error::kind`] to match on the error without its payload.
#[derive(Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid URI or URI component.
    Uri(UriError),
    /// Invalid header name or value.
    Header(HeaderError),
    /// Protocol version is not one of the supported versions.
    UnsupportedProtocolVersion(ByteStr),
    /// Method is not a non-empty alphabetic string.
    InvalidMethod(ByteStr),
    /// Request target contains whitespace.
    InvalidRequestTarget(ByteStr),
    /// Status code is not an integer in `100..=599`.
    InvalidStatusCode(ByteStr),
    /// Reason phrase contains a control, format, private use or unassigned character other than
    /// horizontal tab.
    InvalidReasonPhrase {
        phrase: ByteStr,
        /// Byte offset of the rejected character.
        position: usize,
    },
    /// Attribute name is empty.
    InvalidAttributeName,
    /// Parsed body is not null, an array or an object.
    InvalidParsedBody,
    /// Query params is not an object of strings.
    InvalidQueryParams,
    /// Cookie name contains a forbidden character.
    InvalidCookieParams(ByteStr),
}

/// The kind of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidScheme,
    InvalidHost,
    InvalidPort,
    InvalidUri,
    InvalidHeaderName,
    InvalidHeaderValue,
    MultipleHostHeader,
    UnsupportedProtocolVersion,
    InvalidMethod,
    InvalidRequestTarget,
    InvalidStatusCode,
    InvalidReasonPhrase,
    InvalidAttributeName,
    InvalidParsedBody,
    InvalidQueryParams,
    InvalidCookieParams,
}

impl Error {
    /// Returns the kind of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Uri(err) => match err {
                UriError::InvalidScheme(_) => ErrorKind::InvalidScheme,
                UriError::InvalidHost(_) => ErrorKind::InvalidHost,
                UriError::InvalidPort(_) => ErrorKind::InvalidPort,
                UriError::InvalidUri(_) => ErrorKind::InvalidUri,
            },
            Self::Header(err) => match err {
                HeaderError::InvalidName(_) => ErrorKind::InvalidHeaderName,
                HeaderError::InvalidValue(_) | HeaderError::EmptyValues => {
                    ErrorKind::InvalidHeaderValue
                }
                HeaderError::MultipleHost => ErrorKind::MultipleHostHeader,
            },
            Self::UnsupportedProtocolVersion(_) => ErrorKind::UnsupportedProtocolVersion,
            Self::InvalidMethod(_) => ErrorKind::InvalidMethod,
            Self::InvalidRequestTarget(_) => ErrorKind::InvalidRequestTarget,
            Self::InvalidStatusCode(_) => ErrorKind::InvalidStatusCode,
            Self::InvalidReasonPhrase { .. } => ErrorKind::InvalidReasonPhrase,
            Self::InvalidAttributeName => ErrorKind::InvalidAttributeName,
            Self::InvalidParsedBody => ErrorKind::InvalidParsedBody,
            Self::InvalidQueryParams => ErrorKind::InvalidQueryParams,
            Self::InvalidCookieParams(_) => ErrorKind::InvalidCookieParams,
        }
    }
}

impl From<UriError> for Error {
    #[inline]
    fn from(value: UriError) -> Self {
        Self::Uri(value)
    }
}

impl From<HeaderError> for Error {
    #[inline]
    fn from(value: HeaderError) -> Self {
        Self::Header(value)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Uri(err) => Some(err),
            Self::Header(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uri(err) => err.fmt(f),
            Self::Header(err) => err.fmt(f),
            Self::UnsupportedProtocolVersion(v) => {
                write!(f, "unsupported HTTP protocol version: {:?}", v.as_str())
            }
            Self::InvalidMethod(m) => write!(f, "invalid method: {:?}", m.as_str()),
            Self::InvalidRequestTarget(t) => {
                write!(f, "request target cannot contain whitespace: {:?}", t.as_str())
            }
            Self::InvalidStatusCode(c) => {
                write!(f, "status code must be an integer between 100 and 599: {:?}", c.as_str())
            }
            Self::InvalidReasonPhrase { phrase, position } => write!(
                f,
                "reason phrase contains a prohibited character at position {position}: {:?}",
                phrase.as_str()
            ),
            Self::InvalidAttributeName => f.write_str("attribute name must be a non-empty string"),
            Self::InvalidParsedBody => f.write_str("parsed body must be null, an array or an object"),
            Self::InvalidQueryParams => f.write_str("query params must be an object of strings"),
            Self::InvalidCookieParams(name) => {
                write!(f, "invalid cookie name: {:?}", name.as_str())
            }
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_kind() {
        let err = Error::from(UriError::InvalidHost(ByteStr::from_static("a_b")));
        assert_eq!(err.kind(), ErrorKind::InvalidHost);
        assert_eq!(err.to_string(), "invalid host: \"a_b\"");

        assert_eq!(Error::from(HeaderError::EmptyValues).kind(), ErrorKind::InvalidHeaderValue);
        assert_eq!(Error::from(HeaderError::MultipleHost).kind(), ErrorKind::MultipleHostHeader);

        let err = Error::InvalidReasonPhrase {
            phrase: ByteStr::from_static("a\nb"),
            position: 1,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidReasonPhrase);
        assert!(err.to_string().contains("position 1"));
    }
}
