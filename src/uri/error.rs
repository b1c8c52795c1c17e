use crate::common::ByteStr;

/// A possible error value when parsing or building a [`Uri`].
///
/// Each variant carries the rejected input.
///
/// [`Uri`]: super::Uri
#[derive(Clone, PartialEq, Eq)]
pub enum UriError {
    /// Scheme does not match `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
    InvalidScheme(ByteStr),
    /// Host is neither a hostname nor an IP literal.
    InvalidHost(ByteStr),
    /// Port is not an integer in `1..=65535`.
    InvalidPort(ByteStr),
    /// URI string cannot be parsed.
    InvalidUri(ByteStr),
}

impl UriError {
    pub(crate) const fn message(&self) -> &'static str {
        match self {
            Self::InvalidScheme(_) => "invalid scheme",
            Self::InvalidHost(_) => "invalid host",
            Self::InvalidPort(_) => "invalid port, must be between 1 and 65535",
            Self::InvalidUri(_) => "unable to parse uri",
        }
    }

    /// Returns the rejected input.
    pub fn input(&self) -> &str {
        match self {
            Self::InvalidScheme(s)
            | Self::InvalidHost(s)
            | Self::InvalidPort(s)
            | Self::InvalidUri(s) => s.as_str(),
        }
    }
}

impl std::error::Error for UriError { }

impl std::fmt::Display for UriError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.message(), self.input())
    }
}

impl std::fmt::Debug for UriError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}
