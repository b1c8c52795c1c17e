//! Error types that can occur during header related operation.
use crate::common::ByteStr;

/// An error that can occur in header related operations.
#[derive(Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Name is empty or is not a `token`.
    InvalidName(ByteStr),
    /// Value contains byte other than visible ASCII, space or horizontal tab.
    InvalidValue(ByteStr),
    /// No value is given.
    EmptyValues,
    /// More than one distinct value for the `Host` header.
    MultipleHost,
}

impl HeaderError {
    pub(crate) const fn message(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "header name must be an RFC 7230 compatible string",
            Self::InvalidValue(_) => "header value must be an RFC 7230 compatible string",
            Self::EmptyValues => "header values cannot be empty",
            Self::MultipleHost => "only one Host header is allowed",
        }
    }
}

impl std::error::Error for HeaderError {}

impl std::fmt::Display for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(input) | Self::InvalidValue(input) => {
                write!(f, "{}: {:?}", self.message(), input.as_str())
            }
            Self::EmptyValues | Self::MultipleHost => f.write_str(self.message()),
        }
    }
}

impl std::fmt::Debug for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}
