use crate::common::ByteStr;
use crate::headers::error::HeaderError;
use crate::log::debug;
use crate::matches;

/// HTTP Header Value.
///
/// Value only contains visible ASCII, space and horizontal tab, with leading and trailing
/// whitespace trimmed. Empty value is allowed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HeaderValue {
    /// is valid and trimmed
    value: ByteStr,
}

impl HeaderValue {
    /// Parse header value from static str.
    ///
    /// # Panics
    ///
    /// Panics if the input is not a valid header value or has surrounding whitespace.
    #[inline]
    pub const fn from_static(value: &'static str) -> Self {
        let bytes = value.as_bytes();
        if !is_header_value(bytes) {
            panic!("static header value contains invalid byte")
        }
        if let [b' ' | b'\t', ..] | [.., b' ' | b'\t'] = bytes {
            panic!("static header value must be trimmed")
        }
        Self {
            value: ByteStr::from_static(value),
        }
    }

    /// Parse header value by copying from str, surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns error if the input contains invalid byte.
    #[inline]
    pub fn try_from_str(value: &str) -> Result<Self, HeaderError> {
        validate_header_value(value)?;
        Ok(Self {
            value: ByteStr::copy_from_str(trim(value)),
        })
    }

    /// Parse header value from [`ByteStr`] without copying, surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns error if the input contains invalid byte.
    #[inline]
    pub fn from_shared(value: ByteStr) -> Result<Self, HeaderError> {
        validate_header_value(&value)?;
        Ok(Self {
            value: value.slice_ref(trim(&value)),
        })
    }

    /// Extracts a string slice of the header value.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Returns header value as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    /// Returns `true` if the value is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

// ===== Validation =====

const fn is_header_value(mut bytes: &[u8]) -> bool {
    while let [byte, rest @ ..] = bytes {
        if !matches::is_header_value(*byte) {
            return false;
        }
        bytes = rest;
    }
    true
}

fn trim(value: &str) -> &str {
    value.trim_matches([' ', '\t'])
}

/// field-value = *( field-content )
pub(crate) fn validate_header_value(value: &str) -> Result<(), HeaderError> {
    if is_header_value(value.as_bytes()) {
        Ok(())
    } else {
        debug!("rejected header value {value:?}");
        Err(HeaderError::InvalidValue(ByteStr::copy_from_str(value)))
    }
}

// ===== Coercion =====

/// A type that can be used as one or more header values.
///
/// A single value is treated as a list of one element. Integers are formatted in decimal.
#[allow(private_bounds)]
pub trait IntoHeaderValues: Sealed { }
trait Sealed: Sized {
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError>;
}

pub(crate) fn into_header_values<V: IntoHeaderValues>(
    values: V,
) -> Result<Vec<HeaderValue>, HeaderError> {
    let values = values.into_header_values()?;
    if values.is_empty() {
        debug!("rejected empty header values");
        return Err(HeaderError::EmptyValues);
    }
    Ok(values)
}

impl IntoHeaderValues for HeaderValue { }
impl Sealed for HeaderValue {
    #[inline]
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
        Ok(vec![self])
    }
}

impl IntoHeaderValues for &str { }
impl Sealed for &str {
    #[inline]
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
        Ok(vec![HeaderValue::try_from_str(self)?])
    }
}

impl IntoHeaderValues for String { }
impl Sealed for String {
    #[inline]
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
        Ok(vec![HeaderValue::from_shared(ByteStr::from(self))?])
    }
}

impl IntoHeaderValues for ByteStr { }
impl Sealed for ByteStr {
    #[inline]
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
        Ok(vec![HeaderValue::from_shared(self)?])
    }
}

impl IntoHeaderValues for &[&str] { }
impl Sealed for &[&str] {
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
        self.iter().map(|e| HeaderValue::try_from_str(e)).collect()
    }
}

impl<const N: usize> IntoHeaderValues for [&str; N] { }
impl<const N: usize> Sealed for [&str; N] {
    #[inline]
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
        self.as_slice().into_header_values()
    }
}

impl IntoHeaderValues for Vec<&str> { }
impl Sealed for Vec<&str> {
    #[inline]
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
        self.as_slice().into_header_values()
    }
}

impl IntoHeaderValues for Vec<String> { }
impl Sealed for Vec<String> {
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
        self.into_iter()
            .map(|e| HeaderValue::from_shared(ByteStr::from(e)))
            .collect()
    }
}

impl IntoHeaderValues for Vec<HeaderValue> { }
impl Sealed for Vec<HeaderValue> {
    #[inline]
    fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
        Ok(self)
    }
}

macro_rules! integer_values {
    ($($ty:ty),*) => {
        $(
            impl IntoHeaderValues for $ty { }
            impl Sealed for $ty {
                #[inline]
                fn into_header_values(self) -> Result<Vec<HeaderValue>, HeaderError> {
                    let mut buf = itoa::Buffer::new();
                    Ok(vec![HeaderValue {
                        value: ByteStr::copy_from_str(buf.format(self)),
                    }])
                }
            }
        )*
    };
}

integer_values!(u16, u32, u64, usize, i32, i64);

// ===== Traits =====

impl std::fmt::Display for HeaderValue {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for HeaderValue {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl PartialEq<str> for HeaderValue {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for HeaderValue {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::str::FromStr for HeaderValue {
    type Err = HeaderError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_header_value() {
        assert_eq!(HeaderValue::try_from_str("  text/html \t").unwrap(), "text/html");
        assert_eq!(HeaderValue::try_from_str("").unwrap(), "");
        assert_eq!(HeaderValue::try_from_str(" \t ").unwrap(), "");
        assert_eq!(HeaderValue::try_from_str("a\tb c").unwrap(), "a\tb c");

        for value in ["a\r\nb", "\0", "caf\u{e9}", "a\x7f"] {
            assert!(
                matches!(HeaderValue::try_from_str(value), Err(HeaderError::InvalidValue(_))),
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_into_header_values() {
        let values = into_header_values(["a", " b "]).unwrap();
        assert_eq!(values, [HeaderValue::from_static("a"), HeaderValue::from_static("b")]);

        let values = into_header_values(1024u32).unwrap();
        assert_eq!(values[0], "1024");

        let values = into_header_values(String::from(" shared ")).unwrap();
        assert_eq!(values[0], "shared");

        assert!(matches!(into_header_values(Vec::<&str>::new()), Err(HeaderError::EmptyValues)));
        assert!(matches!(into_header_values(vec!["ok", "\n"]), Err(HeaderError::InvalidValue(_))));
    }
}
