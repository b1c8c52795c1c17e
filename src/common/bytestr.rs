use std::borrow::Cow;

use bytes::Bytes;

/// Shared, immutable UTF-8 string.
///
/// Every string component kept by the value types of this crate is a `ByteStr`, so deriving a new
/// value from an existing one shares the buffers instead of copying them.
#[derive(Clone, Default)]
pub struct ByteStr {
    bytes: Bytes,
}

impl ByteStr {
    #[inline]
    pub const fn new() -> ByteStr {
        Self { bytes: Bytes::new() }
    }

    #[inline]
    pub fn copy_from_str(string: &str) -> Self {
        Self { bytes: Bytes::copy_from_slice(string.as_bytes()) }
    }

    /// No allocation, points directly to `string`.
    #[inline]
    pub const fn from_static(string: &'static str) -> Self {
        Self { bytes: Bytes::from_static(string.as_bytes()) }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: only constructed from `str` or `String`
        unsafe { std::str::from_utf8_unchecked(&self.bytes) }
    }

    /// Share the part of the buffer that `subset` points into.
    ///
    /// # Panics
    ///
    /// Panics if `subset` is not contained within `self`.
    pub fn slice_ref(&self, subset: &str) -> Self {
        Self { bytes: self.bytes.slice_ref(subset.as_bytes()) }
    }
}

impl std::ops::Deref for ByteStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ByteStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self)
    }
}

impl std::fmt::Debug for ByteStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for ByteStr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ByteStr { }

impl std::hash::Hash for ByteStr {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl PartialEq<str> for ByteStr {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ByteStr {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl From<String> for ByteStr {
    #[inline]
    fn from(value: String) -> Self {
        Self { bytes: Bytes::from(value) }
    }
}

/// Borrowed input is copied, owned input is moved.
impl From<Cow<'_, str>> for ByteStr {
    fn from(value: Cow<'_, str>) -> Self {
        match value {
            Cow::Borrowed(s) => Self::copy_from_str(s),
            Cow::Owned(s) => Self::from(s),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shared_slice() {
        let full = ByteStr::copy_from_str("example.com:8080");
        let host = full.slice_ref(&full[..11]);
        assert_eq!(host, "example.com");
        assert_eq!(host.as_ptr(), full.as_ptr());
        assert_eq!(full.to_string(), "example.com:8080");
    }

    #[test]
    fn test_cow() {
        let owned = ByteStr::from(Cow::<str>::Owned("a%20b".to_owned()));
        let borrowed = ByteStr::from(Cow::Borrowed("a%20b"));
        assert_eq!(owned, borrowed);
        assert_eq!(ByteStr::default(), ByteStr::from_static(""));
    }
}
