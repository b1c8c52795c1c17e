use std::sync::Arc;

use super::{MemoryStream, Stream};

/// Shared handle to a message body [`Stream`].
///
/// Cloning a [`Body`] shares the same stream. Two bodies are equal only if they refer to the
/// same stream.
#[derive(Clone)]
pub struct Body {
    stream: Arc<dyn Stream>,
}

impl Body {
    /// Create [`Body`] from a stream.
    #[inline]
    pub fn new<S: Stream + 'static>(stream: S) -> Self {
        Self {
            stream: Arc::new(stream),
        }
    }

    /// Create [`Body`] from an already shared stream.
    #[inline]
    pub fn from_shared(stream: Arc<dyn Stream>) -> Self {
        Self { stream }
    }

    /// Create new empty in memory [`Body`].
    #[inline]
    pub fn empty() -> Self {
        Self::new(MemoryStream::new())
    }

    /// Returns `true` if both handle refer to the same stream.
    #[inline]
    pub fn ptr_eq(&self, other: &Body) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.stream), Arc::as_ptr(&other.stream))
    }
}

impl std::ops::Deref for Body {
    type Target = dyn Stream;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &*self.stream
    }
}

impl Default for Body {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Body {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Body { }

impl From<&str> for Body {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(MemoryStream::from_bytes(value.as_bytes()))
    }
}

impl From<String> for Body {
    #[inline]
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&[u8]> for Body {
    #[inline]
    fn from(value: &[u8]) -> Self {
        Self::new(MemoryStream::from_bytes(value))
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("size", &self.stream.size())
            .field("readable", &self.stream.is_readable())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_identity() {
        let body = Body::from("data");
        let clone = body.clone();
        assert_eq!(body, clone);
        assert_ne!(body, Body::from("data"));

        clone.write(b"!").unwrap();
        assert_eq!(body.to_string_lossy(), "!ata");
    }
}
