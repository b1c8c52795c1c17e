use crate::common::ByteStr;
use crate::error::Error;
use crate::log::debug;

const SUPPORTED: [&str; 7] = ["0.9", "1.0", "1.1", "2", "2.0", "3", "3.0"];

/// HTTP Protocol Version.
///
/// Version is stored as given, without the `HTTP/` prefix, so `2` and `2.0` are distinct values.
///
/// [httpwg](https://httpwg.org/specs/rfc9112.html#http.version)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProtocolVersion(ByteStr);

impl ProtocolVersion {
    /// `0.9`
    pub const HTTP_09: ProtocolVersion = ProtocolVersion(ByteStr::from_static("0.9"));

    /// `1.0`
    pub const HTTP_10: ProtocolVersion = ProtocolVersion(ByteStr::from_static("1.0"));

    /// `1.1`
    pub const HTTP_11: ProtocolVersion = ProtocolVersion(ByteStr::from_static("1.1"));

    /// `2.0`
    pub const HTTP_2: ProtocolVersion = ProtocolVersion(ByteStr::from_static("2.0"));

    /// `3.0`
    pub const HTTP_3: ProtocolVersion = ProtocolVersion(ByteStr::from_static("3.0"));

    /// Parse protocol version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedProtocolVersion`] if the version is not one of `0.9`, `1.0`,
    /// `1.1`, `2`, `2.0`, `3` or `3.0`.
    pub fn try_from_str(version: &str) -> Result<Self, Error> {
        if SUPPORTED.contains(&version) {
            Ok(Self(ByteStr::copy_from_str(version)))
        } else {
            debug!("rejected protocol version {version:?}");
            Err(Error::UnsupportedProtocolVersion(ByteStr::copy_from_str(version)))
        }
    }

    /// Returns the version string, e.g: `1.1`.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for ProtocolVersion {
    #[inline]
    fn default() -> ProtocolVersion {
        ProtocolVersion::HTTP_11
    }
}

impl std::str::FromStr for ProtocolVersion {
    type Err = Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(s)
    }
}

impl PartialEq<str> for ProtocolVersion {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ProtocolVersion {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "HTTP/{}", self.as_str())
    }
}

impl std::fmt::Debug for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_version() {
        for version in SUPPORTED {
            assert_eq!(ProtocolVersion::try_from_str(version).unwrap(), version);
        }
        assert_eq!(ProtocolVersion::default().to_string(), "HTTP/1.1");
        assert_ne!(ProtocolVersion::try_from_str("2").unwrap(), ProtocolVersion::HTTP_2);

        for version in ["", "1", "1.2", "HTTP/1.1", "4.0", " 1.1"] {
            let err = ProtocolVersion::try_from_str(version).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedProtocolVersion, "{version:?}");
        }
    }
}
