use crate::common::ByteStr;
use crate::error::Error;
use crate::log::debug;

/// HTTP Method.
///
/// Any non-empty string of ASCII letters is accepted, and the casing is preserved. Standard
/// methods from [RFC9110] and the PATCH method from [RFC5789] are available as constants.
///
/// Method comparison is case-sensitive.
///
/// [RFC5789]: https://www.rfc-editor.org/rfc/rfc5789
/// [RFC9110]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-methods>
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Method(ByteStr);

methods! {
    /// [GET](https://www.rfc-editor.org/rfc/rfc9110.html#name-get)
    pub const GET = "GET";
    /// [HEAD](https://www.rfc-editor.org/rfc/rfc9110.html#name-head)
    pub const HEAD = "HEAD";
    /// [POST](https://www.rfc-editor.org/rfc/rfc9110.html#name-post)
    pub const POST = "POST";
    /// [PUT](https://www.rfc-editor.org/rfc/rfc9110.html#name-put)
    pub const PUT = "PUT";
    /// [DELETE](https://www.rfc-editor.org/rfc/rfc9110.html#name-delete)
    pub const DELETE = "DELETE";
    /// [CONNECT](https://www.rfc-editor.org/rfc/rfc9110.html#name-connect)
    pub const CONNECT = "CONNECT";
    /// [OPTIONS](https://www.rfc-editor.org/rfc/rfc9110.html#name-options)
    pub const OPTIONS = "OPTIONS";
    /// [TRACE](https://www.rfc-editor.org/rfc/rfc9110.html#name-trace)
    pub const TRACE = "TRACE";
    /// [PATCH](https://www.rfc-editor.org/rfc/rfc5789#section-2)
    pub const PATCH = "PATCH";
}

impl Method {
    /// Parse method, the casing is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMethod`] if method is empty or contains non alphabetic character.
    pub fn try_from_str(method: &str) -> Result<Self, Error> {
        validate_method(method)?;
        Ok(Self(ByteStr::copy_from_str(method)))
    }

    /// Returns a copy of this method in uppercase.
    pub fn to_uppercase(&self) -> Method {
        if self.0.bytes().all(|b| b.is_ascii_uppercase()) {
            return self.clone();
        }
        Method(ByteStr::from(self.0.to_ascii_uppercase()))
    }

    /// Returns string representation of the method.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn validate_method(method: &str) -> Result<(), Error> {
    if !method.is_empty() && method.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(())
    } else {
        debug!("rejected method {method:?}");
        Err(Error::InvalidMethod(ByteStr::copy_from_str(method)))
    }
}

impl Default for Method {
    #[inline]
    fn default() -> Self {
        Self::GET
    }
}

impl std::str::FromStr for Method {
    type Err = Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(s)
    }
}

impl PartialEq<str> for Method {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Method {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::fmt::Debug for Method {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl std::fmt::Display for Method {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Macros =====

macro_rules! methods {
    ($($(#[$doc:meta])* pub const $name:ident = $val:literal;)*) => {
        impl Method {
            $(
               $(#[$doc])*
               pub const $name: Self = Self(ByteStr::from_static($val));
            )*
        }
    };
}

use methods;
