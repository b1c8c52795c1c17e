use crate::common::ByteStr;
use crate::error::Error;
use crate::log::debug;

/// HTTP [Status Code][rfc].
///
/// Any integer in `100..=599` is accepted. Codes registered at IANA have a standard reason
/// phrase, see [`StatusCode::reason_phrase`].
///
/// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-status-codes>
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// Create status code from integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStatusCode`] if `code` is not in `100..=599`.
    pub fn from_u16(code: u16) -> Result<Self, Error> {
        match code {
            100..=599 => Ok(Self(code)),
            _ => {
                let mut buf = itoa::Buffer::new();
                Err(invalid(buf.format(code)))
            }
        }
    }

    /// Parse status code from a string of decimal digits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStatusCode`] if `code` is not all digits or is not in `100..=599`.
    pub fn try_from_str(code: &str) -> Result<Self, Error> {
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(code));
        }
        match code.parse::<u16>() {
            Ok(int) => Self::from_u16(int),
            Err(_) => Err(invalid(code)),
        }
    }

    /// Returns status code value, e.g: `200`.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

fn invalid(code: &str) -> Error {
    debug!("rejected status code {code:?}");
    Error::InvalidStatusCode(ByteStr::copy_from_str(code))
}

impl Default for StatusCode {
    #[inline]
    fn default() -> Self {
        Self::OK
    }
}

macro_rules! status_code_v3 {
    (
        $(
            $(#[$doc:meta])*
            $int:literal $id:ident $msg:literal;
        )*
    ) => {
        impl StatusCode {
            /// Returns the standard reason phrase, e.g: `"OK"`.
            ///
            /// Returns empty string for unregistered status code.
            #[inline]
            pub const fn reason_phrase(&self) -> &'static str {
                match self.0 {
                    $(
                        $int => $msg,
                    )*
                    _ => "",
                }
            }
        }

        impl StatusCode {
            $(
                $(#[$doc])*
                pub const $id: Self = Self($int);
            )*
        }
    };
}

status_code_v3! {
    /// `100`. The client should continue the request or ignore the response if the request is
    /// already finished.
    100 CONTINUE "Continue";
    /// `101`, This code is sent in response to an `Upgrade` request header from the client and
    /// indicates the protocol the server is switching to.
    101 SWITCHING_PROTOCOLS "Switching Protocols";
    102 PROCESSING "Processing";
    103 EARLY_HINTS "Early Hints";
    /// `200`. The request succeeded.
    200 OK "OK";
    /// `201`. The request succeeded, and a new resource was created as a result.
    201 CREATED "Created";
    202 ACCEPTED "Accepted";
    203 NON_AUTHORITATIVE_INFORMATION "Non-Authoritative Information";
    /// `204`. There is no content to send for this request, but the headers are useful.
    204 NO_CONTENT "No Content";
    205 RESET_CONTENT "Reset Content";
    206 PARTIAL_CONTENT "Partial Content";
    207 MULTI_STATUS "Multi-Status";
    208 ALREADY_REPORTED "Already Reported";
    226 IM_USED "IM Used";
    300 MULTIPLE_CHOICES "Multiple Choices";
    301 MOVED_PERMANENTLY "Moved Permanently";
    /// `302`. This response code means that the URI of requested resource has been changed
    /// temporarily.
    302 FOUND "Found";
    /// `303`. The server sent this response to direct the client to get the requested resource at
    /// another URI with a GET request.
    303 SEE_OTHER "See Other";
    /// `304`. It tells the client that the response has not been modified, so the client can
    /// continue to use the same cached version of the response.
    304 NOT_MODIFIED "Not Modified";
    305 USE_PROXY "Use Proxy";
    /// `307`. The server sends this response to direct the client to get the requested resource at
    /// another URI with the same method that was used in the prior request.
    307 TEMPORARY_REDIRECT "Temporary Redirect";
    308 PERMANENT_REDIRECT "Permanent Redirect";
    /// `400`. The server cannot or will not process the request due to something that is
    /// perceived to be a client error.
    400 BAD_REQUEST "Bad Request";
    /// `401`. Although the HTTP standard specifies "unauthorized", semantically this response
    /// means "unauthenticated".
    401 UNAUTHORIZED "Unauthorized";
    402 PAYMENT_REQUIRED "Payment Required";
    /// `403`. The client's identity is known to the server, but client does not have access rights
    /// to the content.
    403 FORBIDDEN "Forbidden";
    /// `404`. The server cannot find the requested resource.
    404 NOT_FOUND "Not Found";
    /// `405`. The request method is known by the server but is not supported by the target
    /// resource.
    405 METHOD_NOT_ALLOWED "Method Not Allowed";
    406 NOT_ACCEPTABLE "Not Acceptable";
    407 PROXY_AUTHENTICATION_REQUIRED "Proxy Authentication Required";
    408 REQUEST_TIMEOUT "Request Timeout";
    409 CONFLICT "Conflict";
    410 GONE "Gone";
    /// `411`. Server rejected the request because the `Content-Length` header field is not
    /// defined and the server requires it.
    411 LENGTH_REQUIRED "Length Required";
    412 PRECONDITION_FAILED "Precondition Failed";
    413 CONTENT_TOO_LARGE "Content Too Large";
    414 URI_TOO_LONG "URI Too Long";
    415 UNSUPPORTED_MEDIA_TYPE "Unsupported Media Type";
    416 RANGE_NOT_SATISFIABLE "Range Not Satisfiable";
    417 EXPECTATION_FAILED "Expectation Failed";
    /// `418`. The server refuses the attempt to brew coffee with a teapot.
    418 IM_A_TEAPOT "I'm a teapot";
    421 MISDIRECTED_REQUEST "Misdirected Request";
    422 UNPROCESSABLE_CONTENT "Unprocessable Content";
    423 LOCKED "Locked";
    424 FAILED_DEPENDENCY "Failed Dependency";
    425 TOO_EARLY "Too Early";
    426 UPGRADE_REQUIRED "Upgrade Required";
    428 PRECONDITION_REQUIRED "Precondition Required";
    /// `429`. The user has sent too many requests in a given amount of time.
    429 TOO_MANY_REQUESTS "Too Many Requests";
    431 REQUEST_HEADER_FIELDS_TOO_LARGE "Request Header Fields Too Large";
    451 UNAVAILABLE_FOR_LEGAL_REASONS "Unavailable For Legal Reasons";
    /// `500`. The server has encountered a situation it does not know how to handle.
    500 INTERNAL_SERVER_ERROR "Internal Server Error";
    501 NOT_IMPLEMENTED "Not Implemented";
    502 BAD_GATEWAY "Bad Gateway";
    /// `503`. The server is not ready to handle the request.
    503 SERVICE_UNAVAILABLE "Service Unavailable";
    504 GATEWAY_TIMEOUT "Gateway Timeout";
    505 HTTP_VERSION_NOT_SUPPORTED "HTTP Version Not Supported";
    506 VARIANT_ALSO_NEGOTIATES "Variant Also Negotiates";
    507 INSUFFICIENT_STORAGE "Insufficient Storage";
    508 LOOP_DETECTED "Loop Detected";
    510 NOT_EXTENDED "Not Extended";
    511 NETWORK_AUTHENTICATION_REQUIRED "Network Authentication Required";
}

// ===== Coercion =====

/// A type that can be used as a status code.
///
/// Implemented for integers, [`StatusCode`], and strings of decimal digits.
#[allow(private_bounds)]
pub trait IntoStatusCode: Sealed { }
trait Sealed {
    fn into_status_code(self) -> Result<StatusCode, Error>;
}

pub(crate) fn into_status_code<C: IntoStatusCode>(code: C) -> Result<StatusCode, Error> {
    code.into_status_code()
}

impl IntoStatusCode for StatusCode { }
impl Sealed for StatusCode {
    #[inline]
    fn into_status_code(self) -> Result<StatusCode, Error> {
        Ok(self)
    }
}

impl IntoStatusCode for &str { }
impl Sealed for &str {
    #[inline]
    fn into_status_code(self) -> Result<StatusCode, Error> {
        StatusCode::try_from_str(self)
    }
}

macro_rules! integer_code {
    ($($ty:ty),*) => {
        $(
            impl IntoStatusCode for $ty { }
            impl Sealed for $ty {
                #[inline]
                fn into_status_code(self) -> Result<StatusCode, Error> {
                    match u16::try_from(self) {
                        Ok(code) => StatusCode::from_u16(code),
                        Err(_) => {
                            let mut buf = itoa::Buffer::new();
                            Err(invalid(buf.format(self)))
                        }
                    }
                }
            }
        )*
    };
}

integer_code!(u32, u64, i32, i64, usize);

impl IntoStatusCode for u16 { }
impl Sealed for u16 {
    #[inline]
    fn into_status_code(self) -> Result<StatusCode, Error> {
        StatusCode::from_u16(self)
    }
}

// ===== Traits =====

impl PartialEq<u16> for StatusCode {
    #[inline]
    fn eq(&self, other: &u16) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("StatusCode").field(&self.0).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_boundaries() {
        assert_eq!(into_status_code(100).unwrap(), 100);
        assert_eq!(into_status_code(599).unwrap(), 599);
        assert_eq!(into_status_code("404").unwrap(), StatusCode::NOT_FOUND);

        for code in [99, 600, -1, 0, 70_000] {
            let err = into_status_code(code).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidStatusCode, "{code}");
        }
        for code in ["", "abc", "20x", "+200", " 200", "99999999999"] {
            let err = into_status_code(code).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidStatusCode, "{code:?}");
        }
    }

    #[test]
    fn test_reason_phrase() {
        assert_eq!(StatusCode::OK.reason_phrase(), "OK");
        assert_eq!(StatusCode::IM_A_TEAPOT.reason_phrase(), "I'm a teapot");
        assert_eq!(StatusCode::from_u16(599).unwrap().reason_phrase(), "");
        assert_eq!(StatusCode::NOT_FOUND.to_string(), "404 Not Found");
    }
}
