//! HTTP Response.
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::common::ByteStr;
use crate::error::Error;
use crate::http::{self, IntoStatusCode, StatusCode};
use crate::log::debug;
use crate::message::{HttpMessage, Message, MessageParts};

/// HTTP Response.
///
/// ```
/// use httpval::response::Response;
///
/// let res = Response::new(404, "").unwrap();
/// assert_eq!(res.reason_phrase(), "Not Found");
///
/// let res = res.with_status("599", "Custom").unwrap();
/// assert_eq!(res.status(), 599);
/// assert_eq!(res.reason_phrase(), "Custom");
/// ```
#[derive(Clone, Debug)]
pub struct Response {
    message: Message,
    status: StatusCode,
    reason: ByteStr,
}

impl Response {
    /// Create new [`Response`].
    ///
    /// Empty `reason_phrase` is replaced with the standard one of the status code.
    ///
    /// # Errors
    ///
    /// Same as [`filter_code_phrase`].
    pub fn new<C: IntoStatusCode>(code: C, reason_phrase: &str) -> Result<Self, Error> {
        let (status, reason) = filter_code_phrase(code, reason_phrase)?;
        Ok(Self {
            message: Message::new(),
            status,
            reason,
        })
    }

    /// Returns the status code.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the reason phrase.
    #[inline]
    pub fn reason_phrase(&self) -> &str {
        self.reason.as_str()
    }

    /// Returns a copy with the given status.
    ///
    /// # Errors
    ///
    /// Same as [`filter_code_phrase`].
    pub fn with_status<C: IntoStatusCode>(&self, code: C, reason_phrase: &str) -> Result<Self, Error> {
        let (status, reason) = filter_code_phrase(code, reason_phrase)?;
        let mut new = self.clone();
        new.status = status;
        new.reason = reason;
        Ok(new)
    }
}

impl Default for Response {
    /// `200 OK`
    #[inline]
    fn default() -> Self {
        Self {
            message: Message::new(),
            status: StatusCode::OK,
            reason: ByteStr::from_static("OK"),
        }
    }
}

impl MessageParts for Response {
    #[inline]
    fn message(&self) -> &Message {
        &self.message
    }

    #[inline]
    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

impl HttpMessage for Response { }

/// Validate status code and reason phrase.
///
/// Empty `phrase` is replaced with the standard reason phrase of the status code, which is empty
/// for unregistered code.
///
/// # Errors
///
/// Returns [`Error::InvalidStatusCode`] if the code is not in `100..=599`, or
/// [`Error::InvalidReasonPhrase`] if the phrase contains a character of general category
/// `Other` other than horizontal tab.
pub fn filter_code_phrase<C: IntoStatusCode>(
    code: C,
    phrase: &str,
) -> Result<(StatusCode, ByteStr), Error> {
    let status = http::into_status_code(code)?;
    if phrase.is_empty() {
        return Ok((status, ByteStr::from_static(status.reason_phrase())));
    }
    if let Some((position, _)) = phrase.char_indices().find(|&(_, c)| is_other(c) && c != '\t') {
        debug!("rejected reason phrase {phrase:?} at {position}");
        return Err(Error::InvalidReasonPhrase {
            phrase: ByteStr::copy_from_str(phrase),
            position,
        });
    }
    Ok((status, ByteStr::copy_from_str(phrase)))
}

/// General category `Other`: control, format, surrogate, private use and unassigned.
fn is_other(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default() {
        let res = Response::default();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.reason_phrase(), "OK");
        assert_eq!(res.protocol_version(), "1.1");
    }

    #[test]
    fn test_status_boundaries() {
        let res = Response::default();
        assert_eq!(res.with_status(100, "").unwrap().reason_phrase(), "Continue");
        assert_eq!(res.with_status(599, "").unwrap().reason_phrase(), "");

        for code in [99, 600] {
            let err = res.with_status(code, "").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidStatusCode);
        }
        assert_eq!(res.status(), 200);
    }

    #[test]
    fn test_reason_phrase() {
        let res = Response::default().with_status(StatusCode::OK, "All\tGood").unwrap();
        assert_eq!(res.reason_phrase(), "All\tGood");

        let err = Response::default().with_status(200, "Bad\r\nPhrase").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidReasonPhrase);
        assert!(matches!(err, Error::InvalidReasonPhrase { position: 3, .. }));

        let err = Response::new(200, "caf\u{e9}\u{7}").unwrap_err();
        assert!(matches!(err, Error::InvalidReasonPhrase { position: 5, .. }));

        for phrase in ["OK\u{200B}", "OK\u{E000}", "OK\u{FEFF}", "OK\u{0378}"] {
            let err = Response::new(200, phrase).unwrap_err();
            assert!(matches!(err, Error::InvalidReasonPhrase { position: 2, .. }), "{phrase:?}");
        }
        assert!(Response::new(200, "Tr\u{e8}s bien \u{2014} \u{1F600}").is_ok());
    }

    #[test]
    fn test_filter_code_phrase() {
        let (code, phrase) = filter_code_phrase("201", "").unwrap();
        assert_eq!(code, 201);
        assert_eq!(phrase, "Created");

        let err = filter_code_phrase("2o1", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStatusCode);
    }
}
