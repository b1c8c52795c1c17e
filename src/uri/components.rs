//! Validation and percent encoding primitives of URI components.
//!
//! Every function here is pure. Encoding functions return [`Cow::Borrowed`] when the input is
//! already in its normalized form.
use std::borrow::Cow;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::UriError;
use crate::common::ByteStr;
use crate::log::debug;
use crate::matches;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

// ===== Ports =====

/// Returns the well-known port of given lowercase scheme.
///
/// ```
/// use httpval::uri::components::standard_port;
///
/// assert_eq!(standard_port("https"), Some(443));
/// assert_eq!(standard_port("ws"), None);
/// ```
pub const fn standard_port(scheme: &str) -> Option<u16> {
    match scheme.as_bytes() {
        b"ftp" => Some(21),
        b"http" => Some(80),
        b"https" => Some(443),
        _ => None,
    }
}

/// Returns `true` if `port` is the well-known port of `scheme`.
#[inline]
pub fn is_standard_port(scheme: &str, port: u16) -> bool {
    standard_port(scheme) == Some(port)
}

/// Assert port is in range of `1..=65535`.
///
/// # Errors
///
/// Returns [`UriError::InvalidPort`] otherwise.
pub fn assert_port(port: u32) -> Result<u16, UriError> {
    match u16::try_from(port) {
        Ok(port) if port != 0 => Ok(port),
        _ => {
            debug!("rejected port {port}");
            let mut buf = itoa::Buffer::new();
            Err(UriError::InvalidPort(ByteStr::copy_from_str(buf.format(port))))
        }
    }
}

/// Coerce textual port into a validated port.
///
/// `None` is passed through, a string of ASCII digits is converted then checked with
/// [`assert_port`].
///
/// # Errors
///
/// Returns [`UriError::InvalidPort`] if the string is not numeric or out of range.
pub fn filter_port(port: Option<&str>) -> Result<Option<u16>, UriError> {
    let Some(port) = port else {
        return Ok(None);
    };
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        debug!("rejected port {port:?}");
        return Err(UriError::InvalidPort(ByteStr::copy_from_str(port)));
    }
    match port.parse::<u32>() {
        Ok(port) => assert_port(port).map(Some),
        Err(_) => Err(UriError::InvalidPort(ByteStr::copy_from_str(port))),
    }
}

// ===== Scheme =====

/// Assert scheme is either empty or match `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
///
/// # Errors
///
/// Returns [`UriError::InvalidScheme`] otherwise.
pub fn assert_scheme(scheme: &str) -> Result<(), UriError> {
    match scheme.as_bytes().split_first() {
        None => Ok(()),
        Some((first, rest))
            if first.is_ascii_alphabetic() && rest.iter().all(|&b| matches::is_scheme(b)) =>
        {
            Ok(())
        }
        Some(_) => {
            debug!("rejected scheme {scheme:?}");
            Err(UriError::InvalidScheme(ByteStr::copy_from_str(scheme)))
        }
    }
}

// ===== Host =====

/// Assert host is empty, `localhost`, a hostname, or an IP literal.
///
/// Hostname is either a single label, or dot separated labels ending with an alphabetic top level
/// domain of 2 to 63 characters with total length of 4 to 253. A label is 1 to 63 alphanumeric or
/// hyphen, and cannot start or end with hyphen.
///
/// IPv6 literal may or may not be enclosed in brackets.
///
/// # Errors
///
/// Returns [`UriError::InvalidHost`] otherwise.
pub fn assert_host(host: &str) -> Result<(), UriError> {
    if host.is_empty() || host == "localhost" || is_hostname(host) || is_ip_literal(host) {
        return Ok(());
    }
    debug!("rejected host {host:?}");
    Err(UriError::InvalidHost(ByteStr::copy_from_str(host)))
}

fn is_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last)) => {
            first != b'-'
                && last != b'-'
                && bytes.len() <= 63
                && bytes.iter().all(|&b| matches::is_label(b))
        }
        _ => false,
    }
}

fn is_hostname(host: &str) -> bool {
    match host.rsplit_once('.') {
        None => is_label(host),
        Some((labels, tld)) => {
            (4..=253).contains(&host.len())
                && (2..=63).contains(&tld.len())
                && tld.bytes().all(|b| b.is_ascii_alphabetic())
                && labels.split('.').all(is_label)
        }
    }
}

fn is_ip_literal(host: &str) -> bool {
    if host.parse::<Ipv4Addr>().is_ok() {
        return true;
    }
    let inner = match host.strip_prefix('[') {
        Some(host) => match host.strip_suffix(']') {
            Some(inner) => inner,
            None => return false,
        },
        None => host,
    };
    inner.parse::<Ipv6Addr>().is_ok()
}

/// Lowercase and validate host, bare IPv6 literal is enclosed in brackets.
pub(crate) fn filter_host(host: &str) -> Result<Cow<'_, str>, UriError> {
    let host = lowercase(host);
    assert_host(&host)?;
    if host.contains(':') && !host.starts_with('[') {
        return Ok(Cow::Owned(format!("[{host}]")));
    }
    Ok(host)
}

// ===== Percent Encoding =====

/// Percent encode characters not allowed in path.
///
/// Allowed characters are `unreserved`, `sub-delims`, `:`, `@`, `/` and `%`. A `%` that is not
/// followed by two hex digits is encoded as `%25`. Valid percent encoded sequences are kept as
/// is, so this function is idempotent.
///
/// ```
/// use httpval::uri::components::filter_path;
///
/// assert_eq!(filter_path("/pa th/%20/100%"), "/pa%20th/%20/100%25");
/// ```
#[inline]
pub fn filter_path(path: &str) -> Cow<'_, str> {
    encode_with(path, matches::is_path)
}

/// Same as [`filter_path`], but additionally allows `?`.
#[inline]
pub fn filter_query_and_fragment(value: &str) -> Cow<'_, str> {
    encode_with(value, matches::is_query)
}

/// Percent encode the user part of user info, `:` is encoded.
#[inline]
pub(crate) fn filter_user(user: &str) -> Cow<'_, str> {
    encode_with(user, matches::is_user)
}

/// Percent encode the password part of user info.
#[inline]
pub(crate) fn filter_password(password: &str) -> Cow<'_, str> {
    encode_with(password, matches::is_userinfo)
}

const fn is_pct_encoded(bytes: &[u8]) -> bool {
    matches!(bytes, [b'%', a, b, ..] if a.is_ascii_hexdigit() && b.is_ascii_hexdigit())
}

fn encode_with(value: &str, allowed: fn(u8) -> bool) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    let needs_encoding =
        |i: usize| !allowed(bytes[i]) || (bytes[i] == b'%' && !is_pct_encoded(&bytes[i..]));

    let Some(first) = (0..bytes.len()).find(|&i| needs_encoding(i)) else {
        return Cow::Borrowed(value);
    };

    // all bytes before `first` are allowed ASCII, so it is a char boundary
    let mut output = String::with_capacity(bytes.len() + 8);
    output.push_str(&value[..first]);

    for (i, &byte) in bytes.iter().enumerate().skip(first) {
        if needs_encoding(i) {
            output.push('%');
            output.push(HEX[(byte >> 4) as usize] as char);
            output.push(HEX[(byte & 0x0F) as usize] as char);
        } else {
            output.push(byte as char);
        }
    }

    Cow::Owned(output)
}

/// Decode percent encoded sequences, invalid UTF-8 is replaced lossily.
pub(crate) fn percent_decode(value: &str) -> Cow<'_, str> {
    if !value.contains('%') {
        return Cow::Borrowed(value);
    }

    let bytes = value.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if is_pct_encoded(&bytes[i..]) {
            output.push(hex_value(bytes[i + 1]) << 4 | hex_value(bytes[i + 2]));
            i += 3;
        } else {
            output.push(bytes[i]);
            i += 1;
        }
    }

    match String::from_utf8(output) {
        Ok(ok) => Cow::Owned(ok),
        Err(err) => Cow::Owned(String::from_utf8_lossy(err.as_bytes()).into_owned()),
    }
}

const fn hex_value(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        b'A'..=b'F' => byte - b'A' + 10,
        _ => 0,
    }
}

// ===== Misc =====

/// Adjust path so that serialized URI is not ambiguous.
///
/// - rootless path with non-empty authority is prefixed with `/`
/// - path starting with `//` without authority is reduced to a single leading `/`
pub fn create_uri_path<'a>(authority: &str, path: &'a str) -> Cow<'a, str> {
    if path.is_empty() {
        return Cow::Borrowed(path);
    }
    if !path.starts_with('/') && !authority.is_empty() {
        return Cow::Owned(format!("/{path}"));
    }
    if path.starts_with("//") && authority.is_empty() {
        return Cow::Owned(format!("/{}", path.trim_start_matches('/')));
    }
    Cow::Borrowed(path)
}

/// ASCII only, locale independent lowercase.
pub fn lowercase(value: &str) -> Cow<'_, str> {
    if value.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(value.to_ascii_lowercase())
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hosts() {
        for host in [
            "",
            "localhost",
            "example.com",
            "www.example.co.uk",
            "a",
            "0",
            "xn--80ak6aa92e.com",
            "127.0.0.1",
            "::1",
            "[::1]",
            "[2001:db8::7]",
        ] {
            assert!(assert_host(host).is_ok(), "{host:?}");
        }

        for host in [
            "example_test.com",
            "-example.com",
            "example-.com",
            "example.c",
            "example.123",
            "a b",
            "[127.0.0.1]",
            "[::1",
        ] {
            assert!(
                matches!(assert_host(host), Err(UriError::InvalidHost(_))),
                "{host:?}"
            );
        }

        let long_label = "a".repeat(64);
        assert!(assert_host(&long_label).is_err());
        assert!(assert_host(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn test_filter_host() {
        assert_eq!(filter_host("ExAmple.COM").unwrap(), "example.com");
        assert_eq!(filter_host("::1").unwrap(), "[::1]");
        assert_eq!(filter_host("[::1]").unwrap(), "[::1]");
    }

    #[test]
    fn test_scheme() {
        assert!(assert_scheme("").is_ok());
        assert!(assert_scheme("http").is_ok());
        assert!(assert_scheme("svn+SSH").is_ok());
        assert!(assert_scheme("a.b-c").is_ok());
        assert!(matches!(assert_scheme("0scheme"), Err(UriError::InvalidScheme(_))));
        assert!(assert_scheme("ht tp").is_err());
        assert!(assert_scheme("+http").is_err());
    }

    #[test]
    fn test_port() {
        assert_eq!(assert_port(1).unwrap(), 1);
        assert_eq!(assert_port(65535).unwrap(), 65535);
        assert!(matches!(assert_port(0), Err(UriError::InvalidPort(_))));
        assert!(assert_port(65536).is_err());
        assert!(assert_port(10000000).is_err());

        assert_eq!(filter_port(None).unwrap(), None);
        assert_eq!(filter_port(Some("8080")).unwrap(), Some(8080));
        assert!(filter_port(Some("")).is_err());
        assert!(filter_port(Some("80a")).is_err());
        assert!(filter_port(Some("99999999999")).is_err());
    }

    #[test]
    fn test_standard_port() {
        assert!(is_standard_port("http", 80));
        assert!(is_standard_port("https", 443));
        assert!(is_standard_port("ftp", 21));
        assert!(!is_standard_port("http", 443));
        assert!(!is_standard_port("gopher", 70));
    }

    #[test]
    fn test_filter_path() {
        assert_eq!(filter_path("/foo/bar"), "/foo/bar");
        assert!(matches!(filter_path("/foo/bar"), Cow::Borrowed(_)));
        assert_eq!(filter_path("/pa%2-th"), "/pa%252-th");
        assert_eq!(filter_path("/pa th"), "/pa%20th");
        assert_eq!(filter_path("/%7Ecat"), "/%7Ecat");
        assert_eq!(filter_path("€"), "%E2%82%AC");
        assert_eq!(filter_path("/?#"), "/%3F%23");
        assert_eq!(filter_path("/a:b@c!$&'()*+,;="), "/a:b@c!$&'()*+,;=");
        assert_eq!(filter_path("100%"), "100%25");
    }

    #[test]
    fn test_filter_is_idempotent() {
        for input in ["/pa%2-th", "€ / %", "a%%41b", "/%zz?#[]", "/ok", "%", "%4"] {
            let once = filter_path(input).into_owned();
            assert_eq!(filter_path(&once), once.as_str(), "{input:?}");

            let once = filter_query_and_fragment(input).into_owned();
            assert_eq!(filter_query_and_fragment(&once), once.as_str(), "{input:?}");
        }
    }

    #[test]
    fn test_filter_query() {
        assert_eq!(filter_query_and_fragment("a=b&c=d?e"), "a=b&c=d?e");
        assert_eq!(filter_query_and_fragment("a b#c"), "a%20b%23c");
        assert_eq!(filter_query_and_fragment("q=%ZZ"), "q=%25ZZ");
    }

    #[test]
    fn test_userinfo() {
        assert_eq!(filter_user("us:er@"), "us%3Aer%40");
        assert_eq!(filter_password("pa:ss"), "pa:ss");
        assert_eq!(percent_decode("us%3Aer%40"), "us:er@");
        assert_eq!(percent_decode("%E2%82%AC%zz"), "€%zz");
    }

    #[test]
    fn test_create_uri_path() {
        assert_eq!(create_uri_path("", ""), "");
        assert_eq!(create_uri_path("example.com", "foo"), "/foo");
        assert_eq!(create_uri_path("", "foo"), "foo");
        assert_eq!(create_uri_path("", "//foo//bar"), "/foo//bar");
        assert_eq!(create_uri_path("example.com", "//foo"), "//foo");
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(lowercase("HTTP"), "http");
        assert_eq!(lowercase("İx"), "İx");
        assert!(matches!(lowercase("http"), Cow::Borrowed(_)));
    }
}
