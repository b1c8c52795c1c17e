//! Reference resolution ([RFC3986 Section 5.2]).
//!
//! [RFC3986 Section 5.2]: <https://datatracker.ietf.org/doc/html/rfc3986#section-5.2>
use super::Uri;
use crate::common::ByteStr;
use crate::log::trace;

/// Resolve `relative` reference against `base`.
///
/// ```
/// use httpval::uri::{Uri, resolve};
///
/// let base = Uri::parse("http://a/b/c/d;p?q").unwrap();
/// let rel = Uri::parse("../../g").unwrap();
/// assert_eq!(resolve(&base, &rel).to_string(), "http://a/g");
/// ```
pub fn resolve(base: &Uri, relative: &Uri) -> Uri {
    if relative.is_empty() {
        return base.clone();
    }

    let target = if !relative.scheme().is_empty() {
        relative.with_raw(
            remove_dot_segments(relative.path()),
            None,
            ByteStr::copy_from_str(relative.fragment()),
        )
    } else if !relative.authority().is_empty() {
        relative
            .with_raw_scheme(ByteStr::copy_from_str(base.scheme()))
            .with_raw(
                remove_dot_segments(relative.path()),
                None,
                ByteStr::copy_from_str(relative.fragment()),
            )
    } else if relative.path().is_empty() {
        let query = match relative.query() {
            "" => base.query(),
            query => query,
        };
        base.with_raw(
            ByteStr::copy_from_str(base.path()),
            Some(ByteStr::copy_from_str(query)),
            ByteStr::copy_from_str(relative.fragment()),
        )
    } else {
        base.with_raw(
            remove_dot_segments(&merge_paths(base, relative.path())),
            Some(ByteStr::copy_from_str(relative.query())),
            ByteStr::copy_from_str(relative.fragment()),
        )
    };

    trace!("resolved {relative} against {base} into {target}");
    target
}

fn merge_paths(base: &Uri, relative: &str) -> String {
    if relative.starts_with('/') {
        return relative.to_owned();
    }
    if !base.authority().is_empty() && base.path().is_empty() {
        return format!("/{relative}");
    }
    match base.path().rfind('/') {
        Some(slash) => format!("{}{relative}", &base.path()[..=slash]),
        None => relative.to_owned(),
    }
}

/// Remove `.` and `..` segments of a path.
///
/// `..` without preceding segment is ignored. Leading `/` is kept for absolute path, and
/// trailing `/` is added when the last segment is a dot segment.
///
/// ```
/// use httpval::uri::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
/// assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
/// ```
pub fn remove_dot_segments(path: &str) -> ByteStr {
    if path.is_empty() {
        return ByteStr::new();
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let mut output = segments.join("/");

    if path.starts_with('/') && !output.starts_with('/') {
        output.insert(0, '/');
    } else if !output.is_empty() && matches!(path.rsplit('/').next(), Some("." | "..")) {
        output.push('/');
    }

    ByteStr::from(output)
}

/// Returns `true` if two URIs do not share the same origin.
///
/// Hosts are compared case-insensitively. When port is not present, `443` is assumed for `https`
/// and `80` otherwise.
pub fn is_cross_origin(left: &Uri, right: &Uri) -> bool {
    !left.host().eq_ignore_ascii_case(right.host())
        || left.scheme() != right.scheme()
        || effective_port(left) != effective_port(right)
}

fn effective_port(uri: &Uri) -> u16 {
    match uri.port() {
        Some(port) => port,
        None if uri.scheme() == "https" => 443,
        None => 80,
    }
}
