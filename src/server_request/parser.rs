//! Media type body parsers.
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::log::warning;

/// `application/x-www-form-urlencoded`
pub const FORM: &str = "application/x-www-form-urlencoded";

/// `application/json`
pub const JSON: &str = "application/json";

/// A function that parse a request body of a specific media type.
///
/// Returns `None` if the body cannot be parsed.
pub type MediaTypeParser = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Registry of [`MediaTypeParser`] keyed by lowercase media type.
#[derive(Clone)]
pub(crate) struct Parsers {
    parsers: Arc<BTreeMap<String, MediaTypeParser>>,
}

impl Parsers {
    /// Registry with the parsers of enabled features.
    pub(crate) fn new() -> Self {
        #[allow(unused_mut, reason = "parsers are feature gated")]
        let mut parsers = BTreeMap::<String, MediaTypeParser>::new();
        #[cfg(feature = "form")]
        parsers.insert(FORM.to_owned(), Arc::new(parse_form));
        #[cfg(feature = "json")]
        parsers.insert(JSON.to_owned(), Arc::new(parse_json));
        Self {
            parsers: Arc::new(parsers),
        }
    }

    pub(crate) fn register(&mut self, media_type: &str, parser: MediaTypeParser) {
        Arc::make_mut(&mut self.parsers).insert(media_type.to_ascii_lowercase(), parser);
    }

    /// Find parser for a `Content-Type` header line.
    ///
    /// Parameters are ignored, and a structured syntax suffix ([RFC6839]) falls back to
    /// `application/<suffix>`.
    ///
    /// [RFC6839]: <https://www.rfc-editor.org/rfc/rfc6839>
    pub(crate) fn find(&self, content_type: &str) -> Option<&MediaTypeParser> {
        let media_type = content_type
            .split([';', ','])
            .next()
            .unwrap_or_default()
            .trim_end()
            .to_ascii_lowercase();
        if let Some(parser) = self.parsers.get(&media_type) {
            return Some(parser);
        }
        let (_, suffix) = media_type.rsplit_once('+')?;
        self.parsers.get(&format!("application/{suffix}"))
    }
}

impl std::fmt::Debug for Parsers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.parsers.keys()).finish()
    }
}

#[cfg(feature = "form")]
fn parse_form(input: &str) -> Option<Value> {
    Some(super::params::parse_query(input))
}

#[cfg(feature = "json")]
fn parse_json(input: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(input) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => Some(value),
        Ok(_) => None,
        Err(_err) => {
            warning!("unable to parse json body: {_err}");
            None
        }
    }
}

// ===== Media Type =====

/// Returns the media type of a `Content-Type` value, without parameters.
pub(crate) fn media_type(content_type: &str) -> Option<&str> {
    let media_type = content_type.split([';', ',']).next().unwrap_or_default().trim_end();
    (!media_type.is_empty()).then_some(media_type)
}

/// Parse `Content-Type` parameters ([RFC7231 Section 3.1.1.1]).
///
/// Keys are lowercased, quoted values are unquoted and unescaped. `charset` is always present,
/// `null` if not given, and lowercased otherwise.
///
/// [RFC7231 Section 3.1.1.1]: <https://www.rfc-editor.org/rfc/rfc7231#section-3.1.1.1>
pub(crate) fn media_type_params(content_type: Option<&str>) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("charset".to_owned(), Value::Null);

    let Some(content_type) = content_type else {
        return params;
    };
    let params_str = match content_type.find([';', ',']) {
        Some(delim) => content_type[delim + 1..].trim_start(),
        None => content_type,
    };

    let mut cursor = 0;
    while cursor < params_str.len() {
        match match_param(&params_str[cursor..]) {
            Some((key, value, len)) => {
                let key = key.to_ascii_lowercase();
                let mut value = unescape(value.trim_matches('"'));
                if key == "charset" {
                    value.make_ascii_lowercase();
                }
                params.insert(key, Value::String(value));
                cursor += len;
            }
            None => {
                // no match can start inside the same key
                let rest = &params_str[cursor..];
                cursor += match key_len(rest) {
                    0 => rest.chars().next().map_or(1, char::len_utf8),
                    len => len,
                };
            }
        }
    }
    params
}

fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '"' | ';' | ',')
}

fn key_len(input: &str) -> usize {
    input.find(|c| !is_token_char(c) || c == '=').unwrap_or(input.len())
}

/// Match `key *WS "=" *WS value` at the start of `input`, returns key, raw value and the
/// matched length.
fn match_param(input: &str) -> Option<(&str, &str, usize)> {
    let key_len = key_len(input);
    if key_len == 0 {
        return None;
    }
    let rest = input[key_len..].trim_start().strip_prefix('=')?.trim_start();
    let value_start = input.len() - rest.len();
    let end = value_start + match_value(rest)?;
    Some((&input[..key_len], &input[value_start..end], end))
}

/// Match a quoted string or a token, returns the matched length.
fn match_value(input: &str) -> Option<usize> {
    let Some(quoted) = input.strip_prefix('"') else {
        let len = input.find(|c| !is_token_char(c)).unwrap_or(input.len());
        return (len != 0).then_some(len);
    };

    let bytes = quoted.as_bytes();
    let mut escaped_quote = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'"') => {
                escaped_quote = Some(i + 1);
                i += 2;
            }
            b'"' => return Some(i + 2),
            _ => i += 1,
        }
    }
    // unterminated, the last escaped quote closes the string
    escaped_quote.map(|i| i + 2)
}

/// Remove backslash escapes, `\\` become `\`.
fn unescape(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => output.extend(chars.next()),
            c => output.push(c),
        }
    }
    output
}
