//! Query string parsing and request parameter validation.
use serde_json::{Map, Value};

use crate::common::ByteStr;
use crate::error::Error;
use crate::log::{debug, warning};
use crate::matches;

/// Parse `application/x-www-form-urlencoded` string into nested parameters.
///
/// `+` and percent encoded sequences are decoded. Keys support bracket nesting, `a[b]=1` set a
/// nested value and `a[]=1` appends to a list. Dots and spaces in keys are preserved. Objects
/// whose keys are exactly `0..n` become arrays. Keys nested deeper than 64 levels are dropped.
///
/// ```
/// use httpval::server_request::parse_query;
/// use serde_json::json;
///
/// assert_eq!(
///     parse_query("a.b=1&list[]=x&list[]=y&map[k]=v+w"),
///     json!({ "a.b": "1", "list": ["x", "y"], "map": { "k": "v w" } }),
/// );
/// ```
pub fn parse_query(query: &str) -> Value {
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
        Ok(pairs) => pairs,
        Err(_err) => {
            warning!("unable to parse query string {query:?}: {_err}");
            return Value::Object(Map::new());
        }
    };

    let mut root = Value::Object(Map::new());
    for (key, value) in pairs {
        let Some(path) = split_key(&key) else {
            continue;
        };
        assign(&mut root, &path, value);
    }
    into_lists(root)
}

/// `None` is an empty bracket, `[]`.
type Segment<'a> = Option<&'a str>;

/// Keys nested deeper than this are dropped.
const MAX_NESTING: usize = 64;

fn split_key(key: &str) -> Option<Vec<Segment<'_>>> {
    let (base, mut rest) = match key.find('[') {
        Some(open) => key.split_at(open),
        None => (key, ""),
    };
    if base.is_empty() {
        return None;
    }

    if !rest.is_empty() && !rest.contains(']') {
        // unbalanced bracket is not nesting
        return Some(vec![Some(key)]);
    }

    let mut path = vec![Some(base)];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        if path.len() > MAX_NESTING {
            debug!("dropped query key nested deeper than {MAX_NESTING}");
            return None;
        }
        let segment = &inner[..close];
        path.push((!segment.is_empty()).then_some(segment));
        rest = &inner[close + 1..];
    }
    Some(path)
}

fn assign(slot: &mut Value, path: &[Segment], value: String) {
    let Some((first, rest)) = path.split_first() else {
        *slot = Value::String(value);
        return;
    };
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    let Value::Object(map) = slot else {
        return;
    };
    let key = match first {
        Some(key) => (*key).to_owned(),
        None => next_index(map).to_string(),
    };
    let child = map.entry(key).or_insert(Value::Null);
    assign(child, rest, value);
}

fn next_index(map: &Map<String, Value>) -> u64 {
    map.keys()
        .filter_map(|key| key.parse::<u64>().ok())
        .max()
        .map_or(0, |max| max + 1)
}

fn into_lists(value: Value) -> Value {
    let Value::Object(map) = value else {
        return value;
    };
    let is_list = !map.is_empty()
        && map.keys().enumerate().all(|(i, key)| key.parse::<usize>() == Ok(i));
    if is_list {
        Value::Array(map.into_iter().map(|(_, v)| into_lists(v)).collect())
    } else {
        Value::Object(map.into_iter().map(|(k, v)| (k, into_lists(v))).collect())
    }
}

// ===== Validation =====

/// Query params must be an object or array whose leaves are all strings.
pub(crate) fn assert_query_params(params: &Value) -> Result<(), Error> {
    fn leaves_are_strings(value: &Value) -> bool {
        match value {
            Value::String(_) => true,
            Value::Array(list) => list.iter().all(leaves_are_strings),
            Value::Object(map) => map.values().all(leaves_are_strings),
            _ => false,
        }
    }

    if matches!(params, Value::Object(_) | Value::Array(_)) && leaves_are_strings(params) {
        Ok(())
    } else {
        debug!("rejected query params {params}");
        Err(Error::InvalidQueryParams)
    }
}

/// Parsed body must be null, an array or an object.
pub(crate) fn assert_parsed_body(body: &Value) -> Result<(), Error> {
    match body {
        Value::Null | Value::Array(_) | Value::Object(_) => Ok(()),
        _ => {
            debug!("rejected parsed body {body}");
            Err(Error::InvalidParsedBody)
        }
    }
}

/// Cookie name is visible ASCII excluding `"`, `,`, `;` and `\`.
pub(crate) fn assert_cookie_name(name: &str) -> Result<(), Error> {
    if !name.is_empty() && name.bytes().all(matches::is_cookie_name) {
        Ok(())
    } else {
        debug!("rejected cookie name {name:?}");
        Err(Error::InvalidCookieParams(ByteStr::copy_from_str(name)))
    }
}

pub(crate) fn assert_attribute_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        debug!("rejected empty attribute name");
        Err(Error::InvalidAttributeName)
    } else {
        Ok(())
    }
}
