//! Server side HTTP Request.
//!
//! [`ServerRequest`] is a [`Request`] received by a server, with the server environment,
//! cookies, query params, parsed body and attributes.
use base64ct::{Base64, Encoding};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::common::ByteStr;
use crate::error::Error;
use crate::headers::{HeaderName, HeaderValue};
use crate::http::ProtocolVersion;
use crate::log::warning;
use crate::message::{HttpMessage, Message, MessageParts};
use crate::request::{HttpRequest, Request, RequestParts};
use crate::uri::IntoUri;

mod params;
mod parser;

pub use params::parse_query;
pub use parser::{MediaTypeParser, FORM, JSON};

/// Server environment parameters, e.g: `REQUEST_METHOD` or `HTTP_HOST`.
pub type ServerParams = BTreeMap<String, String>;

/// Server side HTTP Request.
///
/// Query params and parsed body are derived from the URI query and the body on access, unless
/// explicitly set.
///
/// ```
/// use httpval::{HttpMessage, HttpRequest, server_request::{ServerRequest, ServerParams}};
/// use serde_json::json;
///
/// let server = ServerParams::from([
///     ("SERVER_PROTOCOL".to_owned(), "HTTP/1.0".to_owned()),
///     ("HTTP_X_REQUESTED_WITH".to_owned(), "XMLHttpRequest".to_owned()),
/// ]);
/// let req = ServerRequest::new("GET", "http://example.com/?a[]=1&a[]=2", server).unwrap();
///
/// assert_eq!(req.protocol_version(), "1.0");
/// assert!(req.is_xhr());
/// assert_eq!(req.query_params(), &json!({ "a": ["1", "2"] }));
/// ```
#[derive(Clone, Debug)]
pub struct ServerRequest {
    request: Request,
    server: Arc<ServerParams>,
    cookies: BTreeMap<String, String>,
    query: Option<Value>,
    derived_query: OnceLock<Value>,
    /// explicitly set, never null
    parsed_body: Option<Value>,
    derived_body: OnceLock<Option<Value>>,
    attributes: Map<String, Value>,
    parsers: parser::Parsers,
}

impl ServerRequest {
    /// Create new [`ServerRequest`].
    ///
    /// Protocol version is read from `SERVER_PROTOCOL`, and headers from `HTTP_*`,
    /// `CONTENT_TYPE`, `CONTENT_LENGTH` and `CONTENT_MD5`. An `Authorization` header is built from
    /// `REDIRECT_HTTP_AUTHORIZATION`, `PHP_AUTH_USER` and `PHP_AUTH_PW` as basic auth, or
    /// `PHP_AUTH_DIGEST`, in that order.
    ///
    /// # Errors
    ///
    /// Returns error if the method, URI, protocol version or one of the derived header is
    /// invalid.
    pub fn new<U: IntoUri>(method: &str, uri: U, server_params: ServerParams) -> Result<Self, Error> {
        let mut request = Request::new(method, uri)?;

        if let Some(protocol) = server_params.get("SERVER_PROTOCOL") {
            let version = ProtocolVersion::try_from_str(&protocol.replace("HTTP/", ""))?;
            request.message_mut().set_version(version);
        }

        for (name, value) in headers_from_server(&server_params) {
            let name = HeaderName::from_shared(ByteStr::from(name))?;
            let value = HeaderValue::from_shared(ByteStr::from(value))?;
            request.message_mut().headers_mut().append(name, vec![value])?;
        }

        let mut server = ServerParams::from([("REQUEST_METHOD".to_owned(), method.to_owned())]);
        server.extend(server_params);

        Ok(Self {
            request,
            server: Arc::new(server),
            cookies: BTreeMap::new(),
            query: None,
            derived_query: OnceLock::new(),
            parsed_body: None,
            derived_body: OnceLock::new(),
            attributes: Map::new(),
            parsers: parser::Parsers::new(),
        })
    }

    /// Create [`ServerRequest`] from a [`Request`] with empty server params.
    pub fn from_request(request: Request) -> Self {
        let method = request.method().to_string();
        Self {
            request,
            server: Arc::new(ServerParams::from([("REQUEST_METHOD".to_owned(), method)])),
            cookies: BTreeMap::new(),
            query: None,
            derived_query: OnceLock::new(),
            parsed_body: None,
            derived_body: OnceLock::new(),
            attributes: Map::new(),
            parsers: parser::Parsers::new(),
        }
    }

    /// Register a body parser for a media type.
    ///
    /// Parsers for `application/x-www-form-urlencoded` and `application/json` are registered by
    /// default when the `form` and `json` features are enabled.
    pub fn register_media_type_parser<F>(&mut self, media_type: &str, parser: F)
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.parsers.register(media_type, Arc::new(parser));
        self.derived_body = OnceLock::new();
    }
}

// ===== Server Params =====

impl ServerRequest {
    /// Returns the server params.
    #[inline]
    pub fn server_params(&self) -> &ServerParams {
        &self.server
    }

    /// Returns a server param.
    #[inline]
    pub fn server_param(&self, key: &str) -> Option<&str> {
        self.server.get(key).map(String::as_str)
    }

    /// Returns `true` if `HTTPS` server param is `on`.
    #[inline]
    pub fn is_secure(&self) -> bool {
        self.server_param("HTTPS") == Some("on")
    }

    /// Returns `true` if `X-Requested-With` header is `XMLHttpRequest`.
    #[inline]
    pub fn is_xhr(&self) -> bool {
        self.header_line("X-Requested-With") == "XMLHttpRequest"
    }
}

// ===== Cookies =====

impl ServerRequest {
    /// Returns the cookies.
    #[inline]
    pub fn cookie_params(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// Returns a cookie value.
    #[inline]
    pub fn cookie_param(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns a copy with the given cookies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCookieParams`] if a cookie name is empty or contains whitespace,
    /// control character, `"`, `,`, `;` or `\`.
    pub fn with_cookie_params(&self, cookies: BTreeMap<String, String>) -> Result<Self, Error> {
        for name in cookies.keys() {
            params::assert_cookie_name(name)?;
        }
        let mut new = self.clone();
        new.cookies = cookies;
        Ok(new)
    }
}

// ===== Query Params =====

impl ServerRequest {
    /// Returns the query params.
    ///
    /// If not explicitly set, they are parsed from the URI query with [`parse_query`].
    pub fn query_params(&self) -> &Value {
        if let Some(query) = &self.query {
            return query;
        }
        self.derived_query.get_or_init(|| match self.uri().query() {
            "" => Value::Object(Map::new()),
            query => parse_query(query),
        })
    }

    /// Returns a top level query param.
    #[inline]
    pub fn query_param(&self, key: &str) -> Option<&Value> {
        self.query_params().get(key)
    }

    /// Returns a copy with the given query params.
    ///
    /// The URI is not changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQueryParams`] if `query` is not an object or array whose leaves
    /// are all strings.
    pub fn with_query_params(&self, query: Value) -> Result<Self, Error> {
        params::assert_query_params(&query)?;
        let mut new = self.clone();
        new.query = Some(query);
        Ok(new)
    }
}

// ===== Parsed Body =====

impl ServerRequest {
    /// Returns the parsed body.
    ///
    /// If not explicitly set, the body is parsed with the parser registered for the
    /// `Content-Type` header. Returns `None` if there is no parser or the body cannot be parsed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParsedBody`] if the parser returns a scalar value.
    pub fn parsed_body(&self) -> Result<Option<&Value>, Error> {
        if let Some(body) = &self.parsed_body {
            return Ok(Some(body));
        }
        if let Some(body) = self.derived_body.get() {
            return Ok(body.as_ref());
        }
        let parsed = self.parse_body()?;
        Ok(self.derived_body.get_or_init(|| parsed).as_ref())
    }

    fn parse_body(&self) -> Result<Option<Value>, Error> {
        let content_type = self.header_line("Content-Type");
        let Some(parser) = self.parsers.find(&content_type) else {
            return Ok(None);
        };
        let parsed = parser(&self.body().to_string_lossy());
        match &parsed {
            Some(value) => params::assert_parsed_body(value)?,
            None => {
                warning!("unable to parse body of content type {content_type:?}");
            }
        }
        Ok(parsed.filter(|value| !value.is_null()))
    }

    /// Returns a top level value of the parsed body.
    pub fn parsed_body_param(&self, key: &str) -> Result<Option<&Value>, Error> {
        Ok(self.parsed_body()?.and_then(|body| body.get(key)))
    }

    /// Returns a copy with the given parsed body.
    ///
    /// Setting `null` makes the parsed body derived from the body again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParsedBody`] if `body` is not null, an array or an object.
    pub fn with_parsed_body(&self, body: Value) -> Result<Self, Error> {
        params::assert_parsed_body(&body)?;
        let mut new = self.clone();
        new.parsed_body = (!body.is_null()).then_some(body);
        new.derived_body = OnceLock::new();
        Ok(new)
    }

    /// Returns a param from the parsed body, or from the query params if not present in the
    /// body.
    pub fn param(&self, key: &str) -> Result<Option<&Value>, Error> {
        match self.parsed_body_param(key)? {
            Some(value) if !value.is_null() => Ok(Some(value)),
            _ => Ok(self.query_param(key)),
        }
    }

    /// Returns the query params merged with the parsed body, sorted by key.
    ///
    /// Parsed body values take precedence.
    pub fn params(&self) -> Result<Map<String, Value>, Error> {
        fn entries(value: &Value) -> Vec<(String, Value)> {
            match value {
                Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                Value::Array(list) => list
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v.clone()))
                    .collect(),
                _ => Vec::new(),
            }
        }

        let mut params = BTreeMap::new();
        params.extend(entries(self.query_params()));
        if let Some(body) = self.parsed_body()? {
            params.extend(entries(body));
        }
        Ok(params.into_iter().collect())
    }
}

// ===== Media Type =====

impl ServerRequest {
    /// Returns the media type of the `Content-Type` header, without parameters.
    pub fn media_type(&self) -> Option<String> {
        parser::media_type(&self.header_line("Content-Type")).map(str::to_owned)
    }

    /// Returns the parameters of the `Content-Type` header.
    ///
    /// `charset` is always present, `null` if not given.
    pub fn media_type_params(&self) -> Map<String, Value> {
        let content_type = self.header("Content-Type").first().map(HeaderValue::as_str);
        parser::media_type_params(content_type)
    }
}

// ===== Attributes =====

impl ServerRequest {
    /// Returns all attributes.
    #[inline]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns an attribute.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns an attribute, or `default` if not present.
    #[inline]
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.attribute(name).unwrap_or(default)
    }

    /// Returns a copy with the given attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttributeName`] if `name` is empty.
    pub fn with_attribute<V: Into<Value>>(&self, name: &str, value: V) -> Result<Self, Error> {
        params::assert_attribute_name(name)?;
        let mut new = self.clone();
        new.attributes.insert(name.to_owned(), value.into());
        Ok(new)
    }

    /// Returns a copy with all the given attributes set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttributeName`] if one of the name is empty.
    pub fn with_attributes<I, K, V>(&self, attributes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut new = self.clone();
        for (name, value) in attributes {
            let name = name.into();
            params::assert_attribute_name(&name)?;
            new.attributes.insert(name, value.into());
        }
        Ok(new)
    }

    /// Returns a copy without the given attribute.
    ///
    /// Returns an unchanged copy if the attribute is not present.
    pub fn without_attribute(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.attributes.shift_remove(name);
        new
    }
}

// ===== Message =====

impl MessageParts for ServerRequest {
    #[inline]
    fn message(&self) -> &Message {
        self.request.message()
    }

    #[inline]
    fn message_mut(&mut self) -> &mut Message {
        self.request.message_mut()
    }

    fn on_header_set(&mut self, name: &HeaderName) {
        if name.eq_ignore_ascii_case("content-type") {
            self.derived_body = OnceLock::new();
        }
    }

    fn on_header_removed(&mut self, name: &HeaderName) {
        self.request.on_header_removed(name);
        self.on_header_set(name);
    }

    fn on_body_replaced(&mut self) {
        self.derived_body = OnceLock::new();
    }
}

impl HttpMessage for ServerRequest { }

impl RequestParts for ServerRequest {
    #[inline]
    fn request(&self) -> &Request {
        &self.request
    }

    #[inline]
    fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    fn on_uri_replaced(&mut self) {
        self.derived_query = OnceLock::new();
    }
}

impl HttpRequest for ServerRequest { }

impl From<Request> for ServerRequest {
    #[inline]
    fn from(value: Request) -> Self {
        Self::from_request(value)
    }
}

// ===== Server Headers =====

/// Headers in order, `Authorization` first.
fn headers_from_server(server: &ServerParams) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    let mut put = |name: String, value: &str| {
        match headers.iter_mut().find(|(n, _)| *n == name) {
            Some((_, old)) => value.clone_into(old),
            None => headers.push((name, value.to_owned())),
        }
    };

    if let Some(auth) = authorization(server) {
        put("Authorization".to_owned(), auth.as_str());
    }

    for (key, value) in server {
        let value = value.as_str();
        match key.as_str() {
            "CONTENT_LENGTH" => put("Content-Length".to_owned(), value),
            "CONTENT_MD5" => put("Content-Md5".to_owned(), value),
            "CONTENT_TYPE" => put("Content-Type".to_owned(), value),
            key => {
                if let Some(name) = key.strip_prefix("HTTP_") {
                    put(header_case(name), value);
                }
            }
        }
    }
    headers
}

/// `X_FORWARDED_FOR` into `X-Forwarded-For`
fn header_case(name: &str) -> String {
    let mut output = String::with_capacity(name.len());
    for (i, word) in name.split('_').enumerate() {
        if i != 0 {
            output.push('-');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            output.push(first.to_ascii_uppercase());
            output.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    output
}

fn authorization(server: &ServerParams) -> Option<String> {
    if let Some(auth) = server.get("REDIRECT_HTTP_AUTHORIZATION") {
        return Some(auth.clone());
    }
    if let Some(user) = server.get("PHP_AUTH_USER") {
        let pass = server.get("PHP_AUTH_PW").map_or("", String::as_str);
        let credentials = format!("{user}:{pass}");
        let mut dst = vec![0; Base64::encoded_len(credentials.as_bytes())];
        return match Base64::encode(credentials.as_bytes(), &mut dst) {
            Ok(encoded) => Some(format!("Basic {encoded}")),
            Err(_err) => {
                warning!("unable to encode basic credentials: {_err}");
                None
            }
        };
    }
    server.get("PHP_AUTH_DIGEST").cloned()
}

#[cfg(test)]
mod test;
