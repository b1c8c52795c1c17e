use serde_json::json;

use super::*;
use crate::body::Body;
use crate::error::ErrorKind;
use crate::uri::Uri;

const fn is_send_sync<T: Send + Sync>() { }
const _: () = {
    is_send_sync::<ServerRequest>();
    is_send_sync::<MediaTypeParser>();
};

macro_rules! server {
    ($($key:literal => $value:literal),* $(,)?) => {
        ServerParams::from([$(($key.to_owned(), $value.to_owned())),*])
    };
}

fn names(req: &ServerRequest) -> Vec<&str> {
    req.headers().iter().map(|(name, _)| name.as_str()).collect()
}

#[test]
fn headers_from_server_params() {
    let req = ServerRequest::new("GET", "http://example.com/", server! {
        "CONTENT_TYPE" => "text/plain",
        "CONTENT_LENGTH" => "12",
        "CONTENT_MD5" => "abc",
        "HTTP_ACCEPT_LANGUAGE" => "en",
        "HTTP_X_FORWARDED_FOR" => "10.0.0.1",
        "HTTP_HOST" => "example.com",
        "SERVER_NAME" => "ignored",
    })
    .unwrap();

    assert_eq!(req.header_line("Content-Type"), "text/plain");
    assert_eq!(req.header_line("x-forwarded-for"), "10.0.0.1");
    assert_eq!(req.header_line("Host"), "example.com");
    assert!(!req.has_header("Server-Name"));
    assert_eq!(
        names(&req),
        ["Host", "Content-Length", "Content-Md5", "Content-Type", "Accept-Language", "X-Forwarded-For"],
    );
    assert_eq!(req.server_param("REQUEST_METHOD"), Some("GET"));
    assert_eq!(req.server_param("SERVER_NAME"), Some("ignored"));
}

#[test]
fn conflicting_host_is_rejected() {
    let err = ServerRequest::new("GET", "http://a.com/", server! { "HTTP_HOST" => "b.com" })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MultipleHostHeader);
}

#[test]
fn authorization_from_server_params() {
    let req = ServerRequest::new("GET", "/", server! {
        "PHP_AUTH_USER" => "user",
        "PHP_AUTH_PW" => "pass",
    })
    .unwrap();
    assert_eq!(req.header_line("Authorization"), "Basic dXNlcjpwYXNz");

    let req = ServerRequest::new("GET", "/", server! {
        "PHP_AUTH_USER" => "user",
        "REDIRECT_HTTP_AUTHORIZATION" => "Bearer token",
    })
    .unwrap();
    assert_eq!(req.header_line("Authorization"), "Bearer token");

    let req = ServerRequest::new("GET", "/", server! {
        "PHP_AUTH_DIGEST" => "Digest username=\"user\"",
        "HTTP_AUTHORIZATION" => "Basic override",
    })
    .unwrap();
    assert_eq!(req.header("Authorization"), ["Basic override"]);
    assert_eq!(names(&req), ["Authorization"]);
}

#[test]
fn protocol_version_from_server_params() {
    let req = ServerRequest::new("GET", "/", server! { "SERVER_PROTOCOL" => "HTTP/2.0" }).unwrap();
    assert_eq!(req.protocol_version(), "2.0");

    let req = ServerRequest::new("GET", "/", ServerParams::new()).unwrap();
    assert_eq!(req.protocol_version(), "1.1");

    let err = ServerRequest::new("GET", "/", server! { "SERVER_PROTOCOL" => "HTTP/1.2" })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedProtocolVersion);
}

#[test]
fn query_params() {
    let req = ServerRequest::new("GET", "/?a=1&b[]=x%20y", ServerParams::new()).unwrap();
    assert_eq!(req.query_params(), &json!({ "a": "1", "b": ["x y"] }));
    assert_eq!(req.query_param("a"), Some(&json!("1")));

    let new = req.with_uri(Uri::parse("/?c=2").unwrap(), false);
    assert_eq!(new.query_params(), &json!({ "c": "2" }));
    assert_eq!(req.query_params(), &json!({ "a": "1", "b": ["x y"] }));

    let new = req.with_query_params(json!({ "z": { "y": "x" } })).unwrap();
    assert_eq!(new.query_param("z"), Some(&json!({ "y": "x" })));
    assert_eq!(new.uri().query(), "a=1&b%5B%5D=x%20y");

    let err = req.with_query_params(json!({ "a": 1 })).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidQueryParams);

    let req = ServerRequest::new("GET", "/", ServerParams::new()).unwrap();
    assert_eq!(req.query_params(), &json!({}));
}

#[test]
fn cookie_params() {
    let req = ServerRequest::new("GET", "/", ServerParams::new()).unwrap();
    let cookies = BTreeMap::from([("session".to_owned(), "abc".to_owned())]);
    let new = req.with_cookie_params(cookies).unwrap();
    assert_eq!(new.cookie_param("session"), Some("abc"));
    assert!(req.cookie_params().is_empty());

    let cookies = BTreeMap::from([("bad;name".to_owned(), "abc".to_owned())]);
    let err = req.with_cookie_params(cookies).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCookieParams);
}

#[test]
#[cfg(all(feature = "json", feature = "form"))]
fn parsed_body() {
    let req = ServerRequest::new("POST", "/?a=query&q=1", ServerParams::new())
        .unwrap()
        .with_header("Content-Type", "application/json; charset=utf-8")
        .unwrap()
        .with_body(Body::from(r#"{"a":"body","n":1}"#));
    assert_eq!(req.parsed_body().unwrap(), Some(&json!({ "a": "body", "n": 1 })));
    assert_eq!(req.param("a").unwrap(), Some(&json!("body")));
    assert_eq!(req.param("q").unwrap(), Some(&json!("1")));
    assert_eq!(req.param("none").unwrap(), None);

    let params = req.params().unwrap();
    assert_eq!(params.keys().collect::<Vec<_>>(), ["a", "n", "q"]);
    assert_eq!(params["a"], "body");

    let form = req
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .unwrap();
    assert_ne!(form.parsed_body().unwrap(), req.parsed_body().unwrap());

    let form = form.with_body(Body::from("x=1&y[]=2"));
    assert_eq!(form.parsed_body().unwrap(), Some(&json!({ "x": "1", "y": ["2"] })));

    let plain = form.with_header("Content-Type", "text/plain").unwrap();
    assert_eq!(plain.parsed_body().unwrap(), None);

    let invalid = req.with_body(Body::from("{invalid"));
    assert_eq!(invalid.parsed_body().unwrap(), None);
}

#[test]
#[cfg(feature = "json")]
fn explicit_parsed_body() {
    let req = ServerRequest::new("POST", "/", ServerParams::new())
        .unwrap()
        .with_header("Content-Type", "application/vnd.api+json")
        .unwrap()
        .with_body(Body::from("[1]"));
    assert_eq!(req.parsed_body().unwrap(), Some(&json!([1])));

    let explicit = req.with_parsed_body(json!({ "set": "yes" })).unwrap();
    let replaced = explicit.with_body(Body::from("[2]"));
    assert_eq!(replaced.parsed_body().unwrap(), Some(&json!({ "set": "yes" })));

    let cleared = replaced.with_parsed_body(Value::Null).unwrap();
    assert_eq!(cleared.parsed_body().unwrap(), Some(&json!([2])));

    let err = req.with_parsed_body(json!("scalar")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParsedBody);
}

#[test]
fn custom_parser() {
    let mut req = ServerRequest::new("POST", "/", ServerParams::new())
        .unwrap()
        .with_header("Content-Type", "text/csv")
        .unwrap()
        .with_body(Body::from("a,b"));
    assert_eq!(req.parsed_body().unwrap(), None);

    req.register_media_type_parser("text/csv", |input| {
        Some(Value::Array(input.split(',').map(Value::from).collect()))
    });
    assert_eq!(req.parsed_body().unwrap(), Some(&json!(["a", "b"])));

    req.register_media_type_parser("text/csv", |_| Some(json!(1)));
    let err = req.parsed_body().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParsedBody);
}

#[test]
fn attributes() {
    let req = ServerRequest::new("GET", "/", ServerParams::new()).unwrap();
    let new = req.with_attribute("user", json!({ "id": 1 })).unwrap();
    assert_eq!(new.attribute("user"), Some(&json!({ "id": 1 })));
    assert_eq!(req.attribute("user"), None);
    assert_eq!(req.attribute_or("user", &json!(false)), &json!(false));

    let new = new.with_attributes([("a", 1), ("b", 2)]).unwrap();
    assert_eq!(new.attributes().len(), 3);

    let removed = new.without_attribute("a");
    assert_eq!(removed.attribute("a"), None);
    assert_eq!(new.attribute("a"), Some(&json!(1)));
    assert_eq!(removed.without_attribute("missing").attributes().len(), 2);

    let err = req.with_attribute("", 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAttributeName);
}

#[test]
fn media_type() {
    let req = ServerRequest::new("GET", "/", ServerParams::new()).unwrap();
    assert_eq!(req.media_type(), None);
    assert_eq!(req.media_type_params()["charset"], Value::Null);

    let req = req
        .with_header("Content-Type", "text/html; charset=ISO-8859-4; q=\"a\\\"b\"")
        .unwrap();
    assert_eq!(req.media_type().as_deref(), Some("text/html"));
    let params = req.media_type_params();
    assert_eq!(params["charset"], "iso-8859-4");
    assert_eq!(params["q"], "a\"b");
}

#[test]
fn secure_and_xhr() {
    let req = ServerRequest::new("GET", "https://a.com/", server! { "HTTPS" => "on" }).unwrap();
    assert!(req.is_secure());
    assert!(!req.is_xhr());

    let req = req.with_header("X-Requested-With", "XMLHttpRequest").unwrap();
    assert!(req.is_xhr());
}

#[test]
fn request_operations() {
    let req = ServerRequest::new("get", "http://a.com/p", ServerParams::new()).unwrap();
    assert_eq!(req.method(), "GET");
    assert_eq!(req.server_param("REQUEST_METHOD"), Some("get"));

    let new = req.without_header("Host");
    assert_eq!(new.header_line("Host"), "a.com");

    let new = req.with_method("post").unwrap().with_request_target("*").unwrap();
    assert_eq!(new.method(), "post");
    assert_eq!(new.request_target(), "*");

    let req = ServerRequest::from(Request::new("PUT", "/x").unwrap());
    assert_eq!(req.server_param("REQUEST_METHOD"), Some("PUT"));
}
