use crate::headers::{AsHeaderName, IntoHeaderValues};
use crate::headers::{HeaderError, HeaderMap, HeaderName, HeaderValue, standard};

const fn is_send_sync<T: Send + Sync>() { }
const _: () = {
    is_send_sync::<HeaderMap>();
    is_send_sync::<HeaderName>();
    is_send_sync::<HeaderValue>();
    is_send_sync::<HeaderError>();
    fn _is_dyn_compat(_: &dyn AsHeaderName) { }
    fn _is_into_values<V: IntoHeaderValues>() { }
};

#[test]
fn header_map() {
    let mut map = HeaderMap::new();

    map.insert(standard::CONTENT_TYPE, vec![HeaderValue::from_static("text/html")]).unwrap();
    map.insert(standard::ACCEPT, vec![HeaderValue::from_static("*/*")]).unwrap();
    map.insert(standard::CONTENT_LENGTH, vec![HeaderValue::from_static("LEN")]).unwrap();
    map.insert(standard::DATE, vec![HeaderValue::from_static("BAR")]).unwrap();
    map.insert(standard::REFERER, vec![HeaderValue::from_static("BAR")]).unwrap();
    map.insert(HeaderName::from_static("rim"), vec![HeaderValue::from_static("BAR")]).unwrap();

    assert!(map.contains_key("content-type"));
    assert!(map.contains_key("Accept"));
    assert!(map.contains_key("CONTENT-LENGTH"));
    assert!(map.contains_key(standard::DATE));
    assert!(map.contains_key(&standard::REFERER));
    assert!(map.contains_key(String::from("RIM")));
    assert!(!map.contains_key("host"));

    // Insert Multi

    map.append(standard::CONTENT_LENGTH, vec![HeaderValue::from_static("BAR")]).unwrap();

    let mut all = map.get_all("content-length").iter();
    assert!(matches!(all.next(), Some(v) if v == "LEN"));
    assert!(matches!(all.next(), Some(v) if v == "BAR"));
    assert!(all.next().is_none());

    // Remove accept

    assert!(map.remove("accept").is_some());
    assert!(!map.contains_key("accept"));
    assert!(map.contains_key("content-type"));
    assert!(map.contains_key("content-length"));
    assert_eq!(map.len(), 5);

    // Host goes first

    map.insert(standard::HOST, vec![HeaderValue::from_static("example.com")]).unwrap();
    let names: Vec<&str> = map.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        ["Host", "Content-Type", "Content-Length", "Date", "Referer", "rim"]
    );

    map.clear();
    assert!(map.is_empty());
}

#[test]
fn host_ordering_invariant() {
    let mut map = HeaderMap::new();
    let ops: [(&str, &str, bool); 6] = [
        ("X-A", "1", false),
        ("host", "a.com", false),
        ("X-B", "2", true),
        ("HOST", "b.com", false),
        ("X-A", "3", true),
        ("Host", "b.com", true),
    ];

    for (name, value, append) in ops {
        let name = HeaderName::try_from_str(name).unwrap();
        let values = vec![HeaderValue::try_from_str(value).unwrap()];
        if append {
            map.append(name, values).unwrap();
        } else {
            map.insert(name, values).unwrap();
        }

        if map.contains_key("host") {
            let (first, _) = map.iter().next().unwrap();
            assert_eq!(first.as_str(), "Host");
        }
    }

    assert_eq!(map.get_all("host"), ["b.com"]);
    assert_eq!(map.get_all("x-a"), ["1", "3"]);
}
