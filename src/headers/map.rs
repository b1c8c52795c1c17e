use super::{HeaderError, HeaderName, HeaderValue, iter::Iter, standard};
use crate::log::{debug, trace};
use crate::matches;

/// A header name with its values.
#[derive(Clone, Debug)]
pub(crate) struct Field {
    pub(crate) name: HeaderName,
    pub(crate) values: Vec<HeaderValue>,
}

/// HTTP Headers Multimap.
///
/// Lookup is case-insensitive, while each header name keeps the casing it was inserted with.
/// Headers are iterated in insertion order, except `Host` which is always the first one.
///
/// ```
/// use httpval::headers::{HeaderMap, HeaderName, HeaderValue};
///
/// let mut map = HeaderMap::new();
/// map.insert(HeaderName::from_static("X-Foo"), vec![HeaderValue::from_static("a")]).unwrap();
/// map.insert(HeaderName::from_static("Host"), vec![HeaderValue::from_static("example.com")]).unwrap();
///
/// assert_eq!(map.get_all("x-foo"), ["a"]);
/// assert_eq!(map.iter().next().unwrap().0.as_str(), "Host");
/// ```
//
// header count of a message is small, linear probing over a vector with cached hash is enough
#[derive(Clone, Default)]
pub struct HeaderMap {
    fields: Vec<Field>,
}

impl HeaderMap {
    /// Create new empty [`HeaderMap`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Returns the number of header names.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if headers has no element.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn fields(&self) -> &[Field] {
        &self.fields
    }
}

// ===== Lookup =====

impl HeaderMap {
    fn position<K: AsHeaderName>(&self, name: &K) -> Option<usize> {
        let hash = SealedRef::hash(name);
        let name = SealedRef::as_str(name);
        self.fields
            .iter()
            .position(|field| field.name.hash() == hash && field.name.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if the map contains a header value for given header name.
    #[inline]
    pub fn contains_key<K: AsHeaderName>(&self, name: K) -> bool {
        self.position(&name).is_some()
    }

    /// Returns a reference to the first header value corresponding to the given header name.
    #[inline]
    pub fn get<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        self.get_all(name).first()
    }

    /// Returns all header values corresponding to the given header name.
    ///
    /// Returns empty slice if the header is not present.
    #[inline]
    pub fn get_all<K: AsHeaderName>(&self, name: K) -> &[HeaderValue] {
        match self.position(&name) {
            Some(index) => &self.fields[index].values,
            None => &[],
        }
    }

    /// Returns the header name as it is stored, in its original casing.
    #[inline]
    pub fn get_name<K: AsHeaderName>(&self, name: K) -> Option<&HeaderName> {
        self.position(&name).map(|index| &self.fields[index].name)
    }

    /// Returns all header values corresponding to the given header name joined with `", "`.
    ///
    /// Returns empty string if the header is not present.
    pub fn get_line<K: AsHeaderName>(&self, name: K) -> String {
        let mut line = String::new();
        for (i, value) in self.get_all(name).iter().enumerate() {
            if i != 0 {
                line.push_str(", ");
            }
            line.push_str(value.as_str());
        }
        line
    }

    /// Returns an iterator over header names and their values.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }
}

// ===== Mutation =====

impl HeaderMap {
    /// Insert header, replacing all existing values of the same name.
    ///
    /// The header moves to the end of the iteration order, and take the casing of `name`. For the
    /// `Host` header, the name is normalized to `Host`, duplicated values are removed, and the
    /// header moves to the front.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::EmptyValues`] if `values` is empty, or
    /// [`HeaderError::MultipleHost`] if more than one distinct `Host` value is given. The map is
    /// left unchanged on error.
    pub fn insert(&mut self, name: HeaderName, values: Vec<HeaderValue>) -> Result<(), HeaderError> {
        if values.is_empty() {
            return Err(HeaderError::EmptyValues);
        }
        if name.is_host() {
            let values = dedup_host(values)?;
            self.remove(&name);
            self.put_host(values);
            return Ok(());
        }
        self.remove(&name);
        self.fields.push(Field { name, values });
        Ok(())
    }

    /// Append header values, the casing and position of an existing name is kept.
    ///
    /// If the header is not present, this behave as [`insert`][HeaderMap::insert].
    ///
    /// # Errors
    ///
    /// Same as [`insert`][HeaderMap::insert].
    pub fn append(&mut self, name: HeaderName, values: Vec<HeaderValue>) -> Result<(), HeaderError> {
        if values.is_empty() {
            return Err(HeaderError::EmptyValues);
        }
        let Some(index) = self.position(&name) else {
            return self.insert(name, values);
        };
        if name.is_host() {
            let mut merged = self.fields[index].values.clone();
            merged.extend(values);
            let merged = dedup_host(merged)?;
            self.fields.remove(index);
            self.put_host(merged);
            return Ok(());
        }
        self.fields[index].values.extend(values);
        Ok(())
    }

    /// Remove header, returning its values if present.
    pub fn remove<K: AsHeaderName>(&mut self, name: K) -> Option<Vec<HeaderValue>> {
        let index = self.position(&name)?;
        Some(self.fields.remove(index).values)
    }

    /// Set the `Host` header without validation.
    pub(crate) fn set_host(&mut self, value: HeaderValue) {
        self.remove(standard::HOST);
        self.put_host(vec![value]);
    }

    fn put_host(&mut self, values: Vec<HeaderValue>) {
        trace!("moving Host header to the front");
        self.fields.insert(0, Field {
            name: standard::HOST,
            values,
        });
    }

    /// Clear headers map, removing all the value.
    #[inline]
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

fn dedup_host(values: Vec<HeaderValue>) -> Result<Vec<HeaderValue>, HeaderError> {
    let mut unique: Vec<HeaderValue> = Vec::with_capacity(1);
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    if unique.len() > 1 {
        debug!("rejected multiple Host header values {unique:?}");
        return Err(HeaderError::MultipleHost);
    }
    Ok(unique)
}

impl std::fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// ===== Ref Traits =====

/// A type that can be used for [`HeaderMap`] lookup operation.
#[allow(private_bounds)]
pub trait AsHeaderName: SealedRef { }
trait SealedRef {
    fn hash(&self) -> u64;

    fn as_str(&self) -> &str;
}

/// for str input, calculate hash
impl AsHeaderName for &str { }
impl SealedRef for &str {
    #[inline]
    fn hash(&self) -> u64 {
        matches::hash_to_lowercase(self.as_bytes())
    }

    #[inline]
    fn as_str(&self) -> &str {
        self
    }
}

impl AsHeaderName for String { }
impl SealedRef for String {
    #[inline]
    fn hash(&self) -> u64 {
        matches::hash_to_lowercase(self.as_bytes())
    }

    #[inline]
    fn as_str(&self) -> &str {
        self
    }
}

/// for HeaderName, hash is cached
impl AsHeaderName for HeaderName { }
impl SealedRef for HeaderName {
    #[inline]
    fn hash(&self) -> u64 {
        HeaderName::hash(self)
    }

    #[inline]
    fn as_str(&self) -> &str {
        HeaderName::as_str(self)
    }
}

// blanket implementation
impl<K: AsHeaderName> AsHeaderName for &K { }
impl<S: SealedRef> SealedRef for &S {
    #[inline]
    fn hash(&self) -> u64 {
        S::hash(self)
    }

    #[inline]
    fn as_str(&self) -> &str {
        S::as_str(self)
    }
}
