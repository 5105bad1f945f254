//! Ordered request parameters.
//!
//! `ParamsMap` keeps insertion order so form bodies, query strings and log
//! lines are deterministic. Values may be null; null entries are kept in the
//! map but never serialized.

use url::form_urlencoded;

/// Reserved key holding a pre-serialized JSON payload.
pub const JSON_OBJECT: &str = "JSON_OBJECT";

/// Reserved key holding the application identifier.
pub const APPLICATION_KEY: &str = "appkey";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsMap {
    entries: Vec<(String, Option<String>)>,
}

impl ParamsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.add_optional_param(key, Some(value.into()));
    }

    /// Insert a possibly-null value. An existing key keeps its position and
    /// takes the new value.
    pub fn add_optional_param(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Non-null value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Non-null entries in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    /// `application/x-www-form-urlencoded` serialization of the non-null
    /// entries. Used for form bodies and query strings alike.
    pub fn to_url_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.present() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for ParamsMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParamsMap::new();
        for (key, value) in iter {
            params.add_param(key, value);
        }
        params
    }
}

/// Append the encoded params to `url` as a query string. The URL is returned
/// unchanged when there is nothing to append.
pub fn url_with_params(url: &str, params: Option<&ParamsMap>) -> String {
    let query = params.map(ParamsMap::to_url_string).unwrap_or_default();
    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}
