//! Key/value pairs used as request headers and URL query parameters.
//!
//! # Design
//! Header pairs and query pairs carry the same data, so a single `Pair` type
//! serves both. Where a pair ends up is decided by the call site: pairs
//! passed to `Client::get` / `Client::delete` are appended to the query
//! string, pairs given to `Authorization::Headers` are set as headers. No
//! validation or escaping happens here; query encoding is done by the `url`
//! crate when the request is built.

/// An immutable key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    key: String,
    value: String,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Pair {
    fn from((key, value): (K, V)) -> Self {
        Pair::new(key, value)
    }
}

/// Build a pair meant to be set as a request header.
pub fn header(key: impl Into<String>, value: impl Into<String>) -> Pair {
    Pair::new(key, value)
}

/// Build a pair meant to be appended to the URL query string.
pub fn query(key: impl Into<String>, value: impl Into<String>) -> Pair {
    Pair::new(key, value)
}
