//! Query-string codec
//!
//! Splits `path?query` input and decodes the query into [`QueryParams`].
//! Decoding follows the usual browser conventions: `+` and percent escapes
//! are decoded, a key without `=` maps to an empty value (`None`), and
//! repeated keys collect into a list. Keys are kept in sorted order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Value of a single query key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// The key appeared once. `None` when it had no `=` (e.g. `?flag`).
    Single(Option<String>),
    /// The key appeared more than once, in order of appearance.
    Multiple(Vec<Option<String>>),
}

impl QueryValue {
    /// First value of this key, if it carried one.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => value.as_deref(),
            Self::Multiple(values) => values.first().and_then(|v| v.as_deref()),
        }
    }

    /// All values of this key, in order of appearance.
    pub fn all(&self) -> Vec<Option<&str>> {
        match self {
            Self::Single(value) => vec![value.as_deref()],
            Self::Multiple(values) => values.iter().map(|v| v.as_deref()).collect(),
        }
    }

    fn push(&mut self, value: Option<String>) {
        match self {
            Self::Single(existing) => {
                let first = existing.take();
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(Some(value.to_string()))
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(Some(value))
    }
}

/// Decoded query parameters, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, QueryValue>);

impl QueryParams {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw value of a key.
    pub fn value(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    /// First value of a key, if it carried one.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(QueryValue::first)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys starting with `prefix`, with their values.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a QueryValue)> + 'a {
        self.iter().filter(move |(key, _)| key.starts_with(prefix))
    }
}

/// Split `path_and_query` at the first `?`.
///
/// The returned query keeps its leading `?`.
///
/// ```rust,ignore
/// assert_eq!(split("/books/1?foo=bar"), ("/books/1", Some("?foo=bar")));
/// assert_eq!(split("/books/1"), ("/books/1", None));
/// ```
pub fn split(path_and_query: &str) -> (&str, Option<&str>) {
    match path_and_query.find('?') {
        Some(index) => (&path_and_query[..index], Some(&path_and_query[index..])),
        None => (path_and_query, None),
    }
}

/// Decode a query string. A leading `?` or `#` is ignored.
pub fn parse(query: &str) -> QueryParams {
    let query = query.trim_start_matches(['?', '#']);
    let mut params = BTreeMap::<String, QueryValue>::new();

    for piece in query.split('&').filter(|p| !p.is_empty()) {
        let has_value = piece.contains('=');
        let Some((key, value)) = form_urlencoded::parse(piece.as_bytes()).next() else {
            continue;
        };
        let value = has_value.then(|| value.into_owned());

        match params.get_mut(key.as_ref()) {
            Some(existing) => existing.push(value),
            None => {
                params.insert(key.into_owned(), QueryValue::Single(value));
            }
        }
    }

    QueryParams(params)
}

/// Encode parameters back into a query string (without the leading `?`).
pub fn stringify(params: &QueryParams) -> String {
    let mut pieces = Vec::new();
    for (key, value) in params.iter() {
        let key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        for value in value.all() {
            match value {
                Some(v) => {
                    let v: String = form_urlencoded::byte_serialize(v.as_bytes()).collect();
                    pieces.push(format!("{}={}", key, v));
                }
                None => pieces.push(key.clone()),
            }
        }
    }
    pieces.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(split("/books/1?foo=bar"), ("/books/1", Some("?foo=bar")));
        assert_eq!(split("/books/1"), ("/books/1", None));
        assert_eq!(split("/a?b?c"), ("/a", Some("?b?c")));
    }

    #[test]
    fn test_parse_values() {
        let params = parse("?foo=bar&flag&empty=&name=John+Doe&enc=a%2Fb");
        assert_eq!(params.get("foo"), Some("bar"));
        assert_eq!(params.value("flag"), Some(&QueryValue::Single(None)));
        assert_eq!(params.get("empty"), Some(""));
        assert_eq!(params.get("name"), Some("John Doe"));
        assert_eq!(params.get("enc"), Some("a/b"));
    }

    #[test]
    fn test_parse_repeated_keys() {
        let params = parse("a=1&a=2&a");
        assert_eq!(
            params.value("a"),
            Some(&QueryValue::Multiple(vec![
                Some("1".to_string()),
                Some("2".to_string()),
                None
            ]))
        );
        assert_eq!(params.get("a"), Some("1"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("?").is_empty());
        assert!(parse("").is_empty());
        assert!(parse("&&").is_empty());
    }

    #[test]
    fn test_stringify() {
        let params = QueryParams::new().with("tab", "info").with("q", "a b");
        assert_eq!(stringify(&params), "q=a+b&tab=info");
        assert_eq!(parse(&stringify(&params)), params);
    }

    #[test]
    fn test_with_prefix() {
        let params = parse("platform-chat=open&tab=info&platform-side=1");
        let keys: Vec<_> = params.with_prefix("platform-").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["platform-chat", "platform-side"]);
    }
}
