//! Query-string encoding.
//!
//! Null parameters are dropped entirely instead of being sent as `key=`, so
//! the backend can tell "first page" apart from "subsequent page".

use std::fmt::{Display, Formatter, Result as FmtResult};

/// An ordered set of optional query parameters.
///
/// ```
/// use magview_search::QueryParams;
///
/// let params = QueryParams::new()
///     .with("a", Some(1))
///     .with("b", None::<u8>)
///     .with("c", Some("x y"));
/// assert_eq!(params.encode(), "a=1&c=x%20y");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}
impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter; `None` values are remembered but never encoded.
    pub fn push(&mut self, key: impl Into<String>, value: Option<impl Display>) {
        self.pairs.push((key.into(), value.map(|v| v.to_string())));
    }

    pub fn with(mut self, key: impl Into<String>, value: Option<impl Display>) -> Self {
        self.push(key, value);
        self
    }

    /// Value of the first parameter called `key`, if it is present and set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).and_then(|(_, v)| v.as_deref())
    }

    /// `key=value` pairs joined by `&`, both sides percent-encoded, unset
    /// values omitted, insertion order kept.
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .filter_map(|(key, value)| {
                value.as_ref().map(|value| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}
impl Display for QueryParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omits_null_and_keeps_order() {
        let params = QueryParams::new().with("a", Some(1)).with("b", None::<i32>).with("c", Some("x y"));
        assert_eq!(params.encode(), "a=1&c=x%20y");
    }

    #[test]
    fn test_empty() {
        assert_eq!(QueryParams::new().encode(), "");
        assert_eq!(QueryParams::new().with("only", None::<&str>).encode(), "");
    }

    #[test]
    fn test_empty_string_is_not_null() {
        // An explicitly empty value is still a value.
        assert_eq!(QueryParams::new().with("query", Some("")).encode(), "query=");
    }

    #[test]
    fn test_percent_encodes_keys_and_values() {
        let params = QueryParams::new().with("a&b", Some("c=d")).with("q", Some("ü/?#"));
        assert_eq!(params.encode(), "a%26b=c%3Dd&q=%C3%BC%2F%3F%23");
    }

    #[test]
    fn test_get() {
        let params = QueryParams::new().with("epoch", Some(10)).with("lastID", None::<u64>);
        assert_eq!(params.get("epoch"), Some("10"));
        assert_eq!(params.get("lastID"), None);
        assert_eq!(params.get("missing"), None);
    }
}
