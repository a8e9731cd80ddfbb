//! Query parameters and URL construction

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Number(i64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Number(value.into())
    }
}

/// Ordered query parameters; insertion order is kept in the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, ParamValue)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value in place
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Form-encoded query string (spaces become `+`)
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, &value.to_string());
        }
        serializer.finish()
    }

    /// Upstream URL: `base?query`
    pub fn target_url(&self, base_url: &str) -> String {
        format!("{}?{}", base_url, self.query_string())
    }
}

/// Route `target_url` through a relay. An empty prefix yields the target itself.
pub fn proxied_url(prefix: &str, target_url: &str) -> String {
    if prefix.is_empty() {
        return target_url.to_string();
    }
    format!("{}{}", prefix, urlencoding::encode(target_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_keeps_order_and_form_encodes() {
        let params = RequestParams::new()
            .with("ac", "list")
            .with("pg", 2u32)
            .with("wd", "a b&c");
        assert_eq!(params.query_string(), "ac=list&pg=2&wd=a+b%26c");
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let params = RequestParams::new().with("pg", 1u32).with("t", "16").with("pg", 3u32);
        assert_eq!(params.query_string(), "pg=3&t=16");
        assert_eq!(params.get("pg"), Some(&ParamValue::Number(3)));
    }

    #[test]
    fn test_target_url() {
        let params = RequestParams::new().with("ac", "detail").with("ids", "1,2");
        assert_eq!(
            params.target_url("https://api.example/inc/api.php"),
            "https://api.example/inc/api.php?ac=detail&ids=1%2C2"
        );
    }

    #[test]
    fn test_proxied_url_encodes_whole_target() {
        let url = proxied_url("https://relay.example/?url=", "https://api.example/x?ac=list&pg=1");
        assert_eq!(
            url,
            "https://relay.example/?url=https%3A%2F%2Fapi.example%2Fx%3Fac%3Dlist%26pg%3D1"
        );
    }

    #[test]
    fn test_empty_prefix_is_direct() {
        let target = "https://api.example/x?ac=list";
        assert_eq!(proxied_url("", target), target);
    }
}
