//! Request configuration, defaults, and the merge rules between them.
//!
//! # Design
//! `Config` is a complete configuration; `Options` is a partial override
//! where `None` means "keep the base value". Every dispatch merges a
//! defaults `Config` with the caller's `Options` into a fresh `Config`, so
//! mutating a defaults template never reaches an in-flight exchange.
//! Mappings merge recursively (override keys win, base-only keys are kept);
//! everything else is replaced wholesale.

use std::time::Duration;

use crate::body::Payload;

/// Decoding mode requested from the transport for the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    #[default]
    Text,
    Json,
    Blob,
    ArrayBuffer,
    Document,
}

impl ResponseType {
    /// Wire name of the decoding mode, as transports know it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Text => "text",
            ResponseType::Json => "json",
            ResponseType::Blob => "blob",
            ResponseType::ArrayBuffer => "arraybuffer",
            ResponseType::Document => "document",
        }
    }
}

/// Insertion-ordered header map.
///
/// Names are stored with the exact spelling they were written with and
/// replaced on exact-name match; lookup is case-insensitive, which is what
/// lets the `Content-type` entry drive the body-encoding choice regardless
/// of how the caller spelled it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a header, replacing an existing entry with the same exact name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.0.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    /// First value whose name matches case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key-wise merge: `other` wins on conflicting names, names only in
    /// `self` are retained, insertion order of `self` is preserved.
    pub fn merged(&self, other: &Headers) -> Headers {
        let mut merged = self.clone();
        for (name, value) in &other.0 {
            merged.set(name.clone(), value.clone());
        }
        merged
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

/// Complete configuration for one exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub method: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub data: Payload,
    pub headers: Headers,
    pub response_type: ResponseType,
    pub timeout: Option<Duration>,
    pub with_credentials: bool,
}

impl Default for Config {
    fn default() -> Self {
        let mut headers = Headers::new();
        headers.set("Content-type", "application/x-www-form-urlencoded");
        Self {
            method: "GET".to_string(),
            username: None,
            password: None,
            data: Payload::Map(Vec::new()),
            headers,
            response_type: ResponseType::default(),
            timeout: None,
            with_credentials: false,
        }
    }
}

/// Partial per-call override of a [`Config`]. `None` keeps the base value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub method: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub data: Option<Payload>,
    pub headers: Option<Headers>,
    pub response_type: Option<ResponseType>,
    pub timeout: Option<Duration>,
    pub with_credentials: Option<bool>,
}

impl Config {
    /// Produce the effective configuration for one exchange.
    ///
    /// Scalar override fields replace the base wholesale. `headers` merge
    /// per name and `data` merges key-wise when both sides are maps, with
    /// override keys winning and base-only keys retained. Neither input is
    /// mutated.
    pub fn merged(&self, options: &Options) -> Config {
        let mut merged = self.clone();
        if let Some(method) = &options.method {
            merged.method = method.clone();
        }
        if let Some(username) = &options.username {
            merged.username = Some(username.clone());
        }
        if let Some(password) = &options.password {
            merged.password = Some(password.clone());
        }
        if let Some(data) = &options.data {
            merged.data = self.data.merged_with(data);
        }
        if let Some(headers) = &options.headers {
            merged.headers = self.headers.merged(headers);
        }
        if let Some(response_type) = options.response_type {
            merged.response_type = response_type;
        }
        if let Some(timeout) = options.timeout {
            merged.timeout = Some(timeout);
        }
        if let Some(with_credentials) = options.with_credentials {
            merged.with_credentials = with_credentials;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_template() {
        let config = Config::default();
        assert_eq!(config.method, "GET");
        assert_eq!(
            config.headers.get("Content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(config.data, Payload::Map(Vec::new()));
        assert_eq!(config.response_type, ResponseType::Text);
        assert!(config.timeout.is_none());
        assert!(!config.with_credentials);
        assert!(config.username.is_none());
        assert!(config.password.is_none());
    }

    #[test]
    fn scalar_override_replaces_wholesale() {
        let base = Config::default();
        let options = Options {
            method: Some("POST".to_string()),
            timeout: Some(Duration::from_millis(500)),
            with_credentials: Some(true),
            ..Options::default()
        };
        let merged = base.merged(&options);
        assert_eq!(merged.method, "POST");
        assert_eq!(merged.timeout, Some(Duration::from_millis(500)));
        assert!(merged.with_credentials);
        // base untouched
        assert_eq!(base.method, "GET");
        assert!(base.timeout.is_none());
    }

    #[test]
    fn absent_options_keep_every_base_value() {
        let mut base = Config::default();
        base.method = "PUT".to_string();
        base.with_credentials = true;
        let merged = base.merged(&Options::default());
        assert_eq!(merged, base);
    }

    #[test]
    fn header_override_merges_per_name() {
        let base = Config {
            headers: Headers::from_iter([("A", "1"), ("B", "2")]),
            ..Config::default()
        };
        let options = Options {
            headers: Some(Headers::from_iter([("A", "3"), ("C", "4")])),
            ..Options::default()
        };
        let merged = base.merged(&options);
        let outgoing: Vec<(&str, &str)> = merged.headers.iter().collect();
        assert_eq!(outgoing, vec![("A", "3"), ("B", "2"), ("C", "4")]);
    }

    #[test]
    fn data_maps_merge_recursively() {
        let base = Config {
            data: Payload::from(serde_json::json!({
                "page": {"size": 10, "sort": "asc"},
                "q": "rust"
            })),
            ..Config::default()
        };
        let options = Options {
            data: Some(Payload::from(serde_json::json!({
                "page": {"size": 25},
                "lang": "en"
            }))),
            ..Options::default()
        };
        let merged = base.merged(&options);
        let expected = Payload::from(serde_json::json!({
            "page": {"size": 25, "sort": "asc"},
            "q": "rust",
            "lang": "en"
        }));
        assert_eq!(merged.data, expected);
    }

    #[test]
    fn non_map_data_replaces_instead_of_merging() {
        let base = Config {
            data: Payload::from(serde_json::json!({"keep": true})),
            ..Config::default()
        };
        let options = Options {
            data: Some(Payload::from(serde_json::json!([1, 2, 3]))),
            ..Options::default()
        };
        let merged = base.merged(&options);
        assert_eq!(merged.data, Payload::from(serde_json::json!([1, 2, 3])));
    }

    #[test]
    fn merging_copies_rather_than_aliases() {
        let base = Config::default();
        let mut merged = base.merged(&Options::default());
        merged.headers.set("X-Later", "1");
        assert!(base.headers.get("X-Later").is_none());
    }

    #[test]
    fn content_type_lookup_is_case_insensitive() {
        let config = Config::default();
        assert_eq!(
            config.headers.get("content-TYPE"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn header_write_is_case_sensitive() {
        let mut headers = Headers::new();
        headers.set("Content-type", "a");
        headers.set("content-type", "b");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Content-type"), Some("a"));
    }
}
