//! Request payloads and body encoding.
//!
//! # Design
//! `Payload` is a tagged value model with one variant per shape the encoder
//! distinguishes: absent, null, list, date, blob, map, and the remaining
//! scalars. The match in `write_pairs` is the shape-precedence order of the
//! encoding policy, so a date never falls into the map branch and a blob is
//! appended raw instead of being traversed.
//!
//! Structural form encoding flattens nested data into ordered
//! (key, value) pairs using bracket-notation key paths — `users[0][name]` —
//! so a server-side form parser can rebuild the original structure. Index
//! embedding for list elements is always on.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use url::form_urlencoded;

use crate::error::Error;

/// A file-like value: raw bytes with a MIME type, optionally carrying a
/// file name and modification time.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub name: Option<String>,
    pub last_modified: Option<OffsetDateTime>,
}

impl Blob {
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            name: None,
            last_modified: None,
        }
    }

    /// A named blob, i.e. a file.
    pub fn file(
        bytes: impl Into<Vec<u8>>,
        content_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(bytes, content_type)
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A new blob over a byte sub-range, clamped to the blob's length.
    pub fn slice(&self, start: usize, end: usize) -> Blob {
        let end = end.min(self.bytes.len());
        let start = start.min(end);
        Blob {
            bytes: self.bytes[start..end].to_vec(),
            content_type: self.content_type.clone(),
            name: self.name.clone(),
            last_modified: self.last_modified,
        }
    }
}

/// Request data, one variant per shape the encoder distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No value at all. Emits nothing when form-encoded.
    Absent,
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Date(OffsetDateTime),
    Blob(Blob),
    List(Vec<Payload>),
    /// Insertion-ordered key/value pairs.
    Map(Vec<(String, Payload)>),
}

impl Payload {
    /// Key-wise recursive merge when both sides are maps; any other pairing
    /// replaces `self` with `other`.
    pub fn merged_with(&self, other: &Payload) -> Payload {
        match (self, other) {
            (Payload::Map(base), Payload::Map(over)) => {
                let mut merged = base.clone();
                for (key, value) in over {
                    if let Some(entry) = merged.iter_mut().find(|(k, _)| k == key) {
                        entry.1 = entry.1.merged_with(value);
                    } else {
                        merged.push((key.clone(), value.clone()));
                    }
                }
                Payload::Map(merged)
            }
            _ => other.clone(),
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Payload::Null,
            serde_json::Value::Bool(b) => Payload::Bool(b),
            serde_json::Value::Number(n) => Payload::Number(n),
            serde_json::Value::String(s) => Payload::String(s),
            serde_json::Value::Array(items) => {
                Payload::List(items.into_iter().map(Payload::from).collect())
            }
            serde_json::Value::Object(map) => {
                Payload::Map(map.into_iter().map(|(k, v)| (k, Payload::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::String(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::String(value)
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Bool(value)
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Number(value.into())
    }
}

impl From<u64> for Payload {
    fn from(value: u64) -> Self {
        Payload::Number(value.into())
    }
}

impl From<OffsetDateTime> for Payload {
    fn from(value: OffsetDateTime) -> Self {
        Payload::Date(value)
    }
}

impl From<Blob> for Payload {
    fn from(value: Blob) -> Self {
        Payload::Blob(value)
    }
}

impl From<Vec<Payload>> for Payload {
    fn from(value: Vec<Payload>) -> Self {
        Payload::List(value)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // JSON has no way to spell "absent"; both collapse to null.
            Payload::Absent | Payload::Null => serializer.serialize_unit(),
            Payload::Bool(b) => serializer.serialize_bool(*b),
            Payload::Number(n) => n.serialize(serializer),
            Payload::String(s) => serializer.serialize_str(s),
            Payload::Date(date) => {
                let iso = date.format(&Rfc3339).map_err(S::Error::custom)?;
                serializer.serialize_str(&iso)
            }
            // File handles have no JSON form; they collapse to an empty object.
            Payload::Blob(_) => serializer.serialize_map(Some(0))?.end(),
            Payload::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Payload::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// One value of a form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Blob(Blob),
}

/// Ordered (key, value) pairs produced by structural form encoding. Keys
/// may repeat for list-valued fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormBody {
    pairs: Vec<(String, FormValue)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, key: &str, value: FormValue) {
        self.pairs.push((key.to_string(), value));
    }

    pub fn pairs(&self) -> &[(String, FormValue)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Flatten to an `application/x-www-form-urlencoded` string for
    /// transports that need a flat body. A query string cannot carry bytes,
    /// so blob values contribute their file name (empty when unnamed).
    pub fn to_urlencoded(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            match value {
                FormValue::Text(text) => {
                    serializer.append_pair(key, text);
                }
                FormValue::Blob(blob) => {
                    serializer.append_pair(key, blob.name.as_deref().unwrap_or(""));
                }
            }
        }
        serializer.finish()
    }
}

/// A transport-ready request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Pass-through string or a JSON serialization.
    Text(String),
    Form(FormBody),
}

/// Encode a request payload for the given effective content type.
///
/// A string payload is passed through untouched. A JSON content type
/// serializes any payload shape to its JSON text. Everything else goes
/// through structural form encoding.
pub fn encode(payload: &Payload, content_type: &str) -> Result<Body, Error> {
    if let Payload::String(raw) = payload {
        return Ok(Body::Text(raw.clone()));
    }
    if is_json_media_type(content_type) {
        let json =
            serde_json::to_string(payload).map_err(|e| Error::Serialization(e.to_string()))?;
        return Ok(Body::Text(json));
    }
    let mut form = FormBody::new();
    write_pairs(payload, "", &mut form)?;
    Ok(Body::Form(form))
}

/// Whether the media-type portion of a content type is `application/json`,
/// ignoring case and any parameters (`; charset=...`).
pub(crate) fn is_json_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .eq_ignore_ascii_case("application/json")
}

fn write_pairs(value: &Payload, path: &str, form: &mut FormBody) -> Result<(), Error> {
    match value {
        Payload::Absent => {}
        Payload::Null => form.push(path, FormValue::Text(String::new())),
        Payload::List(items) => {
            if items.is_empty() {
                form.push(&format!("{path}[]"), FormValue::Text(String::new()));
            } else {
                for (index, item) in items.iter().enumerate() {
                    write_pairs(item, &format!("{path}[{index}]"), form)?;
                }
            }
        }
        Payload::Date(date) => form.push(path, FormValue::Text(iso8601(date)?)),
        Payload::Blob(blob) => form.push(path, FormValue::Blob(blob.clone())),
        Payload::Map(entries) => {
            for (name, child) in entries {
                let mut name = name.as_str();
                // A key that already spells out list syntax would double up
                // once the element suffix is appended.
                if matches!(child, Payload::List(_)) {
                    while name.len() > 2 && name.ends_with("[]") {
                        name = &name[..name.len() - 2];
                    }
                }
                let key = if path.is_empty() {
                    name.to_string()
                } else {
                    format!("{path}[{name}]")
                };
                write_pairs(child, &key, form)?;
            }
        }
        Payload::Bool(b) => form.push(path, FormValue::Text(b.to_string())),
        Payload::Number(n) => form.push(path, FormValue::Text(n.to_string())),
        Payload::String(s) => form.push(path, FormValue::Text(s.clone())),
    }
    Ok(())
}

fn iso8601(date: &OffsetDateTime) -> Result<String, Error> {
    date.format(&Rfc3339)
        .map_err(|e| Error::Serialization(e.to_string()))
}
