//! Response normalization.
//!
//! # Design
//! Whatever the transport delivered — raw text, a pre-decoded value, bytes —
//! is folded into one uniform [`Response`] shape: numeric status, a
//! lower-cased header list, decoded data, and the transport handle that
//! served the exchange. JSON decoding in the text path is lenient: malformed
//! JSON falls back to the raw text instead of failing, so a sloppy server
//! can never turn a completed exchange into a decode error.

use crate::config::ResponseType;
use crate::transport::{RawPayload, RawReply};

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// An empty body under JSON decoding.
    None,
    Text(String),
    Json(serde_json::Value),
    Binary(Vec<u8>),
}

impl Data {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Data::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Data::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Normalized record of one completed (or failed) exchange.
///
/// Built exactly once per exchange and handed to whichever settlement
/// branch receives it. `request` is the transport handle that served the
/// exchange, moved in so the receiver can inspect it.
#[derive(Debug)]
pub struct Response<T> {
    pub status: u16,
    /// Header names lower-cased, in delivery order.
    pub headers: Vec<(String, String)>,
    pub data: Data,
    pub request: T,
}

impl<T> Response<T> {
    /// Synthetic record for a timed-out exchange: 408, nothing else.
    pub(crate) fn timed_out(request: T) -> Self {
        Self {
            status: 408,
            headers: Vec::new(),
            data: Data::None,
            request,
        }
    }
}

/// Fold a raw reply into a [`Response`].
pub(crate) fn normalize<T>(reply: RawReply, response_type: ResponseType, request: T) -> Response<T> {
    let headers = parse_header_block(&reply.header_block);
    let data = match reply.payload {
        RawPayload::Json(value) => Data::Json(value),
        RawPayload::Binary(bytes) => Data::Binary(bytes),
        RawPayload::Text(text) => decode_text(text, &headers, response_type),
    };
    Response {
        status: reply.status,
        headers,
        data,
        request,
    }
}

/// Split a raw header block into lower-cased (name, value) pairs: lines on
/// CRLF, then each line on the first `": "`.
fn parse_header_block(block: &str) -> Vec<(String, String)> {
    block
        .split("\r\n")
        .filter_map(|line| line.split_once(": "))
        .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
        .collect()
}

fn decode_text(text: String, headers: &[(String, String)], response_type: ResponseType) -> Data {
    let declared_json = headers
        .iter()
        .find(|(name, _)| name == "content-type")
        .map(|(_, value)| crate::body::is_json_media_type(value))
        .unwrap_or(false);
    if !declared_json && response_type != ResponseType::Json {
        return Data::Text(text);
    }
    if text.is_empty() {
        return Data::None;
    }
    match serde_json::from_str(&text) {
        Ok(value) => Data::Json(value),
        // Lenient path: a body that merely claims to be JSON stays text.
        Err(_) => Data::Text(text),
    }
}
