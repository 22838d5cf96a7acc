//! The transport capability contract.
//!
//! # Design
//! The core never performs I/O. Whatever actually moves bytes — a blocking
//! HTTP agent, a browser-style request object, a scripted test double — is
//! handed in as a [`Transport`] and driven through this trait: configure,
//! send, then deliver at most one terminal event. Everything after that
//! event (status interpretation, header normalization, body decoding,
//! settlement) is the core's job and is fully deterministic.

use std::time::Duration;

use crate::body::Body;
use crate::config::ResponseType;
use crate::error::Error;

/// The single terminal event of an exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The exchange completed with a reply, whatever its status. Network
    /// failures that never reached a server surface as status 0 here.
    Loaded(RawReply),
    /// The armed timeout fired before completion.
    TimedOut,
}

/// Raw reply as delivered by the transport, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReply {
    pub status: u16,
    /// Raw header block: one `name: value` line per header, CRLF-separated.
    pub header_block: String,
    pub payload: RawPayload,
}

/// Reply body in whatever form the configured decoding mode produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Undecoded text (the `text` and `document` modes).
    Text(String),
    /// Pre-decoded by the transport under the `json` mode.
    Json(serde_json::Value),
    /// Raw bytes (the `blob` and `arraybuffer` modes).
    Binary(Vec<u8>),
}

/// One-shot request transport, configured then fired exactly once.
///
/// Call order is `open`, any of the setters, `send`, then `recv` for the
/// terminal event. `abort` may be called at any point after `open`; an
/// aborted transport delivers no event.
pub trait Transport {
    /// Capability probe, checked before any exchange is opened. The default
    /// assumes a capable transport.
    fn supported(&self) -> bool {
        true
    }

    /// Open an exchange for `method` on `url`, with optional basic
    /// credentials.
    fn open(
        &mut self,
        method: &str,
        url: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(), Error>;

    /// Select how the reply body should be decoded.
    fn set_response_type(&mut self, mode: ResponseType);

    /// Apply one outgoing header. A later write for the same name replaces
    /// the earlier one.
    fn set_header(&mut self, name: &str, value: &str);

    /// Arm a timeout; if it fires before completion the terminal event is
    /// [`TransportEvent::TimedOut`].
    fn set_timeout(&mut self, timeout: Duration);

    /// Include cookies/auth on cross-origin exchanges.
    fn set_with_credentials(&mut self, enabled: bool);

    /// Send the encoded body and start the exchange.
    fn send(&mut self, body: Body) -> Result<(), Error>;

    /// Deliver the terminal event. `None` means no event will ever arrive
    /// (the exchange was aborted underneath).
    fn recv(&mut self) -> Option<TransportEvent>;

    /// Stop the exchange; no event is delivered afterwards.
    fn abort(&mut self);
}
