//! Promise-style HTTP client core with a pluggable transport.
//!
//! # Overview
//! Merges per-call options over a defaults template, encodes the request
//! body (structural form encoding, JSON, or raw-string passthrough), drives
//! one exchange per dispatch through an injected [`Transport`], and folds
//! the raw reply into a uniform [`Response`] delivered through a one-shot
//! [`PendingExchange`].
//!
//! # Design
//! - The transport is a capability handed in by the caller (host-does-IO
//!   pattern); the core never touches the network, so every pipeline stage
//!   is deterministic and testable against scripted transports.
//! - [`Client`] is an explicit, passable defaults holder. Each dispatch
//!   copies the template through the merger, so mutating defaults never
//!   reaches an in-flight exchange.
//! - Settlement fires at most once per exchange: a status in `[200, 300)`
//!   resolves, anything else rejects with the full normalized response, a
//!   timeout rejects with a synthetic 408 record, and an aborted exchange
//!   never settles.

pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod transport;

pub use body::{encode, Blob, Body, FormBody, FormValue, Payload};
pub use client::{Client, ExchangeState, PendingExchange};
pub use config::{Config, Headers, Options, ResponseType};
pub use error::Error;
pub use response::{Data, Response};
pub use transport::{RawPayload, RawReply, Transport, TransportEvent};
