//! Error types for the client core.
//!
//! # Design
//! Only failures that prevent an exchange from being dispatched at all are
//! errors of this type. A completed exchange with a non-2xx status (status 0
//! network failures included) is not an `Error` — it travels through the
//! rejection branch as a full `Response` so callers can still inspect the
//! status, headers, and any partial body.

use std::fmt;

/// Errors returned before an exchange exists or while starting one.
#[derive(Debug)]
pub enum Error {
    /// The injected transport reported that it lacks a required capability.
    /// Raised synchronously by the dispatch entry points, before any
    /// exchange is opened.
    Unsupported,

    /// The transport could not open or start the exchange.
    Transport(String),

    /// The request payload could not be serialized into a body.
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unsupported => {
                write!(f, "transport does not provide the required capabilities")
            }
            Error::Transport(msg) => write!(f, "transport failed: {msg}"),
            Error::Serialization(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
