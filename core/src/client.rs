//! Dispatch: defaults holder, the request pipeline, and settlement.
//!
//! # Design
//! `Client` is nothing but an explicit defaults template. Every entry point
//! runs the same pipeline: merge defaults with the caller's options, encode
//! the body from the merged data and `Content-type` header, configure and
//! fire the injected transport, and hand back a [`PendingExchange`].
//!
//! Settlement fires at most once per exchange, enforced by ownership:
//! `wait` consumes the exchange and maps the transport's single terminal
//! event to exactly one of resolve (status in `[200, 300)`), reject (any
//! other status), or timeout-reject (synthetic 408). An aborted exchange
//! never settles.

use tracing::debug;

use crate::body::{encode, Payload};
use crate::config::{Config, Options, ResponseType};
use crate::error::Error;
use crate::response::{normalize, Response};
use crate::transport::{Transport, TransportEvent};

/// Where an exchange stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    /// Sent, terminal event not yet received.
    Sent,
    /// Aborted by the caller; no settlement will ever fire.
    Aborted,
}

/// The single in-flight exchange produced by a dispatch, paired with its
/// settlement.
///
/// `wait` blocks for the transport's terminal event and settles once;
/// `abort` stops the underlying transport, after which `wait` yields
/// `None` rather than a late settlement.
#[derive(Debug)]
pub struct PendingExchange<T: Transport> {
    transport: Option<T>,
    response_type: ResponseType,
    state: ExchangeState,
}

impl<T: Transport> PendingExchange<T> {
    fn new(transport: T, response_type: ResponseType) -> Self {
        Self {
            transport: Some(transport),
            response_type,
            state: ExchangeState::Sent,
        }
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Abort the underlying exchange. Nothing settles afterwards.
    pub fn abort(&mut self) {
        if self.state == ExchangeState::Sent {
            if let Some(transport) = self.transport.as_mut() {
                transport.abort();
            }
            self.state = ExchangeState::Aborted;
            debug!("exchange aborted");
        }
    }

    /// Block for the terminal event and settle.
    ///
    /// `Some(Ok)` carries a response with a status in the success band
    /// `[200, 300)`; `Some(Err)` carries every other outcome, including the
    /// synthetic 408 timeout record. `None` means the exchange was aborted
    /// and will never settle.
    pub fn wait(mut self) -> Option<Result<Response<T>, Response<T>>> {
        if self.state == ExchangeState::Aborted {
            return None;
        }
        let mut transport = self.transport.take()?;
        let event = transport.recv()?;
        Some(settle(transport, event, self.response_type))
    }
}

fn settle<T: Transport>(
    transport: T,
    event: TransportEvent,
    response_type: ResponseType,
) -> Result<Response<T>, Response<T>> {
    match event {
        TransportEvent::TimedOut => {
            debug!("exchange timed out");
            Err(Response::timed_out(transport))
        }
        TransportEvent::Loaded(reply) => {
            let response = normalize(reply, response_type, transport);
            debug!(status = %response.status, "exchange settled");
            if (200..300).contains(&response.status) {
                Ok(response)
            } else {
                Err(response)
            }
        }
    }
}

/// Defaults holder and entry points.
///
/// The defaults template is explicit and passable rather than a hidden
/// process-wide singleton. Mutation through [`Client::defaults_mut`] is
/// visible only to exchanges dispatched afterwards, because every dispatch
/// copies the template through the merger.
#[derive(Debug, Clone, Default)]
pub struct Client {
    defaults: Config,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: Config) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &Config {
        &self.defaults
    }

    /// The current defaults template, mutable. Exchanges already dispatched
    /// are unaffected.
    pub fn defaults_mut(&mut self) -> &mut Config {
        &mut self.defaults
    }

    /// General dispatch: defaults ⊕ `options`, then the full pipeline.
    pub fn request<T: Transport>(
        &self,
        transport: T,
        url: &str,
        options: &Options,
    ) -> Result<PendingExchange<T>, Error> {
        if !transport.supported() {
            return Err(Error::Unsupported);
        }
        let config = self.defaults.merged(options);
        self.dispatch(transport, url, config)
    }

    /// Convenience alias: inject `data` beneath the caller's options and
    /// force the method to GET.
    pub fn get<T: Transport>(
        &self,
        transport: T,
        url: &str,
        data: Payload,
        options: &Options,
    ) -> Result<PendingExchange<T>, Error> {
        self.aliased(transport, url, "GET", data, options)
    }

    /// Convenience alias: inject `data` beneath the caller's options and
    /// force the method to POST.
    pub fn post<T: Transport>(
        &self,
        transport: T,
        url: &str,
        data: Payload,
        options: &Options,
    ) -> Result<PendingExchange<T>, Error> {
        self.aliased(transport, url, "POST", data, options)
    }

    fn aliased<T: Transport>(
        &self,
        transport: T,
        url: &str,
        method: &str,
        data: Payload,
        options: &Options,
    ) -> Result<PendingExchange<T>, Error> {
        if !transport.supported() {
            return Err(Error::Unsupported);
        }
        let seeded = Options {
            data: Some(data),
            ..Options::default()
        };
        let mut config = self.defaults.merged(&seeded).merged(options);
        config.method = method.to_string();
        self.dispatch(transport, url, config)
    }

    fn dispatch<T: Transport>(
        &self,
        mut transport: T,
        url: &str,
        config: Config,
    ) -> Result<PendingExchange<T>, Error> {
        let content_type = config.headers.get("Content-type").unwrap_or("");
        let body = encode(&config.data, content_type)?;

        debug!(
            method = %config.method,
            url,
            response_type = config.response_type.as_str(),
            "dispatching exchange"
        );
        transport.open(
            &config.method,
            url,
            config.username.as_deref(),
            config.password.as_deref(),
        )?;
        transport.set_response_type(config.response_type);
        for (name, value) in config.headers.iter() {
            transport.set_header(name, value);
        }
        if let Some(timeout) = config.timeout {
            if !timeout.is_zero() {
                transport.set_timeout(timeout);
            }
        }
        if config.with_credentials {
            transport.set_with_credentials(true);
        }
        transport.send(body)?;

        Ok(PendingExchange::new(transport, config.response_type))
    }
}
