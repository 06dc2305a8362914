//! The pluggable transport contract.
//!
//! The core prepares fully resolved parameters and a streaming I/O handle;
//! a [`Transport`] implementation performs the actual network exchange
//! (DNS, TLS, connection reuse, redirects) and drives the handle.

use std::path::PathBuf;

use crate::error::Result;
use crate::kv::{self, KvList};
use crate::request::{Method, Request};
use crate::response::Response;
use crate::streaming::{self, BodySource, ReceiveBodyFn, ReceiveHeadersFn, SendBodyFn};

/// One resolved header in wire form.
///
/// A `Some` value renders as `Name: value`; `None` renders the explicit
/// unset form `Name:`, telling the transport to suppress a header it would
/// otherwise send — distinct from simply saying nothing about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportHeader {
    pub name: String,
    pub value: Option<String>,
}

impl TransportHeader {
    pub fn to_line(&self) -> String {
        match &self.value {
            Some(value) => format!("{}: {}", self.name, value),
            None => format!("{}:", self.name),
        }
    }
}

/// Merge gateway-default and request headers into transport wire form.
///
/// Tombstoned keys survive as unset lines; everything else follows the
/// merge order (defaults first, then request-only keys).
pub fn resolve_headers(defaults: &KvList, overrides: &KvList) -> Vec<TransportHeader> {
    kv::merge(defaults, overrides)
        .into_iter()
        .map(|(name, value)| TransportHeader {
            name: name.to_string(),
            value: value.map(str::to_string),
        })
        .collect()
}

/// Everything a transport needs to perform one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportParams {
    pub method: Method,
    /// Fully resolved request URL (base + path + query string).
    pub url: String,
    pub headers: Vec<TransportHeader>,
    pub follow_redirects: bool,
    /// Pass-through path for the transport's persistent cookie store.
    pub cookie_jar_path: Option<PathBuf>,
}

/// What a successful exchange yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOutcome {
    pub status: u16,
    /// Final URL after any redirects, when the transport knows it.
    pub resolved_url: Option<String>,
}

/// Network collaborator. Implementations block until the exchange
/// completes, driving `io` for streaming as data moves.
pub trait Transport {
    fn execute(&mut self, params: &TransportParams, io: &mut TransportIo<'_>) -> Result<TransportOutcome>;
}

enum SendSlot<'a> {
    External(&'a mut SendBodyFn),
    Buffer(BodySource<'a>),
}

/// Streaming handle driven by the transport during one exchange.
///
/// Wraps the response under construction and the three resolved callback
/// slots; empty slots dispatch to the built-in fallbacks.
pub struct TransportIo<'a> {
    request: &'a Request,
    response: &'a mut Response,
    send: SendSlot<'a>,
    receive_body: Option<&'a mut ReceiveBodyFn>,
    receive_headers: Option<&'a mut ReceiveHeadersFn>,
}

impl<'a> TransportIo<'a> {
    pub(crate) fn new(
        request: &'a Request,
        response: &'a mut Response,
        send: Option<&'a mut SendBodyFn>,
        receive_body: Option<&'a mut ReceiveBodyFn>,
        receive_headers: Option<&'a mut ReceiveHeadersFn>,
    ) -> Self {
        let send = match send {
            Some(callback) => SendSlot::External(callback),
            None => SendSlot::Buffer(BodySource::new(request)),
        };
        Self {
            request,
            response,
            send,
            receive_body,
            receive_headers,
        }
    }

    /// Record the status code as soon as the transport knows it, so that
    /// custom receive callbacks observe it mid-exchange.
    pub fn set_status(&mut self, status: u16) {
        self.response.status = status;
    }

    /// Record the post-redirect URL as soon as the transport knows it.
    pub fn set_resolved_url(&mut self, url: impl Into<String>) {
        self.response.resolved_url = Some(url.into());
    }

    /// Pull up to `buf.len()` outgoing body bytes. Zero means end of body.
    pub fn pull_body(&mut self, buf: &mut [u8]) -> usize {
        match &mut self.send {
            SendSlot::External(callback) => callback(self.request, buf),
            SendSlot::Buffer(source) => source.next_chunk(buf),
        }
    }

    /// Push an incoming body chunk; returns bytes consumed. A count short
    /// of `chunk.len()` is an abort hint for the transport.
    pub fn push_body(&mut self, chunk: &[u8]) -> usize {
        match &mut self.receive_body {
            Some(callback) => callback(self.request, self.response, chunk),
            None => streaming::receive_body_to_buffer(self.response, chunk),
        }
    }

    /// Push one complete raw header line (possibly unterminated); returns
    /// bytes consumed.
    pub fn push_header_line(&mut self, line: &[u8]) -> usize {
        match &mut self.receive_headers {
            Some(callback) => callback(self.request, self.response, line),
            None => streaming::receive_header_line(self.response, line),
        }
    }
}
