//! Shared test support: a scripted, in-process transport double.
//!
//! `ScriptedTransport` records every dispatch (parameters plus the body
//! bytes it pulled) and replays pre-scripted responses through the
//! streaming handle, so gateway behavior is testable without a network.

#![allow(dead_code)]

use std::collections::VecDeque;

use apigate::error::{Error, Result};
use apigate::transport::{Transport, TransportIo, TransportOutcome, TransportParams};

/// One scripted exchange replayed by [`ScriptedTransport`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedExchange {
    pub status: u16,
    pub header_lines: Vec<String>,
    pub body_chunks: Vec<Vec<u8>>,
    pub resolved_url: Option<String>,
    pub fail: bool,
}

impl ScriptedExchange {
    pub fn ok(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, line: &str) -> Self {
        self.header_lines.push(line.to_string());
        self
    }

    pub fn with_body(mut self, chunk: &[u8]) -> Self {
        self.body_chunks.push(chunk.to_vec());
        self
    }

    pub fn with_resolved_url(mut self, url: &str) -> Self {
        self.resolved_url = Some(url.to_string());
        self
    }
}

/// Everything the transport saw for one dispatch.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub params: TransportParams,
    pub sent_body: Vec<u8>,
}

impl RecordedCall {
    /// Rendered wire form of every resolved header, in order.
    pub fn header_lines(&self) -> Vec<String> {
        self.params.headers.iter().map(|h| h.to_line()).collect()
    }
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: VecDeque<ScriptedExchange>,
    pub calls: Vec<RecordedCall>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `exchange` as the response to the next unscripted dispatch.
    pub fn respond(mut self, exchange: ScriptedExchange) -> Self {
        self.script.push_back(exchange);
        self
    }

    pub fn enqueue(&mut self, exchange: ScriptedExchange) {
        self.script.push_back(exchange);
    }
}

impl Transport for ScriptedTransport {
    fn execute(&mut self, params: &TransportParams, io: &mut TransportIo<'_>) -> Result<TransportOutcome> {
        // Deliberately small pull buffer to exercise the send cursor.
        let mut sent_body = Vec::new();
        let mut buf = [0u8; 7];
        loop {
            let count = io.pull_body(&mut buf);
            if count == 0 {
                break;
            }
            sent_body.extend_from_slice(&buf[..count]);
        }
        self.calls.push(RecordedCall {
            params: params.clone(),
            sent_body,
        });

        let exchange = self.script.pop_front().unwrap_or_else(|| ScriptedExchange::ok(200));
        if exchange.fail {
            return Err(Error::connection("scripted failure"));
        }

        io.set_status(exchange.status);
        if let Some(url) = &exchange.resolved_url {
            io.set_resolved_url(url.clone());
        }
        for line in &exchange.header_lines {
            io.push_header_line(line.as_bytes());
        }
        for chunk in &exchange.body_chunks {
            io.push_body(chunk);
        }

        Ok(TransportOutcome {
            status: exchange.status,
            resolved_url: exchange.resolved_url.clone(),
        })
    }
}
