//! Streaming callback slots and their built-in fallbacks.
//!
//! Three independent slots exist per request: send-body (pull),
//! receive-body (push), receive-headers (push). Each resolves per call as
//! override → gateway default → built-in. Callbacks run synchronously and
//! re-entrantly on the calling thread as the transport drives them, and
//! their return values are trusted — under-reported progress is a hint for
//! the transport, never retried here.

use crate::request::{Request, RequestBody};
use crate::response::Response;

/// Pull callback: fill `buf` with outgoing body bytes and return the count
/// written. Zero signals end of body.
pub type SendBodyFn = Box<dyn FnMut(&Request, &mut [u8]) -> usize + Send>;

/// Push callback: consume an incoming body chunk and return the number of
/// bytes consumed.
pub type ReceiveBodyFn = Box<dyn FnMut(&Request, &mut Response, &[u8]) -> usize + Send>;

/// Push callback: consume one complete raw header line (possibly
/// unterminated) and return the number of bytes consumed.
pub type ReceiveHeadersFn = Box<dyn FnMut(&Request, &mut Response, &[u8]) -> usize + Send>;

/// The three optional callback slots, supplied per call or stored as
/// gateway defaults. Empty slots fall back to the built-ins.
#[derive(Default)]
pub struct RequestCallbacks {
    pub on_send_body: Option<SendBodyFn>,
    pub on_receive_body: Option<ReceiveBodyFn>,
    pub on_receive_headers: Option<ReceiveHeadersFn>,
}

impl RequestCallbacks {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Built-in send-body fallback: a pull cursor over the request's buffered
/// body. Cursor state lives in the streaming session, not in the request.
#[derive(Debug)]
pub struct BodySource<'a> {
    data: &'a [u8],
    sent: usize,
}

impl<'a> BodySource<'a> {
    pub fn new(request: &'a Request) -> Self {
        let data = match &request.body {
            RequestBody::Buffer(buffer) => buffer.as_bytes(),
            RequestBody::Empty | RequestBody::Streamed => &[],
        };
        Self { data, sent: 0 }
    }

    /// Copy up to `buf.len()` of the remaining bytes into `buf`, advance the
    /// cursor, and return the count copied. Zero means end of body.
    pub fn next_chunk(&mut self, buf: &mut [u8]) -> usize {
        let remaining = self.data.len() - self.sent;
        let count = remaining.min(buf.len());
        buf[..count].copy_from_slice(&self.data[self.sent..self.sent + count]);
        self.sent += count;
        count
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.sent
    }
}

/// Built-in receive-body fallback: append the chunk to the response body
/// buffer and report it fully consumed.
pub fn receive_body_to_buffer(response: &mut Response, chunk: &[u8]) -> usize {
    response.append_body(chunk);
    chunk.len()
}

/// Built-in receive-headers fallback: split one raw line at the first
/// colon, trim surrounding whitespace from the value, and append the pair
/// to the response's parsed headers. Lines without a key are consumed and
/// ignored.
pub fn receive_header_line(response: &mut Response, line: &[u8]) -> usize {
    let consumed = line.len();

    let Some(colon) = line.iter().position(|&byte| byte == b':') else {
        return consumed;
    };
    if colon == 0 {
        return consumed;
    }

    let key = &line[..colon];
    let mut value = &line[colon + 1..];
    while let [b' ' | b'\t', rest @ ..] = value {
        value = rest;
    }
    while let [rest @ .., b' ' | b'\t' | b'\r' | b'\n'] = value {
        value = rest;
    }

    let key = String::from_utf8_lossy(key);
    let value = String::from_utf8_lossy(value);
    response.push_parsed_header(&key, &value);

    consumed
}
