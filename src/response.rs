//! Normalized responses with tagged header and body storage.

use std::borrow::Cow;

use serde_json::Value;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::kv::KvList;

/// Header storage. `Untouched` means a caller-supplied callback consumed the
/// raw header data and the core holds nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseHeaders {
    #[default]
    Untouched,
    Parsed(KvList),
}

/// Body storage — mutually exclusive, tagged.
///
/// `Untouched` means either no body data arrived or a caller-supplied
/// callback consumed it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseBody {
    #[default]
    Untouched,
    Buffer(Buffer),
    Json(Value),
}

/// The data received from the server for one performed request.
///
/// Shared via `Arc`: the cache and the caller each hold one handle while
/// they need it, and the last drop releases all owned sub-buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// The URL used to initiate the request.
    pub request_url: String,
    /// The URL associated with the returned data, after any redirects.
    pub resolved_url: Option<String>,
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: ResponseBody,
}

impl Response {
    /// First parsed header value with `key` (exact match). `None` when the
    /// headers were left untouched by a custom callback.
    pub fn header(&self, key: &str) -> Option<&str> {
        match &self.headers {
            ResponseHeaders::Parsed(list) => list.get(key),
            ResponseHeaders::Untouched => None,
        }
    }

    pub fn body_buffer(&self) -> Option<&Buffer> {
        match &self.body {
            ResponseBody::Buffer(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub fn body_json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Lossy UTF-8 view of a buffered body.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.body_buffer().map(Buffer::as_text)
    }

    /// Deserialize the body, whether already structured or still raw bytes.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        match &self.body {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value.clone())?),
            ResponseBody::Buffer(buffer) => Ok(serde_json::from_slice(buffer.as_bytes())?),
            ResponseBody::Untouched => Err(Error::missing("response body")),
        }
    }

    /// Append a parsed header pair, switching storage to `Parsed` on first
    /// use.
    pub(crate) fn push_parsed_header(&mut self, key: &str, value: &str) {
        if let ResponseHeaders::Parsed(list) = &mut self.headers {
            list.push(key, Some(value));
            return;
        }
        let mut list = KvList::new();
        list.push(key, Some(value));
        self.headers = ResponseHeaders::Parsed(list);
    }

    /// Append a body chunk, switching storage to `Buffer` on first use.
    pub(crate) fn append_body(&mut self, chunk: &[u8]) {
        if let ResponseBody::Buffer(buffer) = &mut self.body {
            buffer.append(chunk);
            return;
        }
        self.body = ResponseBody::Buffer(Buffer::from(chunk));
    }

    /// Whether the body is structured JSON already, or a non-empty buffer
    /// whose `Content-Type` is exactly `application/json` or `text/json`.
    pub fn has_json_body(&self) -> bool {
        match &self.body {
            ResponseBody::Json(_) => true,
            ResponseBody::Buffer(buffer) => {
                !buffer.is_empty()
                    && matches!(
                        self.header("Content-Type"),
                        Some("application/json") | Some("text/json")
                    )
            }
            ResponseBody::Untouched => false,
        }
    }

    /// Opportunistically reclassify a buffered body as structured JSON.
    ///
    /// On parse failure the buffer is left unchanged.
    pub fn parse_json_body(&mut self) {
        if !self.has_json_body() {
            return;
        }
        let ResponseBody::Buffer(buffer) = &self.body else {
            return;
        };
        if let Ok(value) = serde_json::from_slice::<Value>(buffer.as_bytes()) {
            self.body = ResponseBody::Json(value);
        }
    }
}
