//! One-shot request descriptors.

use std::fmt;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::kv::KvList;

/// Supported HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing body storage.
///
/// `Streamed` marks a body produced entirely by a caller-supplied send-body
/// callback; the request itself holds no bytes for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    Buffer(Buffer),
    Streamed,
}

/// Describes a single HTTP request, relative to a gateway's base URL.
///
/// Created per call and discarded by the caller afterwards; the cache keeps
/// its own handle on the resulting response, never on the request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path relative to the gateway base URL.
    pub path: String,
    pub headers: KvList,
    pub query_params: KvList,
    pub body: RequestBody,
    /// Whether the transport should follow server redirects.
    pub follow_redirects: bool,
    /// Attempt to parse the response body as JSON when the response
    /// `Content-Type` is `application/json` or `text/json`.
    pub parse_json_automatically: bool,
    /// Gates cache lookups for this request.
    pub allow_cached_response: bool,
    /// Gates cache inserts. Zero means "do not cache".
    pub cache_ttl_seconds: u32,
    /// Cache fingerprint override. Zero derives one from the resolved URL.
    pub custom_cache_key: u64,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: KvList::new(),
            query_params: KvList::new(),
            body: RequestBody::Empty,
            follow_redirects: false,
            parse_json_automatically: false,
            allow_cached_response: false,
            cache_ttl_seconds: 0,
            custom_cache_key: 0,
        }
    }

    /// Set a header, replacing any existing entry with the same key.
    /// `None` removes the entry from the request entirely; to explicitly
    /// unset a gateway default header, push a tombstone onto
    /// [`Request::headers`] instead.
    pub fn set_header(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => self.headers.set(key, Some(value)),
            None => {
                self.headers.remove(key);
            }
        }
    }

    /// First header value with `key`, if any.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Set a query parameter, replacing any existing entry with the same
    /// key. `None` leaves a tombstone.
    pub fn set_query_parameter(&mut self, key: &str, value: Option<&str>) {
        self.query_params.set(key, value);
    }

    /// Copy `data` into the request body and maintain the `Content-Length`
    /// header. An empty slice clears the body.
    pub fn set_body(&mut self, data: &[u8]) {
        if data.is_empty() {
            self.clear_body();
            return;
        }
        self.body = RequestBody::Buffer(Buffer::from(data));
        self.set_header("Content-Length", Some(&data.len().to_string()));
    }

    /// Drop any buffered body and its `Content-Length` header.
    pub fn clear_body(&mut self) {
        self.body = RequestBody::Empty;
        self.set_header("Content-Length", None);
    }

    /// Serialize `value` as the request body and set `Content-Type`.
    pub fn set_body_json<T: serde::Serialize>(&mut self, content_type: &str, value: &T) -> Result<()> {
        let data = serde_json::to_vec(value)?;
        self.set_body(&data);
        self.set_header("Content-Type", Some(content_type));
        Ok(())
    }
}
