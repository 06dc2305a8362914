//! Gateway configuration and the request orchestration entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::cache::ResponseCache;
use crate::error::{Error, Result};
use crate::kv::KvList;
use crate::request::{Method, Request};
use crate::response::Response;
use crate::streaming::{ReceiveBodyFn, ReceiveHeadersFn, RequestCallbacks, SendBodyFn};
use crate::transport::{self, Transport, TransportIo, TransportParams};
use crate::url;

/// Minimum plausible base URL length ("http://x").
const MIN_BASE_URL_LENGTH: usize = 8;

/// Long-lived configuration for one upstream: base URL, default headers and
/// query parameters, default streaming callbacks, an optional persistent
/// cookie path (passed through to the transport), an optional response
/// cache, and the owned transport collaborator.
///
/// Dropping the gateway releases its cache, default lists, and transport.
pub struct Gateway<T: Transport> {
    base_url: String,
    pub default_headers: KvList,
    pub default_query_parameters: KvList,
    pub default_callbacks: RequestCallbacks,
    cookie_jar_path: Option<PathBuf>,
    cache: Option<ResponseCache>,
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: KvList::new(),
            default_query_parameters: KvList::new(),
            default_callbacks: RequestCallbacks::new(),
            cookie_jar_path: None,
            cache: None,
            transport,
        }
    }

    /// Persist cookies across requests in a file at `path`. The core only
    /// passes the path through to the transport.
    pub fn with_cookie_jar(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_jar_path = Some(path.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cookie_jar_path(&self) -> Option<&Path> {
        self.cookie_jar_path.as_deref()
    }

    /// Add a response cache for GET requests.
    pub fn enable_cache(&mut self, max_entries: usize) {
        self.cache = Some(ResponseCache::new(max_entries));
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Perform one request, blocking until the transport completes.
    ///
    /// Validates inputs, consults the cache (GET only), and otherwise builds
    /// the URL, resolves headers and streaming callbacks, delegates to the
    /// transport, and on success populates the response and stores it in
    /// the cache. A cache hit shares ownership of the stored response; an
    /// uncached response is exclusively the caller's.
    pub fn perform_request(
        &mut self,
        request: &Request,
        callbacks: Option<&mut RequestCallbacks>,
    ) -> Result<Arc<Response>> {
        self.validate(request)?;

        let request_url = url::build_request_url(
            &self.base_url,
            &request.path,
            &self.default_query_parameters,
            &request.query_params,
        )?;

        let fingerprint = if request.custom_cache_key != 0 {
            request.custom_cache_key
        } else {
            ResponseCache::fingerprint_url(&request_url)
        };

        if request.method == Method::Get && request.allow_cached_response {
            if let Some(cache) = &mut self.cache {
                if let Some(cached) = cache.lookup(fingerprint) {
                    debug!(url = %request_url, "cache hit");
                    return Ok(cached);
                }
            }
        }

        let params = TransportParams {
            method: request.method,
            url: request_url.clone(),
            headers: transport::resolve_headers(&self.default_headers, &request.headers),
            follow_redirects: request.follow_redirects,
            cookie_jar_path: self.cookie_jar_path.clone(),
        };

        let mut response = Response {
            request_url: request_url.clone(),
            ..Response::default()
        };

        debug!(method = %request.method, url = %request_url, "dispatching request");

        let outcome = {
            let slots = resolve_callback_slots(&mut self.default_callbacks, callbacks);
            trace!(
                send_custom = slots.0.is_some(),
                body_custom = slots.1.is_some(),
                headers_custom = slots.2.is_some(),
                "resolved streaming callbacks"
            );
            let mut io = TransportIo::new(request, &mut response, slots.0, slots.1, slots.2);
            self.transport.execute(&params, &mut io)
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(url = %request_url, %error, "transport failed");
                return Err(match error {
                    connection @ Error::Connection(_) => connection,
                    other => Error::connection(other.to_string()),
                });
            }
        };

        response.status = outcome.status;
        response.resolved_url = outcome.resolved_url.or(Some(request_url.clone()));

        if request.parse_json_automatically {
            response.parse_json_body();
        }

        let response = Arc::new(response);

        if request.method == Method::Get && request.cache_ttl_seconds > 0 {
            if let Some(cache) = &mut self.cache {
                cache.insert(
                    fingerprint,
                    Duration::from_secs(request.cache_ttl_seconds.into()),
                    Arc::clone(&response),
                );
                debug!(url = %request_url, ttl_seconds = request.cache_ttl_seconds, "cached response");
            }
        }

        Ok(response)
    }

    /// Validation errors short-circuit before any transport or cache
    /// interaction.
    fn validate(&self, request: &Request) -> Result<()> {
        if self.base_url.len() < MIN_BASE_URL_LENGTH {
            return Err(Error::invalid_gateway(format!(
                "base URL shorter than {MIN_BASE_URL_LENGTH} bytes"
            )));
        }
        if request.path.is_empty() {
            return Err(Error::invalid_request("missing path"));
        }
        Ok(())
    }
}

/// Per-slot resolution: per-call override, else gateway default. Empty
/// slots fall through to the built-ins inside `TransportIo`.
fn resolve_callback_slots<'a>(
    defaults: &'a mut RequestCallbacks,
    overrides: Option<&'a mut RequestCallbacks>,
) -> (
    Option<&'a mut SendBodyFn>,
    Option<&'a mut ReceiveBodyFn>,
    Option<&'a mut ReceiveHeadersFn>,
) {
    let (send, body, headers) = match overrides {
        Some(callbacks) => (
            callbacks.on_send_body.as_mut(),
            callbacks.on_receive_body.as_mut(),
            callbacks.on_receive_headers.as_mut(),
        ),
        None => (None, None, None),
    };
    (
        send.or(defaults.on_send_body.as_mut()),
        body.or(defaults.on_receive_body.as_mut()),
        headers.or(defaults.on_receive_headers.as_mut()),
    )
}
