//! # Apigate
//!
//! Synchronous HTTP gateway client: merge-resolved headers and query
//! parameters, a pluggable streaming transport, and a bounded, TTL-expiring
//! response cache.
//!
//! The crate performs no network I/O itself. A [`Transport`] collaborator
//! executes the wire exchange, pulling outgoing body bytes and pushing
//! incoming header lines and body chunks through the resolved streaming
//! callbacks. [`gateway::Gateway::perform_request`] blocks the calling
//! thread until the transport completes.

pub mod buffer;
pub mod cache;
pub mod error;
pub mod gateway;
pub mod kv;
pub mod request;
pub mod response;
pub mod streaming;
pub mod transport;
pub mod url;

// Re-exports
pub use buffer::Buffer;
pub use error::{Error, Result};
pub use gateway::Gateway;
pub use kv::KvList;
pub use request::{Method, Request, RequestBody};
pub use response::{Response, ResponseBody, ResponseHeaders};
pub use streaming::RequestCallbacks;
pub use transport::{Transport, TransportHeader, TransportIo, TransportOutcome, TransportParams};
