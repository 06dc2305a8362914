//! Growable byte accumulator for request and response bodies.

use std::borrow::Cow;

use bytes::{Bytes, BytesMut};

/// Owned contiguous byte storage that grows on append and never shrinks.
///
/// Doubles as text storage: [`Buffer::as_text`] gives a lossy UTF-8 view of
/// the accumulated bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    data: BytesMut,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` to the end of the buffer, reallocating as needed.
    pub fn append(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Lossy UTF-8 view of the buffer contents.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Freeze into cheaply cloneable shared bytes.
    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }
}

impl From<&[u8]> for Buffer {
    fn from(data: &[u8]) -> Self {
        let mut buffer = Buffer::new();
        buffer.append(data);
        buffer
    }
}

impl From<&str> for Buffer {
    fn from(data: &str) -> Self {
        Buffer::from(data.as_bytes())
    }
}
