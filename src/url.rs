//! Request URL assembly and query-string percent-encoding.

use crate::error::{Error, Result};
use crate::kv::{self, KvList};

/// Resolved URLs longer than this are rejected before any transport
/// interaction.
pub const MAX_URL_LENGTH: usize = 8192;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Percent-encode a string for use in a query pair.
///
/// Alphanumerics and `- _ . ~` pass through, a space becomes `+`, every
/// other byte becomes `%` plus two lowercase hex digits.
pub fn encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 15) as usize] as char);
            }
        }
    }
    out
}

/// Inverse of [`encode`]. A `%` not followed by two hex digits is kept
/// literally.
pub fn decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'%' => match (hex_value(bytes.get(index + 1)), hex_value(bytes.get(index + 2))) {
                (Some(high), Some(low)) => {
                    out.push(high << 4 | low);
                    index += 3;
                    continue;
                }
                _ => out.push(b'%'),
            },
            b'+' => out.push(b' '),
            byte => out.push(byte),
        }
        index += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    match byte? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Build the query string from the merged default and request parameters.
///
/// The first pair is prefixed with `?`, subsequent pairs with `&`. A pair
/// with no value is emitted as just the encoded key (no `=`). Returns `None`
/// when both lists are empty.
pub fn build_query_string(defaults: &KvList, params: &KvList) -> Option<String> {
    if defaults.is_empty() && params.is_empty() {
        return None;
    }
    let mut query = String::new();
    for (key, value) in kv::merge(defaults, params) {
        query.push(if query.is_empty() { '?' } else { '&' });
        query.push_str(&encode(key));
        if let Some(value) = value {
            query.push('=');
            query.push_str(&encode(value));
        }
    }
    Some(query)
}

/// Assemble `base_url + path + query_string` and enforce the length limit.
pub fn build_request_url(
    base_url: &str,
    path: &str,
    default_params: &KvList,
    request_params: &KvList,
) -> Result<String> {
    let query = build_query_string(default_params, request_params);
    let query = query.as_deref().unwrap_or("");

    let mut url = String::with_capacity(base_url.len() + path.len() + query.len());
    url.push_str(base_url);
    url.push_str(path);
    url.push_str(query);

    if url.len() > MAX_URL_LENGTH {
        return Err(Error::UrlTooLong {
            length: url.len(),
            limit: MAX_URL_LENGTH,
        });
    }
    Ok(url)
}
