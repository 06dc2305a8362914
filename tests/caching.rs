//! Response cache eviction, expiry, and shared-ownership behavior.

mod helpers;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use apigate::cache::ResponseCache;
use apigate::request::{Method, Request};
use apigate::response::Response;
use apigate::Gateway;
use helpers::{ScriptedExchange, ScriptedTransport};

const LONG_TTL: Duration = Duration::from_secs(1000);

fn response(url: &str) -> Arc<Response> {
    Arc::new(Response {
        request_url: url.to_string(),
        status: 200,
        ..Response::default()
    })
}

#[test]
fn fingerprint_is_djb2_over_the_url() {
    assert_eq!(ResponseCache::fingerprint_url(""), 5381);
    assert_eq!(ResponseCache::fingerprint_url("a"), 5381 * 33 + 97);
    // Order matters.
    assert_ne!(
        ResponseCache::fingerprint_url("ab"),
        ResponseCache::fingerprint_url("ba")
    );
}

#[test]
fn count_never_exceeds_capacity() {
    let mut cache = ResponseCache::new(3);
    for i in 0..10 {
        cache.insert(i, LONG_TTL, response(&format!("http://host/{i}")));
        assert!(cache.len() <= cache.max_entries(), "after insert {i}");
    }
    assert_eq!(cache.len(), 3);
}

#[test]
fn tail_evicted_when_no_entry_is_expired() {
    let mut cache = ResponseCache::new(2);
    cache.insert(1, LONG_TTL, response("http://host/1"));
    cache.insert(2, LONG_TTL, response("http://host/2"));
    cache.insert(3, LONG_TTL, response("http://host/3"));

    assert!(cache.lookup(1).is_none(), "oldest insert should be evicted");
    assert!(cache.lookup(2).is_some());
    assert!(cache.lookup(3).is_some());
}

#[test]
fn expired_entry_evicted_before_the_tail() {
    let mut cache = ResponseCache::new(2);
    cache.insert(1, LONG_TTL, response("http://host/1"));
    cache.insert(2, Duration::from_millis(1), response("http://host/2"));
    thread::sleep(Duration::from_millis(10));

    cache.insert(3, LONG_TTL, response("http://host/3"));

    assert!(cache.lookup(1).is_some(), "live tail must survive");
    assert!(cache.lookup(2).is_none());
    assert!(cache.lookup(3).is_some());
}

#[test]
fn expired_entry_never_returned_and_pruned_on_lookup() {
    let mut cache = ResponseCache::new(5);
    cache.insert(1, Duration::from_millis(1), response("http://host/1"));
    assert_eq!(cache.len(), 1);
    thread::sleep(Duration::from_millis(10));

    assert!(cache.lookup(1).is_none());
    assert_eq!(cache.len(), 0, "lookup prunes expired entries it walks past");
}

#[test]
fn lookup_prunes_expired_entries_on_the_way_to_a_match() {
    let mut cache = ResponseCache::new(5);
    cache.insert(1, LONG_TTL, response("http://host/1"));
    cache.insert(2, Duration::from_millis(1), response("http://host/2"));
    cache.insert(3, Duration::from_millis(1), response("http://host/3"));
    thread::sleep(Duration::from_millis(10));

    assert!(cache.lookup(1).is_some());
    assert_eq!(cache.len(), 1);
}

#[test]
fn zero_capacity_cache_silently_skips_inserts() {
    let mut cache = ResponseCache::new(0);
    cache.insert(1, LONG_TTL, response("http://host/1"));
    assert_eq!(cache.len(), 0);
    assert!(cache.lookup(1).is_none());
}

#[test]
fn cache_co_owns_stored_responses() {
    let mut cache = ResponseCache::new(2);
    let stored = response("http://host/1");
    cache.insert(1, LONG_TTL, Arc::clone(&stored));
    assert_eq!(Arc::strong_count(&stored), 2);

    let hit = cache.lookup(1).expect("entry is live");
    assert_eq!(Arc::strong_count(&stored), 3);
    assert!(Arc::ptr_eq(&stored, &hit));

    cache.clear();
    drop(hit);
    assert_eq!(Arc::strong_count(&stored), 1, "only the caller handle remains");
}

#[test]
fn eviction_does_not_free_a_response_the_caller_still_holds() {
    let mut cache = ResponseCache::new(1);
    let first = response("http://host/1");
    cache.insert(1, LONG_TTL, Arc::clone(&first));
    cache.insert(2, LONG_TTL, response("http://host/2"));

    // Evicted from the cache, still alive through the caller's handle.
    assert_eq!(Arc::strong_count(&first), 1);
    assert_eq!(first.request_url, "http://host/1");
}

#[test]
fn gateway_ttl_expiry_forces_a_refetch() {
    let transport = ScriptedTransport::new()
        .respond(ScriptedExchange::ok(200).with_body(b"first"))
        .respond(ScriptedExchange::ok(200).with_body(b"second"));
    let mut gateway = Gateway::new("http://host.test", transport);
    gateway.enable_cache(10);

    let mut request = Request::new(Method::Get, "/ttl");
    request.allow_cached_response = true;
    request.cache_ttl_seconds = 1;

    let first = gateway.perform_request(&request, None).unwrap();
    thread::sleep(Duration::from_millis(1100));
    let second = gateway.perform_request(&request, None).unwrap();

    assert_eq!(gateway.transport().calls.len(), 2, "expired entry must not be served");
    assert!(!Arc::ptr_eq(&first, &second));
}
