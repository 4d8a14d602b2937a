//! Content fingerprints and cache key derivation.
//!
//! Keys are hex-encoded BLAKE3 digests over a canonical JSON document
//! `{"method", "params", "text_hash"}`. `serde_json` maps serialize with sorted
//! keys, so parameter insertion order never affects the key.

use serde_json::{Value, json};

use crate::model::AuditParameters;

/// Hex BLAKE3 digest of the UTF-8 bytes of `text`.
#[inline]
pub fn hash_text(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Hex BLAKE3 digest of raw bytes.
#[inline]
pub fn hash_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Serializes parameters into their order-independent canonical form.
pub fn canonical_params(params: &AuditParameters) -> String {
    // Map<String, Value> without `preserve_order` is a BTreeMap; nested objects too.
    Value::Object(params.clone()).to_string()
}

/// Derives the cache key for `(method, text, params)`.
///
/// Identical inputs always yield the same key; changing the method, any byte
/// of the text, or any parameter value yields a different key.
pub fn make_cache_key(method: &str, text: &str, params: &AuditParameters) -> String {
    let payload = json!({
        "method": method,
        "text_hash": hash_text(text),
        "params": canonical_params(params),
    });
    hash_text(&payload.to_string())
}
