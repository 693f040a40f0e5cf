//! Opaque config transport: a reversible, URL-safe encoding of a small
//! client-owned configuration object, carried inside a path segment so a
//! single shareable URL reproduces a UI state without server-side storage.
//!
//! The codec is pure and stateless. Decoding is defensive: every malformed
//! input class (bad base64, bad UTF-8, bad JSON, non-object JSON) yields
//! "absent" rather than an error, so routes treating the config as optional
//! proceed without it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};

/// Key-value configuration blob. The schema is owned by the UI; the server
/// only transports it.
pub type ConfigPayload = Map<String, Value>;

/// Serialize the payload to JSON and base64url-encode it without padding.
/// The result is safe to place unescaped in a URL path segment.
pub fn encode(payload: &ConfigPayload) -> String {
    let json = Value::Object(payload.clone()).to_string();
    URL_SAFE_NO_PAD.encode(json)
}

/// Recover a payload from a token. Total over arbitrary input: any token
/// that does not round-trip through base64url + UTF-8 + a JSON object is
/// reported as absent.
pub fn decode(token: &str) -> Option<ConfigPayload> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
