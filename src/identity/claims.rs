use std::collections::HashMap;

use axum::http::HeaderMap;

/// Header prefix under which the host forwards caller claims, e.g.
/// `x-claim-user-id`. Populated before this core runs; trusted verbatim.
pub const CLAIM_HEADER_PREFIX: &str = "x-claim-";

/// Well-known claim carrying the caller's user id.
pub const USER_ID_CLAIM: &str = "user-id";

/// Read-only key-value metadata attached to a request by the caller's
/// authenticated session. Constructed per-request, discarded at request end.
#[derive(Debug, Clone, Default)]
pub struct ClaimsContext {
    claims: HashMap<String, String>,
}

impl ClaimsContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `x-claim-*` headers into a claims map. Non-UTF8 header
    /// values are skipped; a skipped claim reads as absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut claims = HashMap::new();
        for (name, value) in headers.iter() {
            let Some(key) = name.as_str().strip_prefix(CLAIM_HEADER_PREFIX) else { continue };
            if let Ok(v) = value.to_str() {
                claims.insert(key.to_string(), v.to_string());
            }
        }
        Self { claims }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.claims.get(key).map(|s| s.as_str())
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.claims.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
