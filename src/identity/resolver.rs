//! The two resolution paths into a single [`Identity`] shape: trusted
//! session claims (browser/cookie requests) and long-lived device access
//! tokens (automation and cross-origin callers).
//!
//! Resolution failure is a normal outcome, not a fault: every malformed,
//! stale or unknown credential reduces to `None`, and directory errors
//! fail closed to `None` as well.

use tracing::warn;
use uuid::Uuid;

use super::claims::{ClaimsContext, USER_ID_CLAIM};
use super::principal::{Identity, IdentitySource};
use crate::host::{DeviceDirectory, DeviceQuery, UserDirectory};

/// Resolve the caller from the host-populated claims context. The user-id
/// claim must parse as a UUID and must still exist in the user directory;
/// a syntactically valid but revoked id yields no identity.
pub fn resolve_from_claims(claims: &ClaimsContext, users: &dyn UserDirectory) -> Option<Identity> {
    let raw = claims.get(USER_ID_CLAIM)?.trim();
    if raw.is_empty() {
        return None;
    }
    let user_id = Uuid::parse_str(raw).ok()?;
    match users.get_by_id(user_id) {
        Ok(Some(user)) => Some(Identity { user_id: user.id, source: IdentitySource::Claims }),
        Ok(None) => None,
        Err(e) => {
            warn!("user directory lookup failed: {e}");
            None
        }
    }
}

/// Resolve the caller from an explicit device access token. The directory
/// query is constrained to one result, so duplicate tokens can never
/// surface more than one candidate.
pub fn resolve_from_device_token(token: &str, devices: &dyn DeviceDirectory) -> Option<Identity> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let query = DeviceQuery { access_token: token.to_string(), limit: 1 };
    match devices.query(&query) {
        Ok(items) => items
            .first()
            .map(|d| Identity { user_id: d.user_id, source: IdentitySource::DeviceToken }),
        Err(e) => {
            warn!("device directory lookup failed: {e}");
            None
        }
    }
}
