use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an [`Identity`] was resolved. Downstream handlers are agnostic to
/// the method; the provenance is kept for logging.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    Claims,
    DeviceToken,
}

/// The resolved, authenticated representation of the caller for one
/// request. Only produced by successful resolution, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub source: IdentitySource,
}
