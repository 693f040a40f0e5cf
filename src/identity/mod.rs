//! Per-request identity resolution for the bridge.
//! Keep the public surface thin and split implementation across sub-modules.

mod claims;
mod principal;
mod resolver;

pub use claims::{ClaimsContext, CLAIM_HEADER_PREFIX, USER_ID_CLAIM};
pub use principal::{Identity, IdentitySource};
pub use resolver::{resolve_from_claims, resolve_from_device_token};
