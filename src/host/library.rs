use std::collections::HashSet;

use anyhow::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::directory::User;

/// A media library as surfaced to the configuration UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<String>,
}

pub trait LibraryService: Send + Sync {
    /// Libraries the given user may see, identity-scoped.
    fn libraries_visible_to(&self, user: &User) -> Result<Vec<Library>>;
}

struct LibraryGrant {
    library: Library,
    /// None means visible to every user.
    allowed: Option<HashSet<Uuid>>,
}

#[derive(Default)]
pub struct MemoryLibraryService {
    grants: RwLock<Vec<LibraryGrant>>,
}

impl MemoryLibraryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_public(&self, library: Library) {
        self.grants.write().push(LibraryGrant { library, allowed: None });
    }

    pub fn add_restricted(&self, library: Library, users: &[Uuid]) {
        let allowed = users.iter().copied().collect();
        self.grants.write().push(LibraryGrant { library, allowed: Some(allowed) });
    }
}

impl LibraryService for MemoryLibraryService {
    fn libraries_visible_to(&self, user: &User) -> Result<Vec<Library>> {
        let grants = self.grants.read();
        let visible = grants
            .iter()
            .filter(|g| g.allowed.as_ref().map(|set| set.contains(&user.id)).unwrap_or(true))
            .map(|g| g.library.clone())
            .collect();
        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib(name: &str, kind: Option<&str>) -> Library {
        Library { id: Uuid::new_v4(), name: name.into(), collection_type: kind.map(String::from) }
    }

    #[test]
    fn visibility_is_identity_scoped() {
        let svc = MemoryLibraryService::new();
        let alice = User { id: Uuid::new_v4(), name: "alice".into() };
        let bob = User { id: Uuid::new_v4(), name: "bob".into() };
        svc.add_public(lib("Movies", Some("movies")));
        svc.add_restricted(lib("Private", None), &[alice.id]);

        let for_alice = svc.libraries_visible_to(&alice).unwrap();
        let for_bob = svc.libraries_visible_to(&bob).unwrap();
        assert_eq!(for_alice.len(), 2);
        assert_eq!(for_bob.len(), 1);
        assert_eq!(for_bob[0].name, "Movies");
    }

    #[test]
    fn serializes_camel_case_and_omits_missing_type() {
        let l = lib("Shows", Some("tvshows"));
        let v = serde_json::to_value(&l).unwrap();
        assert_eq!(v.get("collectionType"), Some(&serde_json::json!("tvshows")));
        let bare = lib("Mixed", None);
        let v = serde_json::to_value(&bare).unwrap();
        assert!(v.get("collectionType").is_none());
    }
}
