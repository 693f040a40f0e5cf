use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

/// A registered client device. Its access token maps to exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    pub access_token: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct DeviceQuery {
    pub access_token: String,
    /// Maximum results to return; 0 means no limit.
    pub limit: usize,
}

pub trait UserDirectory: Send + Sync {
    fn get_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

pub trait DeviceDirectory: Send + Sync {
    /// Devices whose access token equals the query token, truncated to
    /// `limit` when non-zero.
    fn query(&self, query: &DeviceQuery) -> Result<Vec<Device>>;
}

#[derive(Default)]
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.write().insert(user.id, user);
    }

    pub fn remove(&self, id: Uuid) -> Option<User> {
        self.users.write().remove(&id)
    }
}

impl UserDirectory for MemoryUserDirectory {
    fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryDeviceDirectory {
    devices: RwLock<Vec<Device>>,
}

impl MemoryDeviceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, device: Device) {
        self.devices.write().push(device);
    }
}

impl DeviceDirectory for MemoryDeviceDirectory {
    fn query(&self, query: &DeviceQuery) -> Result<Vec<Device>> {
        let devices = self.devices.read();
        let mut out: Vec<Device> = Vec::new();
        for d in devices.iter() {
            if d.access_token == query.access_token {
                out.push(d.clone());
                if query.limit > 0 && out.len() >= query.limit {
                    break;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_lookup_round_trip() {
        let dir = MemoryUserDirectory::new();
        let user = User { id: Uuid::new_v4(), name: "alice".into() };
        dir.insert(user.clone());
        assert_eq!(dir.get_by_id(user.id).unwrap(), Some(user.clone()));
        dir.remove(user.id);
        assert_eq!(dir.get_by_id(user.id).unwrap(), None);
    }

    #[test]
    fn device_query_honors_limit() {
        let dir = MemoryDeviceDirectory::new();
        for i in 0..3 {
            dir.insert(Device {
                id: Uuid::new_v4(),
                name: format!("d{i}"),
                access_token: "same".into(),
                user_id: Uuid::new_v4(),
            });
        }
        let one = dir.query(&DeviceQuery { access_token: "same".into(), limit: 1 }).unwrap();
        assert_eq!(one.len(), 1);
        let all = dir.query(&DeviceQuery { access_token: "same".into(), limit: 0 }).unwrap();
        assert_eq!(all.len(), 3);
    }
}
