// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory device record store.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::device::{Device, DeviceEdit, NewDevice};
use crate::error::StoreError;
use crate::types::{DeviceId, DeviceKind, MacAddress};

use super::DeviceStore;

/// In-process [`DeviceStore`] backed by a locked vector.
///
/// Enforces the `name`/`mac`/`address` uniqueness invariant on every
/// write. Ids are assigned from a monotonically increasing counter
/// starting at 1.
///
/// # Examples
///
/// ```
/// use homelink_lib::store::{DeviceStore, MemoryStore};
/// use homelink_lib::device::NewDevice;
///
/// # #[tokio::main]
/// # async fn main() -> homelink_lib::Result<()> {
/// let store = MemoryStore::new();
/// let device = store
///     .insert(NewDevice {
///         name: "Lamp".to_string(),
///         ..NewDevice::default()
///     })
///     .await?;
/// assert_eq!(device.id.value(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    devices: Vec<Device>,
    last_id: i64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(
        devices: &[Device],
        new: &NewDevice,
        exclude: Option<DeviceId>,
    ) -> Result<(), StoreError> {
        for device in devices {
            if exclude == Some(device.id) {
                continue;
            }
            if device.name == new.name {
                return Err(StoreError::Conflict {
                    field: "name",
                    value: new.name.clone(),
                });
            }
            if let (Some(a), Some(b)) = (device.mac, new.mac)
                && a == b
            {
                return Err(StoreError::Conflict {
                    field: "mac",
                    value: b.to_string(),
                });
            }
            if let (Some(a), Some(b)) = (device.address.as_deref(), new.address.as_deref())
                && a == b
            {
                return Err(StoreError::Conflict {
                    field: "address",
                    value: b.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn insert(&self, new: NewDevice) -> Result<Device, StoreError> {
        let mut inner = self.inner.write();
        Self::check_unique(&inner.devices, &new, None)?;

        inner.last_id += 1;
        let device = Device {
            id: DeviceId(inner.last_id),
            name: new.name,
            kind: new.kind,
            manufacturer: new.manufacturer,
            mac: new.mac,
            address: new.address,
            mesh_node_id: new.mesh_node_id,
            created_at: Utc::now(),
        };
        inner.devices.push(device.clone());
        Ok(device)
    }

    async fn get(&self, id: DeviceId) -> Result<Option<Device>, StoreError> {
        Ok(self
            .inner
            .read()
            .devices
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Device>, StoreError> {
        Ok(self.inner.read().devices.clone())
    }

    async fn update(&self, id: DeviceId, edit: DeviceEdit) -> Result<Device, StoreError> {
        let mut inner = self.inner.write();

        let current = inner
            .devices
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(StoreError::MissingRecord(id.value()))?;

        let mut updated = current;
        match edit {
            DeviceEdit::Name(name) => updated.name = name,
            DeviceEdit::Mac(mac) => updated.mac = mac,
            DeviceEdit::Address(address) => updated.address = Some(address),
        }

        let probe = NewDevice {
            name: updated.name.clone(),
            kind: updated.kind,
            manufacturer: updated.manufacturer,
            mac: updated.mac,
            address: updated.address.clone(),
            mesh_node_id: updated.mesh_node_id,
        };
        Self::check_unique(&inner.devices, &probe, Some(id))?;

        let slot = inner
            .devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::MissingRecord(id.value()))?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: DeviceId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let before = inner.devices.len();
        inner.devices.retain(|d| d.id != id);

        if inner.devices.len() == before {
            return Err(StoreError::MissingRecord(id.value()));
        }
        Ok(())
    }

    async fn find(
        &self,
        name_fragment: &str,
        kind: Option<DeviceKind>,
    ) -> Result<Option<Device>, StoreError> {
        let fragment = name_fragment.to_lowercase();
        Ok(self
            .inner
            .read()
            .devices
            .iter()
            .find(|d| {
                d.name.to_lowercase().contains(&fragment) || kind.is_some_and(|k| d.kind == k)
            })
            .cloned())
    }

    async fn name_taken(
        &self,
        name: &str,
        exclude: Option<DeviceId>,
    ) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .read()
            .devices
            .iter()
            .any(|d| exclude != Some(d.id) && d.name == name))
    }

    async fn mac_taken(
        &self,
        mac: MacAddress,
        exclude: Option<DeviceId>,
    ) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .read()
            .devices
            .iter()
            .any(|d| exclude != Some(d.id) && d.mac == Some(mac)))
    }

    async fn address_taken(
        &self,
        address: &str,
        exclude: Option<DeviceId>,
    ) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .read()
            .devices
            .iter()
            .any(|d| exclude != Some(d.id) && d.address.as_deref() == Some(address)))
    }
}
