// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared test fakes for the collaborator ports.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use homelink_lib::backend::{
    CommissionedNode, LightingBackend, MeshBackend, WakeBackend,
};
use homelink_lib::error::BackendError;
use homelink_lib::manager::DeviceManager;
use homelink_lib::presence::{PresenceEntry, PresenceSource};
use homelink_lib::store::MemoryStore;
use homelink_lib::types::{MacAddress, MeshNodeId, PowerReading};

/// Presence source with scriptable entries and reachability.
#[derive(Default)]
pub struct FakePresence {
    pub entries: Mutex<Vec<PresenceEntry>>,
    pub unreachable: AtomicBool,
}

#[async_trait]
impl PresenceSource for FakePresence {
    async fn list(&self) -> Result<Vec<PresenceEntry>, BackendError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(BackendError::Unreachable("router down".to_string()));
        }
        Ok(self.entries.lock().clone())
    }
}

/// Mesh backend that records calls and can be scripted to fail.
#[derive(Default)]
pub struct FakeMesh {
    pub node_power: Mutex<Option<bool>>,
    pub set_calls: Mutex<Vec<(MeshNodeId, bool)>>,
    pub decommissioned: Mutex<Vec<MeshNodeId>>,
    pub fail_decommission: AtomicBool,
    pub fail_power_state: AtomicBool,
}

#[async_trait]
impl MeshBackend for FakeMesh {
    async fn commission(&self, pairing_code: &str) -> Result<CommissionedNode, BackendError> {
        if pairing_code.is_empty() {
            return Err(BackendError::Commissioning("empty pairing code".to_string()));
        }
        Ok(CommissionedNode {
            node_id: MeshNodeId(42),
            product_name: Some("Smart Plug".to_string()),
            vendor_name: Some("Acme".to_string()),
        })
    }

    async fn decommission(&self, node_id: MeshNodeId) -> Result<(), BackendError> {
        if self.fail_decommission.load(Ordering::SeqCst) {
            return Err(BackendError::Unreachable("mesh controller down".to_string()));
        }
        self.decommissioned.lock().push(node_id);
        Ok(())
    }

    async fn power_state(&self, _node_id: MeshNodeId) -> Result<bool, BackendError> {
        if self.fail_power_state.load(Ordering::SeqCst) {
            return Err(BackendError::Unreachable("mesh controller down".to_string()));
        }
        Ok(self.node_power.lock().unwrap_or(false))
    }

    async fn set_power(&self, node_id: MeshNodeId, on: bool) -> Result<(), BackendError> {
        self.set_calls.lock().push((node_id, on));
        Ok(())
    }
}

/// Lighting backend with a scriptable reading; can hang forever to
/// exercise timeout handling.
#[derive(Default)]
pub struct FakeLighting {
    pub reading: Mutex<Option<PowerReading>>,
    pub set_calls: Mutex<Vec<(String, bool)>>,
    pub hang: AtomicBool,
}

#[async_trait]
impl LightingBackend for FakeLighting {
    async fn power_state(
        &self,
        _address: &str,
        _timeout: Duration,
    ) -> Result<Option<PowerReading>, BackendError> {
        if self.hang.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(*self.reading.lock())
    }

    async fn set_power(&self, address: &str, on: bool) -> Result<(), BackendError> {
        self.set_calls.lock().push((address.to_string(), on));
        Ok(())
    }
}

/// Wake backend that records every signal.
#[derive(Default)]
pub struct FakeWake {
    pub calls: Mutex<Vec<(MacAddress, String)>>,
}

#[async_trait]
impl WakeBackend for FakeWake {
    async fn wake(&self, mac: MacAddress, address: &str) -> Result<(), BackendError> {
        self.calls.lock().push((mac, address.to_string()));
        Ok(())
    }
}

/// A manager wired to fakes, with handles on every collaborator.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub presence: Arc<FakePresence>,
    pub mesh: Arc<FakeMesh>,
    pub lighting: Arc<FakeLighting>,
    pub wake: Arc<FakeWake>,
    pub manager: Arc<DeviceManager>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let presence = Arc::new(FakePresence::default());
        let mesh = Arc::new(FakeMesh::default());
        let lighting = Arc::new(FakeLighting::default());
        let wake = Arc::new(FakeWake::default());

        let manager = Arc::new(DeviceManager::new(
            store.clone(),
            presence.clone(),
            mesh.clone(),
            lighting.clone(),
            wake.clone(),
        ));

        Self {
            store,
            presence,
            mesh,
            lighting,
            wake,
            manager,
        }
    }
}

/// Builds a presence entry.
pub fn entry(address: &str, mac: &str, online: bool) -> PresenceEntry {
    PresenceEntry {
        address: address.to_string(),
        mac: mac.parse().unwrap(),
        hostname: String::new(),
        online,
        uptime: Duration::from_secs(600),
    }
}
