// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device manager.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::{
    CommissionedNode, ControlRoute, LightingBackend, MeshBackend, PowerCommand, WakeBackend,
};
use crate::device::{Device, DeviceEdit, DeviceInfo, DeviceState, NewDevice};
use crate::error::{Error, Result, StoreError};
use crate::presence::{self, Endpoint, PresenceEntry, PresenceSource};
use crate::store::DeviceStore;
use crate::types::{DeviceId, DeviceKind, MacAddress, Manufacturer, MeshNodeId, Power};

/// Options for a state query.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use homelink_lib::manager::InfoOptions;
///
/// let options = InfoOptions::default().with_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    timeout: Option<Duration>,
    snapshot: Option<Vec<PresenceEntry>>,
}

impl InfoOptions {
    /// Bounds backend power queries with this timeout instead of the
    /// manager's default.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuses a pre-fetched presence snapshot instead of fetching one.
    ///
    /// Callers listing many devices fetch the snapshot once and pass it to
    /// every query.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: Vec<PresenceEntry>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

/// Manager for heterogeneous smart-home devices.
///
/// The manager reconciles persisted device records with live network
/// presence, aggregates a unified on/off + reachability state across the
/// three control backends, and dispatches power commands to the backend
/// matching each device's binding.
///
/// All collaborators are injected at construction, so hosts wire in their
/// real store/router/protocol clients and tests wire in fakes.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use homelink_lib::manager::DeviceManager;
/// use homelink_lib::store::MemoryStore;
/// # use homelink_lib::presence::{PresenceEntry, PresenceSource};
/// # use homelink_lib::backend::{CommissionedNode, LightingBackend, MeshBackend, WakeBackend};
/// # use homelink_lib::types::{MacAddress, MeshNodeId, PowerReading};
/// # use homelink_lib::error::BackendError;
/// # struct Router;
/// # #[async_trait::async_trait]
/// # impl PresenceSource for Router {
/// #     async fn list(&self) -> Result<Vec<PresenceEntry>, BackendError> { Ok(vec![]) }
/// # }
/// # struct Mesh;
/// # #[async_trait::async_trait]
/// # impl MeshBackend for Mesh {
/// #     async fn commission(&self, _: &str) -> Result<CommissionedNode, BackendError> { unimplemented!() }
/// #     async fn decommission(&self, _: MeshNodeId) -> Result<(), BackendError> { Ok(()) }
/// #     async fn power_state(&self, _: MeshNodeId) -> Result<bool, BackendError> { Ok(false) }
/// #     async fn set_power(&self, _: MeshNodeId, _: bool) -> Result<(), BackendError> { Ok(()) }
/// # }
/// # struct Bulbs;
/// # #[async_trait::async_trait]
/// # impl LightingBackend for Bulbs {
/// #     async fn power_state(&self, _: &str, _: std::time::Duration) -> Result<Option<PowerReading>, BackendError> { Ok(None) }
/// #     async fn set_power(&self, _: &str, _: bool) -> Result<(), BackendError> { Ok(()) }
/// # }
/// # struct Wol;
/// # #[async_trait::async_trait]
/// # impl WakeBackend for Wol {
/// #     async fn wake(&self, _: MacAddress, _: &str) -> Result<(), BackendError> { Ok(()) }
/// # }
///
/// # #[tokio::main]
/// # async fn main() -> homelink_lib::Result<()> {
/// let manager = DeviceManager::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(Router),
///     Arc::new(Mesh),
///     Arc::new(Bulbs),
///     Arc::new(Wol),
/// );
///
/// for device in manager.devices().await? {
///     let info = manager.device_info(device.id, Default::default()).await?;
///     println!("{}: online={}", info.device.name, info.state.online);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DeviceManager {
    store: Arc<dyn DeviceStore>,
    presence: Arc<dyn PresenceSource>,
    mesh: Arc<dyn MeshBackend>,
    lighting: Arc<dyn LightingBackend>,
    wake: Arc<dyn WakeBackend>,
    default_timeout: Duration,
}

impl DeviceManager {
    /// Default timeout for backend power queries.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a manager over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn DeviceStore>,
        presence: Arc<dyn PresenceSource>,
        mesh: Arc<dyn MeshBackend>,
        lighting: Arc<dyn LightingBackend>,
        wake: Arc<dyn WakeBackend>,
    ) -> Self {
        Self {
            store,
            presence,
            mesh,
            lighting,
            wake,
            default_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the default timeout for backend power queries.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Returns the store this manager writes to.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DeviceStore> {
        &self.store
    }

    // =========================================================================
    // Device records
    // =========================================================================

    /// Creates a device record.
    ///
    /// The payload's address/MAC are reconciled against the live presence
    /// snapshot first, so a device entered by either identifier is stored
    /// with both when the network knows them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] when a uniqueness constraint is violated.
    pub async fn add_device(&self, new: NewDevice) -> Result<Device> {
        let endpoint = self
            .resolve_endpoint(Endpoint::new(new.address.clone(), new.mac))
            .await;

        let device = self
            .store
            .insert(NewDevice {
                address: endpoint.address,
                mac: endpoint.mac,
                ..new
            })
            .await?;

        tracing::info!(id = %device.id, name = %device.name, "Added device");
        Ok(device)
    }

    /// Fetches a device record by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] when no record has the id.
    pub async fn get_device(&self, id: DeviceId) -> Result<Device> {
        self.store.get(id).await?.ok_or(Error::DeviceNotFound)
    }

    /// Returns all device records.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        Ok(self.store.list().await?)
    }

    /// Applies a single-field update to a device record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] when no record has the id and
    /// [`Error::Store`] on a uniqueness conflict.
    pub async fn edit_device(&self, id: DeviceId, edit: DeviceEdit) -> Result<Device> {
        let device = self.store.update(id, edit).await.map_err(|err| match err {
            StoreError::MissingRecord(_) => Error::DeviceNotFound,
            other => other.into(),
        })?;

        tracing::info!(id = %device.id, "Edited device");
        Ok(device)
    }

    /// Deletes a device record.
    ///
    /// A record bound to a mesh node is decommissioned first; if
    /// decommissioning fails the record is left intact, so no record ever
    /// points at an orphaned mesh node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] when no record has the id and
    /// [`Error::Backend`] when decommissioning fails.
    pub async fn delete_device(&self, id: DeviceId) -> Result<()> {
        let device = self.get_device(id).await?;

        if let Some(node_id) = device.mesh_node_id {
            tracing::debug!(id = %id, node = %node_id, "Decommissioning before delete");
            self.mesh.decommission(node_id).await?;
        }

        self.store.delete(id).await.map_err(|err| match err {
            StoreError::MissingRecord(_) => Error::DeviceNotFound,
            other => other.into(),
        })?;

        tracing::info!(id = %id, "Deleted device");
        Ok(())
    }

    /// Finds a device by a free-text query.
    ///
    /// Matches the name as a case-insensitive substring, or the kind when
    /// the query word is in the kind vocabulary (so "lamp" finds the first
    /// lightbulb).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] when nothing matches.
    pub async fn find_device(&self, query: &str) -> Result<Device> {
        let kind = DeviceKind::from_search_word(query);
        self.store
            .find(query, kind)
            .await?
            .ok_or(Error::DeviceNotFound)
    }

    // =========================================================================
    // Uniqueness probes
    // =========================================================================

    /// Returns true if no other record owns the name.
    pub async fn name_available(&self, name: &str, exclude: Option<DeviceId>) -> Result<bool> {
        Ok(!self.store.name_taken(name, exclude).await?)
    }

    /// Returns true if no other record owns the MAC.
    pub async fn mac_available(&self, mac: MacAddress, exclude: Option<DeviceId>) -> Result<bool> {
        Ok(!self.store.mac_taken(mac, exclude).await?)
    }

    /// Returns true if no other record owns the address.
    pub async fn address_available(
        &self,
        address: &str,
        exclude: Option<DeviceId>,
    ) -> Result<bool> {
        Ok(!self.store.address_taken(address, exclude).await?)
    }

    // =========================================================================
    // Mesh lifecycle
    // =========================================================================

    /// Commissions a device with a pairing code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] when pairing fails.
    pub async fn commission(&self, pairing_code: &str) -> Result<CommissionedNode> {
        let node = self.mesh.commission(pairing_code).await?;
        tracing::info!(node = %node.node_id, "Commissioned mesh node");
        Ok(node)
    }

    /// Removes a commissioned node from the mesh fabric.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] when the node cannot be removed.
    pub async fn decommission(&self, node_id: MeshNodeId) -> Result<()> {
        self.mesh.decommission(node_id).await?;
        tracing::info!(node = %node_id, "Decommissioned mesh node");
        Ok(())
    }

    // =========================================================================
    // Identity resolution
    // =========================================================================

    /// Fetches the current presence snapshot.
    ///
    /// An unreachable presence source degrades to an empty snapshot; state
    /// queries must not hard-depend on the router being up.
    pub async fn presence_snapshot(&self) -> Vec<PresenceEntry> {
        match self.presence.list().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "Presence source unreachable, using empty snapshot");
                Vec::new()
            }
        }
    }

    /// Reconciles an endpoint against the live presence snapshot.
    pub async fn resolve_endpoint(&self, known: Endpoint) -> Endpoint {
        let snapshot = self.presence_snapshot().await;
        presence::resolve(&snapshot, known)
    }

    // =========================================================================
    // State aggregation
    // =========================================================================

    /// Fetches a device record together with its live state.
    ///
    /// The record and the presence snapshot are fetched concurrently.
    /// Backend unreachability never fails the query: power degrades to
    /// [`Power::Unknown`] and a missing presence match means offline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] when no record has the id.
    pub async fn device_info(&self, id: DeviceId, options: InfoOptions) -> Result<DeviceInfo> {
        let (device, snapshot) = match options.snapshot {
            Some(snapshot) => (self.get_device(id).await?, snapshot),
            None => {
                let (device, snapshot) =
                    tokio::join!(self.get_device(id), self.presence_snapshot());
                (device?, snapshot)
            }
        };

        let online = presence::find_entry(&snapshot, &device.endpoint())
            .is_some_and(|entry| entry.online);

        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let power = self.query_power(&device, &snapshot, timeout).await;

        Ok(DeviceInfo {
            device,
            state: DeviceState { online, power },
        })
    }

    /// Fetches all device records with their live state.
    ///
    /// The presence snapshot is fetched once and shared across the
    /// queries.
    pub async fn device_infos(&self, options: InfoOptions) -> Result<Vec<DeviceInfo>> {
        let snapshot = match options.snapshot {
            Some(snapshot) => snapshot,
            None => self.presence_snapshot().await,
        };

        let mut infos = Vec::new();
        for device in self.devices().await? {
            let per_device = InfoOptions {
                timeout: options.timeout,
                snapshot: Some(snapshot.clone()),
            };
            infos.push(self.device_info(device.id, per_device).await?);
        }
        Ok(infos)
    }

    async fn query_power(
        &self,
        device: &Device,
        snapshot: &[PresenceEntry],
        timeout: Duration,
    ) -> Power {
        if let Some(node_id) = device.mesh_node_id {
            return match self.mesh.power_state(node_id).await {
                Ok(on) => Power::from(on),
                Err(err) => {
                    tracing::warn!(node = %node_id, error = %err, "Mesh power query failed");
                    Power::Unknown
                }
            };
        }

        if device.kind == DeviceKind::Lightbulb && device.manufacturer == Manufacturer::Yeelight {
            let resolved = presence::resolve(snapshot, device.endpoint());
            let Some(address) = resolved.address else {
                return Power::Unknown;
            };

            return match tokio::time::timeout(timeout, self.lighting.power_state(&address, timeout))
                .await
            {
                Ok(Ok(reading)) => Power::from_reading(reading),
                Ok(Err(err)) => {
                    tracing::warn!(address = %address, error = %err, "Lighting power query failed");
                    Power::Unknown
                }
                Err(_) => {
                    tracing::warn!(address = %address, "Lighting power query timed out");
                    Power::Unknown
                }
            };
        }

        Power::Unknown
    }

    // =========================================================================
    // Control dispatch
    // =========================================================================

    /// Turns a device on via its routed backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] when no record has the id,
    /// [`Error::Unsupported`] when no backend can handle the device, and
    /// [`Error::Backend`] when the routed backend fails.
    pub async fn turn_on(&self, id: DeviceId) -> Result<()> {
        self.dispatch(id, PowerCommand::TurnOn).await
    }

    /// Turns a device off via its routed backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] when no record has the id,
    /// [`Error::Unsupported`] when no backend can handle the device, and
    /// [`Error::Backend`] when the routed backend fails.
    pub async fn turn_off(&self, id: DeviceId) -> Result<()> {
        self.dispatch(id, PowerCommand::TurnOff).await
    }

    async fn dispatch(&self, id: DeviceId, command: PowerCommand) -> Result<()> {
        let device = self.get_device(id).await?;
        let route = ControlRoute::classify(&device, command);
        tracing::debug!(id = %id, command = command.label(), route = ?route, "Dispatching");

        match route {
            ControlRoute::Mesh(node_id) => {
                self.mesh.set_power(node_id, command.is_on()).await?;
            }
            ControlRoute::Lighting => {
                let resolved = self.resolve_endpoint(device.endpoint()).await;
                let Some(address) = resolved.address else {
                    return Err(Error::Unsupported);
                };
                self.lighting.set_power(&address, command.is_on()).await?;
            }
            ControlRoute::Wake => {
                let resolved = self.resolve_endpoint(device.endpoint()).await;
                let (Some(mac), Some(address)) = (resolved.mac, resolved.address) else {
                    return Err(Error::Unsupported);
                };
                self.wake.wake(mac, &address).await?;
            }
            ControlRoute::Unsupported => return Err(Error::Unsupported),
        }

        Ok(())
    }
}
