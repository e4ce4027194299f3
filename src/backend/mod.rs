// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol backend ports.
//!
//! Three structurally different control protocols sit behind these
//! traits:
//!
//! - [`MeshBackend`]: commissioning-based mesh control. A pairing code
//!   yields a node id; power is controlled per node.
//! - [`LightingBackend`]: a vendor LAN protocol addressed by IP, with a
//!   caller-supplied query timeout.
//! - [`WakeBackend`]: a fire-and-forget wake signal addressed by MAC.
//!
//! The library never implements these protocols itself; hosts inject
//! implementations at construction, and tests inject fakes.

mod route;

pub use route::{ControlRoute, PowerCommand};

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::types::{MacAddress, MeshNodeId, PowerReading};

/// Descriptor of a freshly commissioned mesh node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionedNode {
    /// The node id assigned by the mesh fabric.
    pub node_id: MeshNodeId,
    /// Product name reported during commissioning, if any.
    pub product_name: Option<String>,
    /// Vendor name reported during commissioning, if any.
    pub vendor_name: Option<String>,
}

/// Port for the mesh commissioning protocol.
#[async_trait]
pub trait MeshBackend: Send + Sync {
    /// Commissions a device with the given pairing code.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Commissioning`] when pairing fails.
    async fn commission(&self, pairing_code: &str) -> Result<CommissionedNode, BackendError>;

    /// Removes a commissioned node from the fabric.
    async fn decommission(&self, node_id: MeshNodeId) -> Result<(), BackendError>;

    /// Queries the node's current power state.
    async fn power_state(&self, node_id: MeshNodeId) -> Result<bool, BackendError>;

    /// Sets the node's power state.
    async fn set_power(&self, node_id: MeshNodeId, on: bool) -> Result<(), BackendError>;
}

/// Port for the vendor lighting LAN protocol.
#[async_trait]
pub trait LightingBackend: Send + Sync {
    /// Queries the bulb's power state, bounded by `timeout`.
    ///
    /// Returns `None` when the bulb gave no reading within the timeout.
    async fn power_state(
        &self,
        address: &str,
        timeout: Duration,
    ) -> Result<Option<PowerReading>, BackendError>;

    /// Sets the bulb's power state.
    async fn set_power(&self, address: &str, on: bool) -> Result<(), BackendError>;
}

/// Port for the wake signal.
#[async_trait]
pub trait WakeBackend: Send + Sync {
    /// Fires a wake signal at the given MAC via the given address.
    ///
    /// Fire-and-forget: success only means the packet left; there is no
    /// acknowledgment from the device.
    async fn wake(&self, mac: MacAddress, address: &str) -> Result<(), BackendError>;
}
