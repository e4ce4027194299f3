// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device records and derived state.
//!
//! A [`Device`] is the persisted entity managed by the record store. Its
//! live [`DeviceState`] is derived fresh on every query and never cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::presence::{Endpoint, PresenceEntry};
use crate::types::{DeviceId, DeviceKind, MacAddress, Manufacturer, MeshNodeId, Power};

/// A persisted smart-home device record.
///
/// `name`, `mac` and `address` are unique across records (when present);
/// the store enforces the invariant, the core checks it before writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Unique record id, assigned at creation.
    pub id: DeviceId,
    /// Unique, non-empty display name.
    pub name: String,
    /// Kind of device.
    pub kind: DeviceKind,
    /// Manufacturer of the device.
    pub manufacturer: Manufacturer,
    /// MAC address, unique when present.
    pub mac: Option<MacAddress>,
    /// Network address, unique when present.
    pub address: Option<String>,
    /// Mesh node binding. When set, it overrides kind/manufacturer based
    /// control routing.
    pub mesh_node_id: Option<MeshNodeId>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Device {
    /// Projects the record to its stored network identity.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.address.clone(), self.mac)
    }

    /// Builds an ad-hoc, unsaved record from a presence entry.
    ///
    /// Used to display network-visible devices that were never onboarded.
    /// The record carries id `0`, unknown kind and manufacturer, and a
    /// creation time back-dated by the lease uptime.
    #[must_use]
    pub fn from_presence(entry: &PresenceEntry) -> Self {
        let uptime = chrono::Duration::from_std(entry.uptime).unwrap_or_else(|_| {
            chrono::Duration::zero()
        });

        Self {
            id: DeviceId(0),
            name: if entry.hostname.is_empty() {
                entry.address.clone()
            } else {
                entry.hostname.clone()
            },
            kind: DeviceKind::Unknown,
            manufacturer: Manufacturer::Unknown,
            mac: Some(entry.mac),
            address: Some(entry.address.clone()),
            mesh_node_id: None,
            created_at: Utc::now() - uptime,
        }
    }
}

/// Payload for creating a device record.
///
/// Also serves as the payload the onboarding flow accumulates across
/// conversation turns, which is why it is serializable and defaults to the
/// pre-selection values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDevice {
    /// Display name.
    pub name: String,
    /// Kind of device.
    pub kind: DeviceKind,
    /// Manufacturer of the device.
    pub manufacturer: Manufacturer,
    /// MAC address, if any.
    pub mac: Option<MacAddress>,
    /// Network address, if any.
    pub address: Option<String>,
    /// Mesh node binding, if the device was commissioned beforehand.
    pub mesh_node_id: Option<MeshNodeId>,
}

impl Default for NewDevice {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: DeviceKind::Other,
            manufacturer: Manufacturer::Other,
            mac: None,
            address: None,
            mesh_node_id: None,
        }
    }
}

/// A single-field update to an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceEdit {
    /// Replace the display name.
    Name(String),
    /// Replace or clear the MAC address.
    Mac(Option<MacAddress>),
    /// Replace the network address.
    Address(String),
}

impl DeviceEdit {
    /// Returns the name of the edited field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Mac(_) => "mac",
            Self::Address(_) => "address",
        }
    }
}

/// Live on/off and reachability state of a device.
///
/// Computed fresh on every query; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceState {
    /// Whether the device is currently visible on the network.
    pub online: bool,
    /// Aggregated power state.
    pub power: Power,
}

/// A device record together with its live state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// The persisted record.
    #[serde(flatten)]
    pub device: Device,
    /// The state derived at query time.
    pub state: DeviceState,
}
