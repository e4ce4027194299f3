// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Network presence snapshots and identity resolution.
//!
//! Devices are located through a router's lease/ARP table rather than a
//! fixed address. A [`PresenceSource`] supplies point-in-time
//! [`PresenceEntry`] snapshots; the pure functions here reconcile a stored
//! device's address/MAC against such a snapshot.
//!
//! Resolution never fails: when no entry matches, the stored values pass
//! through unchanged, and callers treat an unreachable source as an empty
//! snapshot.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::types::MacAddress;

/// A network-visible device reported by the presence source.
///
/// Lives for one snapshot fetch; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    /// The device's current network address.
    pub address: String,
    /// The device's MAC address.
    pub mac: MacAddress,
    /// Hostname reported by the device, if any.
    pub hostname: String,
    /// Whether the device currently answers on the network.
    pub online: bool,
    /// How long the lease has been active.
    pub uptime: Duration,
}

/// Source of live network presence snapshots.
///
/// Implementations typically query a router's DHCP lease or ARP table.
/// The core tolerates an unreachable source by degrading to an empty
/// snapshot, so implementations should surface failures rather than block.
#[async_trait]
pub trait PresenceSource: Send + Sync {
    /// Returns the current snapshot of network-visible devices.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the source cannot be reached.
    async fn list(&self) -> Result<Vec<PresenceEntry>, BackendError>;
}

/// A device's network identity: address and MAC, either possibly unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Endpoint {
    /// Network address, if known.
    pub address: Option<String>,
    /// MAC address, if known.
    pub mac: Option<MacAddress>,
}

impl Endpoint {
    /// Creates an endpoint from optional address and MAC parts.
    #[must_use]
    pub fn new(address: Option<String>, mac: Option<MacAddress>) -> Self {
        Self { address, mac }
    }

    /// Returns true when the entry matches this endpoint's MAC or address.
    ///
    /// MAC comparison is case-insensitive by construction of
    /// [`MacAddress`].
    #[must_use]
    pub fn matches(&self, entry: &PresenceEntry) -> bool {
        self.mac.is_some_and(|mac| mac == entry.mac)
            || self
                .address
                .as_deref()
                .is_some_and(|address| address == entry.address)
    }
}

/// Finds the snapshot entry matching the endpoint, if any.
///
/// Either the MAC or the address qualifies; the first entry in snapshot
/// order wins. Snapshot order is whatever the source returned.
#[must_use]
pub fn find_entry<'a>(snapshot: &'a [PresenceEntry], endpoint: &Endpoint) -> Option<&'a PresenceEntry> {
    snapshot.iter().find(|entry| endpoint.matches(entry))
}

/// Reconciles a stored endpoint against a presence snapshot.
///
/// When an entry matches, its address and MAC replace the stored values;
/// otherwise the stored values pass through unchanged. Resolving the same
/// endpoint against the same snapshot twice yields the same result.
#[must_use]
pub fn resolve(snapshot: &[PresenceEntry], known: Endpoint) -> Endpoint {
    match find_entry(snapshot, &known) {
        Some(entry) => Endpoint {
            address: Some(entry.address.clone()),
            mac: Some(entry.mac),
        },
        None => known,
    }
}
