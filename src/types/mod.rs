// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types shared across the library.

mod kind;
mod mac;
mod power;

pub use kind::{DeviceKind, Manufacturer};
pub use mac::MacAddress;
pub use power::{Power, PowerReading};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a persisted device record.
///
/// Assigned by the record store at creation time. The value `0` is used
/// for ad-hoc records derived from presence entries that were never
/// persisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct DeviceId(pub i64);

impl DeviceId {
    /// Returns the raw numeric id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DeviceId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Identifier of a commissioned mesh node.
///
/// The mesh backend assigns this when a device is commissioned with a
/// pairing code; it is stored on the device record and from then on
/// overrides kind/manufacturer based control routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshNodeId(pub u64);

impl MeshNodeId {
    /// Returns the raw numeric node id.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MeshNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MeshNodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
