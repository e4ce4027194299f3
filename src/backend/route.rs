// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control routing.
//!
//! [`ControlRoute::classify`] is the single place the routing table
//! lives: given a device record and a power command direction, it decides
//! which backend handles the command. The dispatcher matches the result
//! exhaustively, so every (binding, kind, manufacturer, direction)
//! combination has a reviewable outcome here.

use crate::device::Device;
use crate::types::{DeviceKind, Manufacturer, MeshNodeId};

/// Direction of a power command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Turn the device on.
    TurnOn,
    /// Turn the device off.
    TurnOff,
}

impl PowerCommand {
    /// Returns true for the on direction.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::TurnOn)
    }

    /// Returns the label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
        }
    }
}

/// The backend selected for a device's power command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRoute {
    /// Route to the mesh backend with the bound node id.
    Mesh(MeshNodeId),
    /// Route to the vendor lighting backend; the dispatcher resolves the
    /// live address first.
    Lighting,
    /// Route to the wake signal; the dispatcher resolves address and MAC
    /// first. Only ever offered for turn-on.
    Wake,
    /// No backend exists for this combination.
    Unsupported,
}

impl ControlRoute {
    /// Classifies a device's power command, in fixed priority order:
    ///
    /// 1. A mesh node binding wins outright, ignoring kind and
    ///    manufacturer.
    /// 2. A Yeelight lightbulb goes to the lighting backend, in both
    ///    directions. Lightbulbs of other manufacturers have no backend.
    /// 3. Any other kind can be woken, but only woken: the wake signal
    ///    exists solely for turn-on.
    /// 4. Everything else is unsupported.
    #[must_use]
    pub fn classify(device: &Device, command: PowerCommand) -> Self {
        if let Some(node_id) = device.mesh_node_id {
            return Self::Mesh(node_id);
        }

        if device.kind == DeviceKind::Lightbulb {
            if device.manufacturer == Manufacturer::Yeelight {
                return Self::Lighting;
            }
            return Self::Unsupported;
        }

        if command.is_on() {
            return Self::Wake;
        }

        Self::Unsupported
    }
}
