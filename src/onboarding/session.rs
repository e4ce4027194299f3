// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversation state and reply types.

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceEdit, NewDevice};
use crate::types::DeviceId;

/// Step of the add-device flow currently awaiting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddStep {
    /// Waiting for the device name.
    SetName,
    /// Waiting for a kind selection.
    SetKind,
    /// Waiting for a manufacturer selection.
    SetManufacturer,
    /// Waiting for the MAC address (or `-` for none).
    SetMac,
    /// Waiting for the network address.
    SetAddress,
}

/// Field of an existing device being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditField {
    /// The display name.
    Name,
    /// The MAC address.
    Mac,
    /// The network address.
    Address,
}

/// Per-user conversation state.
///
/// Serializable so the host can persist it as an opaque blob between
/// turns. Each state carries exactly the payload its handlers need.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Session {
    /// No flow in progress.
    #[default]
    Idle,
    /// Adding a device, with the fields accumulated so far.
    AddDevice {
        /// The step awaiting input.
        step: AddStep,
        /// Fields collected in previous steps.
        payload: NewDevice,
    },
    /// Editing one field of an existing device.
    EditField {
        /// The device being edited.
        device_id: DeviceId,
        /// The field awaiting input.
        field: EditField,
    },
}

/// Navigation target offered alongside a prompt.
///
/// The host renders these as buttons; pressing one feeds the target back
/// into [`Onboarding::back`](super::Onboarding::back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavTarget {
    /// Abandon the flow and return to the status screen.
    Status,
    /// Return to the kind selection step.
    SetKind,
    /// Return to the MAC entry step.
    SetMac,
    /// Return to the edit summary of a device.
    EditDevice(DeviceId),
}

/// A prompt for the next input, with its navigation escape hatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Text the host should show the operator.
    pub text: String,
    /// Navigation targets to offer as buttons.
    pub back: Vec<NavTarget>,
}

impl Prompt {
    pub(crate) fn new(text: impl Into<String>, back: Vec<NavTarget>) -> Self {
        Self {
            text: text.into(),
            back,
        }
    }
}

/// Outcome of one conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowReply {
    /// Show a prompt and await more input.
    Prompt(Prompt),
    /// The add flow finished and created this device.
    DeviceCreated(Device),
    /// An edit flow applied this update.
    FieldUpdated {
        /// The device after the update.
        device: Device,
        /// The update that was applied.
        edit: DeviceEdit,
    },
    /// The input did not belong to any active flow.
    Ignored,
}
