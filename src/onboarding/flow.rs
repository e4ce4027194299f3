// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversation flow handlers.

use std::sync::Arc;

use crate::device::{DeviceEdit, NewDevice};
use crate::error::Result;
use crate::manager::DeviceManager;
use crate::types::{DeviceId, DeviceKind, MacAddress, Manufacturer};

use super::session::{AddStep, EditField, FlowReply, NavTarget, Prompt, Session};

const NAME_PROMPT: &str = "Enter the device name";
const NAME_EMPTY: &str = "The device name must contain at least one character";
const NAME_TAKEN: &str = "The device name must be unique";
const KIND_PROMPT: &str = "Choose the device kind";
const MANUFACTURER_PROMPT: &str = "Choose the manufacturer";
const MAC_PROMPT: &str = "Enter the device MAC address, or \"-\" if it has none";
const MAC_INVALID: &str = "Enter a valid MAC address (example: 12:23:56:9f:aa:bb)";
const MAC_TAKEN: &str = "The MAC address must be unique";
const ADDRESS_PROMPT: &str = "Enter the device address";
const ADDRESS_EMPTY: &str = "The device address must contain at least one character";
const ADDRESS_TAKEN: &str = "The device address must be unique";

/// Driver of the onboarding and editing conversation.
///
/// Each handler takes the per-user [`Session`] mutably, advances the
/// machine, and answers with a [`FlowReply`]. A handler that fails with a
/// store error leaves the session untouched, so the turn can be retried.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use homelink_lib::manager::DeviceManager;
/// use homelink_lib::onboarding::{FlowReply, Onboarding, Session};
///
/// # async fn turn(manager: Arc<DeviceManager>, blob: &str, text: &str) -> homelink_lib::Result<String> {
/// let flow = Onboarding::new(manager);
///
/// // One conversation turn: load, advance, store.
/// let mut session: Session = serde_json::from_str(blob).unwrap_or_default();
/// let reply = flow.handle_text(&mut session, text).await?;
/// let blob = serde_json::to_string(&session).expect("session serializes");
///
/// match reply {
///     FlowReply::Prompt(prompt) => println!("{}", prompt.text),
///     FlowReply::DeviceCreated(device) => println!("Device added: {}", device.name),
///     _ => {}
/// }
/// # Ok(blob)
/// # }
/// ```
pub struct Onboarding {
    manager: Arc<DeviceManager>,
}

impl Onboarding {
    /// Creates a flow driver over the given manager.
    #[must_use]
    pub fn new(manager: Arc<DeviceManager>) -> Self {
        Self { manager }
    }

    /// Begins the add-device flow with a fresh payload.
    pub fn start_add_device(&self, session: &mut Session) -> Prompt {
        *session = Session::AddDevice {
            step: AddStep::SetName,
            payload: NewDevice::default(),
        };
        Prompt::new(NAME_PROMPT, vec![NavTarget::Status])
    }

    /// Begins editing a single field of an existing device.
    pub fn start_edit(
        &self,
        session: &mut Session,
        device_id: DeviceId,
        field: EditField,
    ) -> Prompt {
        *session = Session::EditField { device_id, field };
        let text = match field {
            EditField::Name => NAME_PROMPT,
            EditField::Mac => MAC_PROMPT,
            EditField::Address => ADDRESS_PROMPT,
        };
        Prompt::new(text, vec![NavTarget::EditDevice(device_id)])
    }

    /// Handles a free-text input for whatever step the session is in.
    ///
    /// # Errors
    ///
    /// Returns store/backend errors only; validation failures become
    /// re-prompts.
    pub async fn handle_text(&self, session: &mut Session, text: &str) -> Result<FlowReply> {
        let (next, reply) = self.step_text(session.clone(), text).await?;
        *session = next;
        Ok(reply)
    }

    /// Handles a kind selection on the kind step.
    pub fn choose_kind(&self, session: &mut Session, kind: DeviceKind) -> FlowReply {
        let Session::AddDevice { step, payload } = session else {
            return FlowReply::Ignored;
        };
        if *step != AddStep::SetKind {
            return FlowReply::Ignored;
        }

        payload.kind = kind;
        *step = AddStep::SetManufacturer;
        FlowReply::Prompt(Prompt::new(MANUFACTURER_PROMPT, vec![NavTarget::Status]))
    }

    /// Handles a manufacturer selection on the manufacturer step.
    pub fn choose_manufacturer(
        &self,
        session: &mut Session,
        manufacturer: Manufacturer,
    ) -> FlowReply {
        let Session::AddDevice { step, payload } = session else {
            return FlowReply::Ignored;
        };
        if *step != AddStep::SetManufacturer {
            return FlowReply::Ignored;
        }

        payload.manufacturer = manufacturer;
        *step = AddStep::SetMac;
        FlowReply::Prompt(Prompt::new(
            MAC_PROMPT,
            vec![NavTarget::SetKind, NavTarget::Status],
        ))
    }

    /// Navigates back to an earlier step or out of the flow.
    ///
    /// In-flow targets rewind the step without touching the accumulated
    /// payload. [`NavTarget::Status`] and [`NavTarget::EditDevice`]
    /// abandon the flow; rendering those screens is the host's job, so the
    /// reply is [`FlowReply::Ignored`].
    pub fn back(&self, session: &mut Session, target: NavTarget) -> FlowReply {
        match target {
            NavTarget::Status | NavTarget::EditDevice(_) => {
                *session = Session::Idle;
                FlowReply::Ignored
            }
            NavTarget::SetKind => self.rewind(session, AddStep::SetKind, KIND_PROMPT, vec![
                NavTarget::Status,
            ]),
            NavTarget::SetMac => self.rewind(session, AddStep::SetMac, MAC_PROMPT, vec![
                NavTarget::SetKind,
                NavTarget::Status,
            ]),
        }
    }

    fn rewind(
        &self,
        session: &mut Session,
        step: AddStep,
        text: &str,
        back: Vec<NavTarget>,
    ) -> FlowReply {
        let Session::AddDevice { step: current, .. } = session else {
            return FlowReply::Ignored;
        };

        *current = step;
        FlowReply::Prompt(Prompt::new(text, back))
    }

    async fn step_text(&self, state: Session, text: &str) -> Result<(Session, FlowReply)> {
        match state {
            Session::Idle => Ok((Session::Idle, FlowReply::Ignored)),
            Session::AddDevice { step, payload } => self.step_add(step, payload, text).await,
            Session::EditField { device_id, field } => {
                self.step_edit(device_id, field, text).await
            }
        }
    }

    async fn step_add(
        &self,
        step: AddStep,
        mut payload: NewDevice,
        text: &str,
    ) -> Result<(Session, FlowReply)> {
        let reprompt = |step: AddStep, payload: NewDevice, text: &str, back: Vec<NavTarget>| {
            (
                Session::AddDevice { step, payload },
                FlowReply::Prompt(Prompt::new(text, back)),
            )
        };

        match step {
            AddStep::SetName => {
                let name = text.trim();
                if name.is_empty() {
                    return Ok(reprompt(step, payload, NAME_EMPTY, vec![NavTarget::Status]));
                }
                if !self.manager.name_available(name, None).await? {
                    return Ok(reprompt(step, payload, NAME_TAKEN, vec![NavTarget::Status]));
                }

                payload.name = name.to_string();
                Ok(reprompt(
                    AddStep::SetKind,
                    payload,
                    KIND_PROMPT,
                    vec![NavTarget::Status],
                ))
            }

            // Selection steps only react to keyboard choices; free text
            // re-renders the selection.
            AddStep::SetKind => Ok(reprompt(step, payload, KIND_PROMPT, vec![NavTarget::Status])),
            AddStep::SetManufacturer => Ok(reprompt(
                step,
                payload,
                MANUFACTURER_PROMPT,
                vec![NavTarget::Status],
            )),

            AddStep::SetMac => {
                let back = vec![NavTarget::SetKind, NavTarget::Status];
                let input = text.trim();

                let mac = if input == "-" {
                    None
                } else {
                    match input.parse::<MacAddress>() {
                        Ok(mac) => Some(mac),
                        Err(_) => return Ok(reprompt(step, payload, MAC_INVALID, back)),
                    }
                };

                if let Some(mac) = mac {
                    if !self.manager.mac_available(mac, None).await? {
                        return Ok(reprompt(step, payload, MAC_TAKEN, back));
                    }
                }

                payload.mac = mac;
                Ok(reprompt(
                    AddStep::SetAddress,
                    payload,
                    ADDRESS_PROMPT,
                    vec![NavTarget::SetMac, NavTarget::Status],
                ))
            }

            AddStep::SetAddress => {
                let back = vec![NavTarget::SetMac, NavTarget::Status];
                let address = text.trim();

                if address.is_empty() {
                    return Ok(reprompt(step, payload, ADDRESS_EMPTY, back));
                }
                if !self.manager.address_available(address, None).await? {
                    return Ok(reprompt(step, payload, ADDRESS_TAKEN, back));
                }

                payload.address = Some(address.to_string());
                let device = self.manager.add_device(payload).await?;
                Ok((Session::Idle, FlowReply::DeviceCreated(device)))
            }
        }
    }

    async fn step_edit(
        &self,
        device_id: DeviceId,
        field: EditField,
        text: &str,
    ) -> Result<(Session, FlowReply)> {
        let state = Session::EditField { device_id, field };
        let back = vec![NavTarget::EditDevice(device_id)];
        let reprompt = |text: &str| {
            (
                state.clone(),
                FlowReply::Prompt(Prompt::new(text, back.clone())),
            )
        };

        let edit = match field {
            EditField::Name => {
                let name = text.trim();
                if name.is_empty() {
                    return Ok(reprompt(NAME_EMPTY));
                }
                if !self.manager.name_available(name, Some(device_id)).await? {
                    return Ok(reprompt(NAME_TAKEN));
                }
                DeviceEdit::Name(name.to_string())
            }

            EditField::Mac => {
                let input = text.trim();
                if input == "-" {
                    DeviceEdit::Mac(None)
                } else {
                    let mac = match input.parse::<MacAddress>() {
                        Ok(mac) => mac,
                        Err(_) => return Ok(reprompt(MAC_INVALID)),
                    };
                    if !self.manager.mac_available(mac, Some(device_id)).await? {
                        return Ok(reprompt(MAC_TAKEN));
                    }
                    DeviceEdit::Mac(Some(mac))
                }
            }

            EditField::Address => {
                let address = text.trim();
                if address.is_empty() {
                    return Ok(reprompt(ADDRESS_EMPTY));
                }
                if !self
                    .manager
                    .address_available(address, Some(device_id))
                    .await?
                {
                    return Ok(reprompt(ADDRESS_TAKEN));
                }
                DeviceEdit::Address(address.to_string())
            }
        };

        let device = self.manager.edit_device(device_id, edit.clone()).await?;
        Ok((Session::Idle, FlowReply::FieldUpdated { device, edit }))
    }
}
