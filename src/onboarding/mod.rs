// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Guided onboarding and editing conversation flow.
//!
//! Adding a device walks a strict forward sequence of steps, collecting
//! one field per turn and validating it against the record store:
//!
//! ```text
//! SetName → SetKind → SetManufacturer → SetMac → SetAddress → created
//! ```
//!
//! Editing re-runs the same validators for a single field of an existing
//! device, excluding that device from the uniqueness probes so re-entering
//! the current value succeeds.
//!
//! The flow is a finite-state machine over [`Session`], the per-user
//! conversation state. The host owns session storage: it deserializes the
//! session at the start of a turn, hands it to [`Onboarding`] mutably, and
//! persists it again afterwards. Handlers answer with [`FlowReply`]
//! values; rendering prompts and navigation buttons is the host's job.
//!
//! Validation failures re-prompt the current step and never escape a
//! handler; only store/backend failures surface as errors.

mod flow;
mod session;

pub use flow::Onboarding;
pub use session::{AddStep, EditField, FlowReply, NavTarget, Prompt, Session};
