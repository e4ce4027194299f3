// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `HomeLink` Lib - A Rust library to manage heterogeneous smart-home devices.
//!
//! This library is the core of a smart-home hub: one logical identity per
//! device, even though each device is actually reached through a
//! different control protocol and is located on the network via a
//! router's lease table rather than a fixed address.
//!
//! # What it does
//!
//! - **Identity resolution**: reconciles a persisted device record with a
//!   live network presence snapshot to produce the current address/MAC
//! - **Control dispatch**: routes power commands to the mesh backend, the
//!   vendor lighting backend or a wake signal, with a well-defined
//!   `Unsupported` failure for combinations with no backend
//! - **State aggregation**: combines reachability and backend power
//!   queries into one best-effort `DeviceState`, never failing on an
//!   unreachable backend
//! - **Guided onboarding**: a conversation state machine that collects and
//!   validates a new device's fields one turn at a time
//!
//! The protocol backends, the presence source and the record store are
//! ports: hosts inject their real clients at construction, tests inject
//! fakes.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use homelink_lib::manager::{DeviceManager, InfoOptions};
//! use homelink_lib::store::MemoryStore;
//! use homelink_lib::types::DeviceId;
//! # use homelink_lib::presence::{PresenceEntry, PresenceSource};
//! # use homelink_lib::backend::{CommissionedNode, LightingBackend, MeshBackend, WakeBackend};
//! # use homelink_lib::types::{MacAddress, MeshNodeId, PowerReading};
//! # use homelink_lib::error::BackendError;
//! # struct Router;
//! # #[async_trait::async_trait]
//! # impl PresenceSource for Router {
//! #     async fn list(&self) -> Result<Vec<PresenceEntry>, BackendError> { Ok(vec![]) }
//! # }
//! # struct Mesh;
//! # #[async_trait::async_trait]
//! # impl MeshBackend for Mesh {
//! #     async fn commission(&self, _: &str) -> Result<CommissionedNode, BackendError> { unimplemented!() }
//! #     async fn decommission(&self, _: MeshNodeId) -> Result<(), BackendError> { Ok(()) }
//! #     async fn power_state(&self, _: MeshNodeId) -> Result<bool, BackendError> { Ok(false) }
//! #     async fn set_power(&self, _: MeshNodeId, _: bool) -> Result<(), BackendError> { Ok(()) }
//! # }
//! # struct Bulbs;
//! # #[async_trait::async_trait]
//! # impl LightingBackend for Bulbs {
//! #     async fn power_state(&self, _: &str, _: std::time::Duration) -> Result<Option<PowerReading>, BackendError> { Ok(None) }
//! #     async fn set_power(&self, _: &str, _: bool) -> Result<(), BackendError> { Ok(()) }
//! # }
//! # struct Wol;
//! # #[async_trait::async_trait]
//! # impl WakeBackend for Wol {
//! #     async fn wake(&self, _: MacAddress, _: &str) -> Result<(), BackendError> { Ok(()) }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> homelink_lib::Result<()> {
//!     let manager = DeviceManager::new(
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(Router),
//!         Arc::new(Mesh),
//!         Arc::new(Bulbs),
//!         Arc::new(Wol),
//!     );
//!
//!     // Live state: reachability from the router, power from the
//!     // device's routed backend.
//!     let info = manager.device_info(DeviceId(1), InfoOptions::default()).await?;
//!     println!("online={} power={}", info.state.online, info.state.power);
//!
//!     // Power control picks the backend from the device's binding.
//!     manager.turn_on(DeviceId(1)).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Onboarding Conversations
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use homelink_lib::manager::DeviceManager;
//! use homelink_lib::onboarding::{FlowReply, Onboarding, Session};
//!
//! # async fn example(manager: Arc<DeviceManager>) -> homelink_lib::Result<()> {
//! let flow = Onboarding::new(manager);
//! let mut session = Session::default();
//!
//! flow.start_add_device(&mut session);
//! match flow.handle_text(&mut session, "Bedroom Lamp").await? {
//!     FlowReply::Prompt(prompt) => println!("{}", prompt.text),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod device;
pub mod error;
pub mod manager;
pub mod onboarding;
pub mod presence;
pub mod store;
pub mod types;

pub use backend::{
    CommissionedNode, ControlRoute, LightingBackend, MeshBackend, PowerCommand, WakeBackend,
};
pub use device::{Device, DeviceEdit, DeviceInfo, DeviceState, NewDevice};
pub use error::{BackendError, Error, Result, StoreError, ValidationError};
pub use manager::{DeviceManager, InfoOptions};
pub use onboarding::{FlowReply, Onboarding, Session};
pub use presence::{Endpoint, PresenceEntry, PresenceSource};
pub use store::{DeviceStore, MemoryStore};
pub use types::{
    DeviceId, DeviceKind, MacAddress, Manufacturer, MeshNodeId, Power, PowerReading,
};
