// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device record persistence.
//!
//! [`DeviceStore`] is the port the manager talks to; any record backend
//! (a database, a config file, a remote service) can sit behind it.
//! [`MemoryStore`] is the in-process implementation used by tests and by
//! embedders that do not need durable records.
//!
//! The store owns the uniqueness invariant for `name`, `mac` and
//! `address`: writes that would violate it fail with
//! [`StoreError::Conflict`](crate::error::StoreError::Conflict). The rest
//! of the library only probes the invariant before writing.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::device::{Device, DeviceEdit, NewDevice};
use crate::error::StoreError;
use crate::types::{DeviceId, DeviceKind, MacAddress};

/// Port for CRUD access to device records.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Creates a record and assigns it a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the payload violates a
    /// uniqueness constraint.
    async fn insert(&self, new: NewDevice) -> Result<Device, StoreError>;

    /// Fetches a record by id.
    async fn get(&self, id: DeviceId) -> Result<Option<Device>, StoreError>;

    /// Returns all records.
    async fn list(&self) -> Result<Vec<Device>, StoreError>;

    /// Applies a single-field update to a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingRecord`] when no record has the id and
    /// [`StoreError::Conflict`] when the new value collides with another
    /// record.
    async fn update(&self, id: DeviceId, edit: DeviceEdit) -> Result<Device, StoreError>;

    /// Deletes a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingRecord`] when no record has the id.
    async fn delete(&self, id: DeviceId) -> Result<(), StoreError>;

    /// Finds the first record whose name contains the fragment
    /// (case-insensitively) or whose kind equals the inferred kind.
    async fn find(
        &self,
        name_fragment: &str,
        kind: Option<DeviceKind>,
    ) -> Result<Option<Device>, StoreError>;

    /// Returns true if a record other than `exclude` owns the name.
    async fn name_taken(&self, name: &str, exclude: Option<DeviceId>)
    -> Result<bool, StoreError>;

    /// Returns true if a record other than `exclude` owns the MAC.
    async fn mac_taken(
        &self,
        mac: MacAddress,
        exclude: Option<DeviceId>,
    ) -> Result<bool, StoreError>;

    /// Returns true if a record other than `exclude` owns the address.
    async fn address_taken(
        &self,
        address: &str,
        exclude: Option<DeviceId>,
    ) -> Result<bool, StoreError>;
}
