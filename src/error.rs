// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `HomeLink` library.
//!
//! This module provides the error hierarchy for failures across the
//! library: input validation, record store access, protocol backend
//! communication, and control dispatch.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when managing
/// and controlling devices.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while validating user-supplied device data.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error occurred in the device record store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Error occurred while talking to a protocol backend.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// No device record exists for the given id or query.
    #[error("device not found")]
    DeviceNotFound,

    /// No control backend exists for this device's current binding.
    #[error("operation is not supported for this device")]
    Unsupported,
}

/// Errors related to validating device fields.
///
/// These errors are produced by the onboarding flow and the record
/// validators. They are always recovered locally by re-prompting and never
/// cross the handler boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A device name must contain at least one character.
    #[error("device name must not be empty")]
    EmptyName,

    /// Another device already owns this name.
    #[error("device name is already taken: {0}")]
    DuplicateName(String),

    /// The text does not parse as a colon-separated MAC address.
    #[error("invalid MAC address: {0}")]
    InvalidMac(String),

    /// Another device already owns this MAC address.
    #[error("MAC address is already taken: {0}")]
    DuplicateMac(String),

    /// A device address must contain at least one character.
    #[error("device address must not be empty")]
    EmptyAddress,

    /// Another device already owns this address.
    #[error("device address is already taken: {0}")]
    DuplicateAddress(String),
}

/// Errors related to the device record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write would violate a uniqueness constraint.
    #[error("conflicting {field}: {value}")]
    Conflict {
        /// The constrained field (`name`, `mac` or `address`).
        field: &'static str,
        /// The conflicting value.
        value: String,
    },

    /// No record exists for the given id.
    #[error("no record with id {0}")]
    MissingRecord(i64),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors related to protocol backend communication.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The backend did not answer within the allotted time.
    #[error("backend timed out after {0} ms")]
    Timeout(u64),

    /// The device rejected the command.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// Commissioning failed for the given pairing code.
    #[error("commissioning failed: {0}")]
    Commissioning(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
