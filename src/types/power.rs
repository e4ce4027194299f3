// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state types.
//!
//! Two related types live here: [`PowerReading`], the raw on/off answer a
//! lighting device reports over the wire, and [`Power`], the aggregated
//! tri-state exposed to callers. Devices without a queryable backend stay
//! [`Power::Unknown`] forever.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Raw power reading reported by a lighting device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerReading {
    /// The device reports itself powered on.
    On,
    /// The device reports itself powered off.
    Off,
}

impl PowerReading {
    /// Returns the wire representation of the reading.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for PowerReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerReading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(format!("unknown power reading: {other}")),
        }
    }
}

/// Aggregated power state of a device.
///
/// Serializes as `true`, `false` or `"unknown"`, which is the shape status
/// consumers expect.
///
/// # Examples
///
/// ```
/// use homelink_lib::types::Power;
///
/// assert_eq!(serde_json::to_string(&Power::On).unwrap(), "true");
/// assert_eq!(serde_json::to_string(&Power::Unknown).unwrap(), "\"unknown\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Power {
    /// The device is known to be powered on.
    On,
    /// The device is known to be powered off.
    Off,
    /// No backend could report a power state.
    #[default]
    Unknown,
}

impl Power {
    /// Returns true if the device is known to be powered on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns true if no power state could be determined.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Maps an optional wire reading to the aggregated state.
    ///
    /// A missing reading stays [`Power::Unknown`]; any defined reading
    /// other than `on` maps to [`Power::Off`].
    #[must_use]
    pub fn from_reading(reading: Option<PowerReading>) -> Self {
        match reading {
            Some(PowerReading::On) => Self::On,
            Some(PowerReading::Off) => Self::Off,
            None => Self::Unknown,
        }
    }
}

impl From<bool> for Power {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for Power {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::On => serializer.serialize_bool(true),
            Self::Off => serializer.serialize_bool(false),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for Power {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Known(bool),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Known(on) => Ok(Self::from(on)),
            Repr::Text(s) if s == "unknown" => Ok(Self::Unknown),
            Repr::Text(s) => Err(de::Error::custom(format!("unknown power state: {s}"))),
        }
    }
}
