// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MAC address type with canonical formatting.
//!
//! Devices and presence entries report MAC addresses in whatever case the
//! firmware happens to use. [`MacAddress`] stores the six octets, so
//! equality is inherently case-insensitive, and always renders the
//! canonical uppercase colon-separated form.
//!
//! # Examples
//!
//! ```
//! use homelink_lib::types::MacAddress;
//!
//! let mac: MacAddress = "12:23:56:9f:aa:bb".parse().unwrap();
//! assert_eq!(mac.to_string(), "12:23:56:9F:AA:BB");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A MAC address in canonical uppercase colon-separated form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates a MAC address from its six octets.
    #[must_use]
    pub const fn from_octets(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Returns the six octets of the address.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({self})")
    }
}

impl FromStr for MacAddress {
    type Err = ValidationError;

    /// Parses a colon-separated MAC address, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMac`] unless the input is exactly
    /// six colon-separated two-digit hex groups.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut octets = [0u8; 6];
        let mut count = 0;

        for part in s.split(':') {
            if count == 6 || part.len() != 2 {
                return Err(ValidationError::InvalidMac(s.to_string()));
            }
            octets[count] = u8::from_str_radix(part, 16)
                .map_err(|_| ValidationError::InvalidMac(s.to_string()))?;
            count += 1;
        }

        if count != 6 {
            return Err(ValidationError::InvalidMac(s.to_string()));
        }

        Ok(Self(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}
