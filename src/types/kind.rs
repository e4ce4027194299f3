// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device classification enums.
//!
//! [`DeviceKind`] and [`Manufacturer`] drive control routing: a Yeelight
//! lightbulb talks to the lighting backend, other kinds fall back to a
//! wake signal. Both enums also carry the labels and search vocabulary the
//! lookup layer uses.

use serde::{Deserialize, Serialize};

/// The kind of a managed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceKind {
    /// A smart lightbulb.
    Lightbulb,
    /// A television.
    Tv,
    /// A smart socket.
    Socket,
    /// A known device of some other kind.
    #[default]
    Other,
    /// A device whose kind was never recorded.
    Unknown,
}

impl DeviceKind {
    /// Returns the kinds an operator can choose during onboarding.
    #[must_use]
    pub const fn selectable() -> &'static [Self] {
        &[Self::Lightbulb, Self::Tv, Self::Socket, Self::Other]
    }

    /// Returns the human-readable label of the kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lightbulb => "Lightbulb",
            Self::Tv => "TV",
            Self::Socket => "Socket",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }

    /// Words the free-text lookup maps to this kind.
    const fn search_words(self) -> &'static [&'static str] {
        match self {
            Self::Lightbulb => &["lightbulb", "bulb", "lamp", "light"],
            Self::Tv => &["tv", "television", "telly"],
            Self::Socket => &["socket", "plug", "outlet"],
            Self::Other | Self::Unknown => &[],
        }
    }

    /// Infers a kind from a single search word, if the vocabulary knows it.
    ///
    /// The lookup is a static word table, not a parser. Matching is
    /// case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use homelink_lib::types::DeviceKind;
    ///
    /// assert_eq!(DeviceKind::from_search_word("lamp"), Some(DeviceKind::Lightbulb));
    /// assert_eq!(DeviceKind::from_search_word("fridge"), None);
    /// ```
    #[must_use]
    pub fn from_search_word(word: &str) -> Option<Self> {
        let word = word.to_lowercase();
        [Self::Lightbulb, Self::Tv, Self::Socket]
            .into_iter()
            .find(|kind| kind.search_words().contains(&word.as_str()))
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The manufacturer of a managed device.
///
/// Only manufacturers with a dedicated control backend are listed by name;
/// everything else is [`Manufacturer::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Manufacturer {
    /// Yeelight, controlled via its LAN protocol.
    Yeelight,
    /// A known manufacturer without a dedicated backend.
    #[default]
    Other,
    /// A manufacturer that was never recorded.
    Unknown,
}

impl Manufacturer {
    /// Returns the manufacturers an operator can choose during onboarding.
    #[must_use]
    pub const fn selectable() -> &'static [Self] {
        &[Self::Yeelight, Self::Other]
    }

    /// Returns the human-readable label of the manufacturer.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yeelight => "Yeelight",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
