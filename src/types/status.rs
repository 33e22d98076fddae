// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded status codes reported in a grill state snapshot.

use std::fmt;

/// Operating mode decoded from the `grillState` code.
///
/// Any non-zero code means the grill is running.
///
/// # Examples
///
/// ```
/// use gmg_cloud::types::OperatingState;
///
/// assert_eq!(OperatingState::from_code(3), OperatingState::Smoking);
/// assert!(OperatingState::from_code(3).is_running());
/// assert!(!OperatingState::from_code(0).is_running());
/// assert_eq!(OperatingState::from_code(9).label(), "active");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingState {
    /// Grill is off.
    Off,
    /// Grill mode.
    Grilling,
    /// Fan-only mode, usually while cooling down.
    FanMode,
    /// Smoke mode.
    Smoking,
    /// A running code this library does not know.
    Other(i64),
}

impl OperatingState {
    /// Decodes a raw `grillState` value.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Off,
            1 => Self::Grilling,
            2 => Self::FanMode,
            3 => Self::Smoking,
            other => Self::Other(other),
        }
    }

    /// Returns true for every state except `Off`.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Returns the status label shown to users.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Grilling => "grilling",
            Self::FanMode => "fan_mode",
            Self::Smoking => "smoking",
            Self::Other(_) => "active",
        }
    }
}

impl fmt::Display for OperatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Active warning decoded from the `warningCode` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Warning {
    /// No warning.
    None,
    /// Grill dropped into fan mode.
    FanMode,
    /// Pellet hopper is running low.
    LowPellets,
    /// Ignitor is disconnected.
    IgnitorDisconnect,
    /// Auger motor is disconnected.
    AugerDisconnect,
    /// Combustion fan is disconnected.
    FanDisconnect,
    /// Unrecognised code.
    Unknown(i64),
}

impl Warning {
    /// Decodes a raw `warningCode` value.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::None,
            1 => Self::FanMode,
            2 => Self::LowPellets,
            3 => Self::IgnitorDisconnect,
            4 => Self::AugerDisconnect,
            5 => Self::FanDisconnect,
            other => Self::Unknown(other),
        }
    }

    /// Returns true if this warning signals an empty-ish hopper.
    #[must_use]
    pub const fn is_low_pellets(&self) -> bool {
        matches!(self, Self::LowPellets)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::FanMode => f.write_str("fan_mode"),
            Self::LowPellets => f.write_str("low_pellets"),
            Self::IgnitorDisconnect => f.write_str("ignitor_disconnect"),
            Self::AugerDisconnect => f.write_str("auger_disconnect"),
            Self::FanDisconnect => f.write_str("fan_disconnect"),
            Self::Unknown(code) => write!(f, "unknown_{code}"),
        }
    }
}

/// State of the cook program (profile) running on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileStatus {
    /// No profile loaded.
    None,
    /// A profile is executing.
    Active,
    /// A profile is loaded but paused.
    Paused,
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Active => "active",
            Self::Paused => "paused",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operating_state_labels() {
        assert_eq!(OperatingState::from_code(0).to_string(), "off");
        assert_eq!(OperatingState::from_code(1).to_string(), "grilling");
        assert_eq!(OperatingState::from_code(2).to_string(), "fan_mode");
        assert_eq!(OperatingState::from_code(3).to_string(), "smoking");
        assert_eq!(OperatingState::from_code(7), OperatingState::Other(7));
    }

    #[test]
    fn negative_code_counts_as_running() {
        assert!(OperatingState::from_code(-1).is_running());
    }

    #[test]
    fn warning_display() {
        assert_eq!(Warning::from_code(0).to_string(), "none");
        assert_eq!(Warning::from_code(2).to_string(), "low_pellets");
        assert_eq!(Warning::from_code(5).to_string(), "fan_disconnect");
        assert_eq!(Warning::from_code(42).to_string(), "unknown_42");
        assert!(Warning::from_code(2).is_low_pellets());
    }
}
