// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power-on modes and probe addressing.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Mode the grill starts in when powered on.
///
/// # Examples
///
/// ```
/// use gmg_cloud::types::GrillMode;
///
/// let mode: GrillMode = "smoke".parse().unwrap();
/// assert_eq!(mode, GrillMode::Smoke);
/// assert_eq!(mode.as_str(), "smoke");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GrillMode {
    /// Standard grilling.
    #[default]
    Grill,
    /// Cold smoke.
    Smoke,
    /// Pizza oven mode.
    Pizza,
}

impl GrillMode {
    /// All selectable modes, in display order.
    pub const ALL: [Self; 3] = [Self::Grill, Self::Smoke, Self::Pizza];

    /// Returns the lowercase option name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grill => "grill",
            Self::Smoke => "smoke",
            Self::Pizza => "pizza",
        }
    }

    /// Returns the numeric code used by the power-on command.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Grill => 1,
            Self::Smoke => 2,
            Self::Pizza => 3,
        }
    }
}

impl fmt::Display for GrillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrillMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grill" => Ok(Self::Grill),
            "smoke" => Ok(Self::Smoke),
            "pizza" => Ok(Self::Pizza),
            _ => Err(ValueError::InvalidMode(s.to_string())),
        }
    }
}

/// One of the two food probe ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probe {
    /// Probe port 1.
    One,
    /// Probe port 2.
    Two,
}

impl Probe {
    /// Creates a probe from its 1-based port number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidProbe` for anything other than 1 or 2.
    pub fn new(number: u8) -> Result<Self, ValueError> {
        match number {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            n => Err(ValueError::InvalidProbe(n)),
        }
    }

    /// Returns the 1-based port number.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<u8> for Probe {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_str_is_case_insensitive() {
        assert_eq!("Grill".parse::<GrillMode>().unwrap(), GrillMode::Grill);
        assert_eq!(" PIZZA ".parse::<GrillMode>().unwrap(), GrillMode::Pizza);
        assert_eq!(
            "sear".parse::<GrillMode>(),
            Err(ValueError::InvalidMode("sear".to_string()))
        );
    }

    #[test]
    fn mode_codes() {
        let codes: Vec<u8> = GrillMode::ALL.iter().map(GrillMode::code).collect();
        assert_eq!(codes, vec![1, 2, 3]);
    }

    #[test]
    fn probe_numbers() {
        assert_eq!(Probe::new(1).unwrap(), Probe::One);
        assert_eq!(Probe::new(2).unwrap().number(), 2);
        assert_eq!(Probe::new(0), Err(ValueError::InvalidProbe(0)));
        assert!(Probe::try_from(3).is_err());
    }
}
