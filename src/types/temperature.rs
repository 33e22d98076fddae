// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature setpoints accepted by the grill controller.
//!
//! The controller works in whole degrees Fahrenheit and each setpoint kind
//! has its own allowed range. Values are validated at construction so that a
//! command can always be encoded.

use std::fmt;

use crate::error::ValueError;

/// Target temperature for the grill chamber, in °F (150-500).
///
/// # Examples
///
/// ```
/// use gmg_cloud::types::GrillTemperature;
///
/// let smoke = GrillTemperature::new(225).unwrap();
/// assert_eq!(smoke.fahrenheit(), 225);
///
/// assert!(GrillTemperature::new(100).is_err());
/// assert!(GrillTemperature::new(550).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GrillTemperature(u16);

impl GrillTemperature {
    /// Lowest grill setpoint.
    pub const MIN: Self = Self(150);

    /// Highest grill setpoint.
    pub const MAX: Self = Self(500);

    /// Creates a new grill setpoint.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value is outside 150-500.
    pub fn new(fahrenheit: u16) -> Result<Self, ValueError> {
        check_range(fahrenheit, Self::MIN.0, Self::MAX.0).map(Self)
    }

    /// Creates a grill setpoint, clamping to the valid range.
    #[must_use]
    pub const fn clamped(fahrenheit: u16) -> Self {
        if fahrenheit < Self::MIN.0 {
            Self::MIN
        } else if fahrenheit > Self::MAX.0 {
            Self::MAX
        } else {
            Self(fahrenheit)
        }
    }

    /// Returns the setpoint in degrees Fahrenheit.
    #[must_use]
    pub const fn fahrenheit(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for GrillTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°F", self.0)
    }
}

impl TryFrom<u16> for GrillTemperature {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Target temperature for a food probe, in °F (100-250).
///
/// # Examples
///
/// ```
/// use gmg_cloud::types::ProbeTemperature;
///
/// let brisket = ProbeTemperature::new(203).unwrap();
/// assert_eq!(brisket.to_string(), "203°F");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProbeTemperature(u16);

impl ProbeTemperature {
    /// Lowest probe target.
    pub const MIN: Self = Self(100);

    /// Highest probe target.
    pub const MAX: Self = Self(250);

    /// Creates a new probe target.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value is outside 100-250.
    pub fn new(fahrenheit: u16) -> Result<Self, ValueError> {
        check_range(fahrenheit, Self::MIN.0, Self::MAX.0).map(Self)
    }

    /// Returns the target in degrees Fahrenheit.
    #[must_use]
    pub const fn fahrenheit(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ProbeTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°F", self.0)
    }
}

impl TryFrom<u16> for ProbeTemperature {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn check_range(actual: u16, min: u16, max: u16) -> Result<u16, ValueError> {
    if (min..=max).contains(&actual) {
        Ok(actual)
    } else {
        Err(ValueError::OutOfRange { min, max, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grill_temperature_bounds_are_inclusive() {
        assert_eq!(GrillTemperature::new(150).unwrap(), GrillTemperature::MIN);
        assert_eq!(GrillTemperature::new(500).unwrap(), GrillTemperature::MAX);
        assert_eq!(
            GrillTemperature::new(149),
            Err(ValueError::OutOfRange {
                min: 150,
                max: 500,
                actual: 149
            })
        );
        assert!(GrillTemperature::new(501).is_err());
    }

    #[test]
    fn grill_temperature_clamped() {
        assert_eq!(GrillTemperature::clamped(20), GrillTemperature::MIN);
        assert_eq!(GrillTemperature::clamped(900), GrillTemperature::MAX);
        assert_eq!(GrillTemperature::clamped(300).fahrenheit(), 300);
    }

    #[test]
    fn probe_temperature_bounds() {
        assert!(ProbeTemperature::new(99).is_err());
        assert!(ProbeTemperature::new(100).is_ok());
        assert!(ProbeTemperature::new(250).is_ok());
        assert!(ProbeTemperature::new(251).is_err());
    }

    #[test]
    fn try_from_u16() {
        let temp: GrillTemperature = 225u16.try_into().unwrap();
        assert_eq!(temp.to_string(), "225°F");
        let probe: Result<ProbeTemperature, _> = 300u16.try_into();
        assert!(probe.is_err());
    }
}
