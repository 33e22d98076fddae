// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setpoint commands.

use crate::command::Command;
use crate::types::{GrillTemperature, Probe, ProbeTemperature};

/// Command to change the grill chamber setpoint.
///
/// # Examples
///
/// ```
/// use gmg_cloud::command::{Command, GrillTemperatureCommand};
/// use gmg_cloud::types::GrillTemperature;
///
/// let cmd = GrillTemperatureCommand(GrillTemperature::MIN);
/// assert_eq!(cmd.encode(), "UT150!");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrillTemperatureCommand(pub GrillTemperature);

impl Command for GrillTemperatureCommand {
    fn code(&self) -> &'static str {
        "UT"
    }

    fn argument(&self) -> u16 {
        self.0.fahrenheit()
    }
}

/// Command to change the target temperature of a food probe.
///
/// Probe 1 uses `UF`, probe 2 uses the lowercase `Uf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTargetCommand {
    probe: Probe,
    target: ProbeTemperature,
}

impl ProbeTargetCommand {
    /// Creates a probe target command.
    #[must_use]
    pub const fn new(probe: Probe, target: ProbeTemperature) -> Self {
        Self { probe, target }
    }

    /// Returns the addressed probe.
    #[must_use]
    pub const fn probe(&self) -> Probe {
        self.probe
    }

    /// Returns the requested target.
    #[must_use]
    pub const fn target(&self) -> ProbeTemperature {
        self.target
    }
}

impl Command for ProbeTargetCommand {
    fn code(&self) -> &'static str {
        match self.probe {
            Probe::One => "UF",
            Probe::Two => "Uf",
        }
    }

    fn argument(&self) -> u16 {
        self.target.fahrenheit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grill_temperature_encoding() {
        let cmd = GrillTemperatureCommand(GrillTemperature::new(225).unwrap());
        assert_eq!(cmd.encode(), "UT225!");
        let cmd = GrillTemperatureCommand(GrillTemperature::MAX);
        assert_eq!(cmd.encode(), "UT500!");
    }

    #[test]
    fn probe_codes_differ_by_case() {
        let target = ProbeTemperature::new(165).unwrap();
        assert_eq!(ProbeTargetCommand::new(Probe::One, target).encode(), "UF165!");
        assert_eq!(ProbeTargetCommand::new(Probe::Two, target).encode(), "Uf165!");
    }
}
