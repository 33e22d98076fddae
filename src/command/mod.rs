// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grill controller command definitions.
//!
//! The controller understands a tiny ASCII language: every command is a
//! two-letter code, a three digit zero-padded argument and a terminating
//! `!`. The cloud forwards the raw bytes to the grill unchanged, so the
//! encoding here must match the controller exactly.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Wire form |
//! |-------------|---------|-----------|
//! | [`PowerCommand`] | Power on in a mode, or power off | `UK001!` .. `UK004!` |
//! | [`GrillTemperatureCommand`] | Set the grill setpoint | `UT225!` |
//! | [`ProbeTargetCommand`] | Set a food probe target | `UF165!`, `Uf165!` |
//!
//! # Examples
//!
//! ```
//! use gmg_cloud::command::{Command, GrillTemperatureCommand, PowerCommand};
//! use gmg_cloud::types::{GrillMode, GrillTemperature};
//!
//! assert_eq!(PowerCommand::On(GrillMode::Smoke).encode(), "UK002!");
//! assert_eq!(PowerCommand::Off.encode(), "UK004!");
//!
//! let temp = GrillTemperatureCommand(GrillTemperature::new(225).unwrap());
//! assert_eq!(temp.to_bytes(), b"UT225!".to_vec());
//! ```

mod power;
mod temperature;

pub use power::PowerCommand;
pub use temperature::{GrillTemperatureCommand, ProbeTargetCommand};

/// A command that can be sent to a grill controller.
pub trait Command {
    /// Returns the two-letter command code, e.g. `"UK"` or `"UT"`.
    fn code(&self) -> &'static str;

    /// Returns the numeric argument of the command.
    fn argument(&self) -> u16;

    /// Returns the full ASCII command string.
    fn encode(&self) -> String {
        format!("{}{:03}!", self.code(), self.argument())
    }

    /// Returns the command as the raw request body.
    fn to_bytes(&self) -> Vec<u8> {
        self.encode().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GrillMode, Probe, ProbeTemperature};

    #[test]
    fn encode_pads_to_three_digits() {
        struct Raw;
        impl Command for Raw {
            fn code(&self) -> &'static str {
                "UR"
            }
            fn argument(&self) -> u16 {
                1
            }
        }
        assert_eq!(Raw.encode(), "UR001!");
    }

    #[test]
    fn command_bytes_are_ascii() {
        let cmd = ProbeTargetCommand::new(Probe::Two, ProbeTemperature::new(165).unwrap());
        assert_eq!(cmd.to_bytes(), b"Uf165!");
        assert_eq!(PowerCommand::On(GrillMode::Pizza).to_bytes(), b"UK003!");
    }
}
