// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power control commands.

use crate::command::Command;
use crate::types::GrillMode;

/// Command to power the grill on in a given mode, or off.
///
/// # Examples
///
/// ```
/// use gmg_cloud::command::{Command, PowerCommand};
/// use gmg_cloud::types::GrillMode;
///
/// let cmd = PowerCommand::On(GrillMode::Grill);
/// assert_eq!(cmd.code(), "UK");
/// assert_eq!(cmd.argument(), 1);
/// assert_eq!(cmd.encode(), "UK001!");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Power on and start in the given mode.
    On(GrillMode),
    /// Power off (the controller runs its cool-down cycle).
    Off,
}

impl PowerCommand {
    /// Argument of the power-off variant.
    const OFF_ARGUMENT: u16 = 4;

    /// Creates a power-on command for the given mode.
    #[must_use]
    pub const fn on(mode: GrillMode) -> Self {
        Self::On(mode)
    }

    /// Creates a power-off command.
    #[must_use]
    pub const fn off() -> Self {
        Self::Off
    }
}

impl Command for PowerCommand {
    fn code(&self) -> &'static str {
        "UK"
    }

    fn argument(&self) -> u16 {
        match self {
            Self::On(mode) => u16::from(mode.code()),
            Self::Off => Self::OFF_ARGUMENT,
        }
    }
}
