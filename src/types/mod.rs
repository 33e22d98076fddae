// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for grill control and status decoding.
//!
//! Setpoint types validate their range at construction time, so a command
//! built from them can always be encoded.
//!
//! # Types
//!
//! - [`GrillTemperature`] - Grill chamber setpoint (150-500 °F)
//! - [`ProbeTemperature`] - Food probe target (100-250 °F)
//! - [`GrillMode`] - Power-on mode (grill, smoke, pizza)
//! - [`Probe`] - Food probe port (1 or 2)
//! - [`OperatingState`], [`Warning`], [`ProfileStatus`] - Decoded status codes

mod mode;
mod status;
mod temperature;

pub use mode::{GrillMode, Probe};
pub use status::{OperatingState, ProfileStatus, Warning};
pub use temperature::{GrillTemperature, ProbeTemperature};
