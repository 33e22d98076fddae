// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grill state snapshots and the dataset published after each sweep.
//!
//! A [`GrillState`] is one read of a grill; it is replaced wholesale on every
//! sweep, never merged. A [`Dataset`] groups the snapshots of one complete
//! sweep together with the directory record of each grill.

mod dataset;
mod grill_state;

pub use dataset::{Dataset, GrillEntry};
pub use grill_state::GrillState;
