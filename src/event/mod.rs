// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event stream of the poller.
//!
//! Every completed sweep, failed sweep and interval change is broadcast on
//! an [`EventBus`] so that several consumers can follow the poller.
//!
//! # Examples
//!
//! ```
//! use gmg_cloud::event::{EventBus, PollEvent};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(PollEvent::SweepFailed { error: "not authenticated".to_string() });
//! ```

mod event_bus;
mod poll_event;

pub use event_bus::EventBus;
pub use poll_event::PollEvent;
