// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grill manager tying the cloud client, the poller and the event bus
//! together.
//!
//! # Overview
//!
//! The [`GrillManager`] is the entry point for applications:
//!
//! - **Setup**: authenticates, loads the grill directory and runs a first
//!   sweep before polling starts
//! - **Control**: power, temperatures, probe targets and mode changes, each
//!   followed by burst polling
//! - **State**: the latest [`Dataset`](crate::state::Dataset) via a watch
//!   channel, and [`PollEvent`](crate::event::PollEvent)s via broadcast
//!
//! # Examples
//!
//! ```no_run
//! use gmg_cloud::auth::{CognitoIdentityProvider, Credentials};
//! use gmg_cloud::event::PollEvent;
//! use gmg_cloud::manager::GrillManagerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> gmg_cloud::Result<()> {
//!     let manager = GrillManagerBuilder::new(Credentials::new("cook@example.com", "secret"))
//!         .build(CognitoIdentityProvider::gmg()?)
//!         .await?;
//!
//!     let mut events = manager.subscribe();
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             PollEvent::SweepCompleted { dataset } => {
//!                 for (id, grill) in dataset.iter() {
//!                     println!("{id}: {}", grill.status_label());
//!                 }
//!             }
//!             PollEvent::IntervalChanged { cadence, interval } => {
//!                 println!("polling every {interval:?} ({cadence})");
//!             }
//!             PollEvent::SweepFailed { error } => eprintln!("sweep failed: {error}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod grill_manager;
mod manager_config;

pub use grill_manager::GrillManager;
pub use manager_config::GrillManagerBuilder;
