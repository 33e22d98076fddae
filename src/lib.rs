// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `gmg_cloud` - A Rust library to monitor and control GMG pellet grills
//! through the vendor cloud.
//!
//! The library keeps an authenticated session against the vendor's identity
//! pool, polls the state of every grill on the account and sends control
//! commands back. Polling adapts to what the grills are doing: fast right
//! after a command, moderate while a grill is running, slow while everything
//! is off.
//!
//! # Supported Features
//!
//! - **Session handling**: login, silent token renewal, one retry after a
//!   rejected token
//! - **State**: temperatures, probe targets, operating mode, warnings and
//!   cook-profile progress for every grill
//! - **Control**: power on in grill, smoke or pizza mode, power off, grill
//!   setpoint, probe targets
//! - **Adaptive polling**: burst, active and idle intervals
//!
//! # Quick Start
//!
//! ```no_run
//! use gmg_cloud::auth::{CognitoIdentityProvider, Credentials};
//! use gmg_cloud::manager::GrillManagerBuilder;
//! use gmg_cloud::types::GrillTemperature;
//!
//! #[tokio::main]
//! async fn main() -> gmg_cloud::Result<()> {
//!     let manager = GrillManagerBuilder::new(Credentials::new("cook@example.com", "secret"))
//!         .build(CognitoIdentityProvider::gmg()?)
//!         .await?;
//!
//!     if let Some(dataset) = manager.dataset() {
//!         for (id, grill) in dataset.iter() {
//!             let temp = grill.state().and_then(|s| s.grill_temperature());
//!             println!("{} ({id}): {} {temp:?}", grill.info().name(), grill.status_label());
//!         }
//!     }
//!
//!     for grill in manager.devices() {
//!         manager
//!             .set_grill_temperature(grill.id(), GrillTemperature::new(250)?)
//!             .await?;
//!     }
//!
//!     manager.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Without the Manager
//!
//! ```no_run
//! use gmg_cloud::GrillCloud;
//! use gmg_cloud::auth::{CognitoIdentityProvider, Credentials};
//! use gmg_cloud::command::PowerCommand;
//! use gmg_cloud::protocol::CloudConfig;
//!
//! # async fn example() -> gmg_cloud::Result<()> {
//! let cloud = GrillCloud::new(
//!     CloudConfig::new(),
//!     Credentials::new("cook@example.com", "secret"),
//!     CognitoIdentityProvider::gmg()?,
//! )?;
//! cloud.authenticate().await?;
//!
//! for grill in cloud.list_devices().await? {
//!     cloud.send(&grill, &PowerCommand::Off).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cloud;
pub mod command;
pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod poller;
pub mod protocol;
pub mod state;
pub mod types;

pub use auth::{CognitoIdentityProvider, Credentials};
pub use cloud::GrillCloud;
pub use device::Device;
pub use error::{Error, Result};
pub use manager::{GrillManager, GrillManagerBuilder};
pub use state::{Dataset, GrillEntry, GrillState};
pub use types::{GrillMode, GrillTemperature, Probe, ProbeTemperature};
