// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grill manager owning the cloud client and the poller.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};

use crate::auth::IdentityProvider;
use crate::cloud::GrillCloud;
use crate::command::{Command, GrillTemperatureCommand, PowerCommand, ProbeTargetCommand};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::event::PollEvent;
use crate::poller::Poller;
use crate::state::{Dataset, GrillState};
use crate::types::{GrillMode, GrillTemperature, Probe, ProbeTemperature};

/// Controls every grill of one account.
///
/// Created by [`GrillManagerBuilder::build`](super::GrillManagerBuilder::build),
/// which authenticates, loads the directory and starts polling. Commands
/// sent through the manager switch the poller to burst mode when they are
/// accepted so that their effect shows up quickly.
///
/// # Examples
///
/// ```no_run
/// use gmg_cloud::auth::{CognitoIdentityProvider, Credentials};
/// use gmg_cloud::manager::GrillManagerBuilder;
/// use gmg_cloud::types::{GrillMode, GrillTemperature};
///
/// #[tokio::main]
/// async fn main() -> gmg_cloud::Result<()> {
///     let manager = GrillManagerBuilder::new(Credentials::new("cook@example.com", "secret"))
///         .build(CognitoIdentityProvider::gmg()?)
///         .await?;
///
///     for grill in manager.devices() {
///         manager.power_on(grill.id(), GrillMode::Smoke).await?;
///         manager.set_grill_temperature(grill.id(), GrillTemperature::new(225)?).await?;
///     }
///
///     manager.close().await;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct GrillManager<P> {
    cloud: Arc<GrillCloud<P>>,
    poller: Poller<P>,
    /// Modes chosen while a grill was off, used when it is powered on.
    preferred_modes: RwLock<HashMap<String, GrillMode>>,
}

impl<P: IdentityProvider> GrillManager<P> {
    pub(super) fn from_parts(cloud: Arc<GrillCloud<P>>, poller: Poller<P>) -> Self {
        Self {
            cloud,
            poller,
            preferred_modes: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cloud client.
    #[must_use]
    pub fn cloud(&self) -> &Arc<GrillCloud<P>> {
        &self.cloud
    }

    /// Returns the poller.
    #[must_use]
    pub fn poller(&self) -> &Poller<P> {
        &self.poller
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the cached grill directory.
    #[must_use]
    pub fn devices(&self) -> Vec<Device> {
        self.cloud.cached_devices()
    }

    /// Returns the last published dataset.
    #[must_use]
    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.poller.dataset()
    }

    /// Returns a receiver that sees every published dataset.
    #[must_use]
    pub fn watch_dataset(&self) -> watch::Receiver<Option<Arc<Dataset>>> {
        self.poller.watch()
    }

    /// Subscribes to poller events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.poller.subscribe()
    }

    /// Sweeps every grill now.
    ///
    /// # Errors
    ///
    /// Returns error if the sweep could not complete.
    pub async fn refresh(&self) -> Result<Arc<Dataset>> {
        self.poller.refresh().await
    }

    /// Returns the mode a grill is in or will start in.
    ///
    /// A running grill reports its own mode. Otherwise the last mode chosen
    /// with [`select_mode`](Self::select_mode) applies, then the default.
    #[must_use]
    pub fn selected_mode(&self, grill_id: &str) -> GrillMode {
        self.dataset()
            .and_then(|dataset| {
                dataset
                    .get(grill_id)
                    .and_then(|entry| entry.state())
                    .and_then(|state| state.selected_mode())
            })
            .or_else(|| self.preferred_modes.read().get(grill_id).copied())
            .unwrap_or_default()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Sends a raw command body to a grill.
    ///
    /// On acceptance the poller enters burst mode and a sweep is requested.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown grill id, or
    /// [`Error::NotAuthenticated`] after [`close`](Self::close).
    pub async fn send_raw(&self, grill_id: &str, body: &[u8]) -> Result<bool> {
        let device = self.device(grill_id)?;
        let accepted = self.cloud.send_command(&device, body).await?;
        if accepted {
            self.follow_up();
        }
        Ok(accepted)
    }

    /// Sends a typed command to a grill.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown grill id, or
    /// [`Error::NotAuthenticated`] after [`close`](Self::close).
    pub async fn send_command<C: Command + ?Sized>(&self, grill_id: &str, command: &C) -> Result<bool> {
        self.send_raw(grill_id, &command.to_bytes()).await
    }

    /// Powers a grill on in the given mode.
    ///
    /// # Errors
    ///
    /// See [`send_command`](Self::send_command).
    pub async fn power_on(&self, grill_id: &str, mode: GrillMode) -> Result<bool> {
        self.send_command(grill_id, &PowerCommand::On(mode)).await
    }

    /// Powers a grill off.
    ///
    /// # Errors
    ///
    /// See [`send_command`](Self::send_command).
    pub async fn power_off(&self, grill_id: &str) -> Result<bool> {
        self.send_command(grill_id, &PowerCommand::Off).await
    }

    /// Sets the grill setpoint.
    ///
    /// # Errors
    ///
    /// See [`send_command`](Self::send_command).
    pub async fn set_grill_temperature(
        &self,
        grill_id: &str,
        temperature: GrillTemperature,
    ) -> Result<bool> {
        self.send_command(grill_id, &GrillTemperatureCommand(temperature))
            .await
    }

    /// Sets the target of a food probe.
    ///
    /// # Errors
    ///
    /// See [`send_command`](Self::send_command).
    pub async fn set_probe_target(
        &self,
        grill_id: &str,
        probe: Probe,
        target: ProbeTemperature,
    ) -> Result<bool> {
        self.send_command(grill_id, &ProbeTargetCommand::new(probe, target))
            .await
    }

    /// Changes the cooking mode.
    ///
    /// A grill that is grilling or smoking is powered off and restarted in
    /// the new mode. Otherwise the mode is only remembered for
    /// [`selected_mode`](Self::selected_mode).
    /// Either way the poller enters burst mode afterwards.
    ///
    /// Returns false if one of the restart commands was not accepted.
    ///
    /// # Errors
    ///
    /// See [`send_command`](Self::send_command).
    pub async fn select_mode(&self, grill_id: &str, mode: GrillMode) -> Result<bool> {
        let device = self.device(grill_id)?;
        self.preferred_modes
            .write()
            .insert(grill_id.to_string(), mode);

        let cooking = self.dataset().is_some_and(|dataset| {
            dataset
                .get(grill_id)
                .and_then(|entry| entry.state())
                .is_some_and(GrillState::is_cooking)
        });

        let accepted = if cooking {
            tracing::info!(grill_id, %mode, "Restarting grill in new mode");
            let off = self.cloud.send(&device, &PowerCommand::Off).await?;
            let on = self.cloud.send(&device, &PowerCommand::On(mode)).await?;
            off && on
        } else {
            tracing::debug!(grill_id, %mode, "Grill is off, mode kept for next power on");
            true
        };

        self.follow_up();
        Ok(accepted)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Stops polling and releases the session and HTTP connections.
    pub async fn close(&self) {
        self.poller.stop().await;
        self.cloud.close();
        tracing::info!(identity = %self.cloud.identity(), "Grill manager closed");
    }

    fn device(&self, grill_id: &str) -> Result<Device> {
        self.cloud
            .cached_device(grill_id)
            .ok_or_else(|| Error::DeviceNotFound(grill_id.to_string()))
    }

    fn follow_up(&self) {
        self.poller.request_burst();
        self.poller.request_refresh();
    }
}
