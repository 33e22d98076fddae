// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder for the grill manager.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{Credentials, IdentityProvider};
use crate::cloud::GrillCloud;
use crate::error::{Error, Result};
use crate::event::EventBus;
use crate::poller::{Poller, PollingConfig};
use crate::protocol::CloudConfig;

use super::GrillManager;

/// Default capacity of the manager's event bus.
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Configures and sets up a [`GrillManager`].
///
/// # Examples
///
/// ```no_run
/// use gmg_cloud::auth::{CognitoIdentityProvider, Credentials};
/// use gmg_cloud::manager::GrillManagerBuilder;
/// use gmg_cloud::poller::PollingConfig;
/// use std::time::Duration;
///
/// # async fn example() -> gmg_cloud::Result<()> {
/// let manager = GrillManagerBuilder::new(Credentials::new("cook@example.com", "secret"))
///     .with_timeout(Duration::from_secs(10))
///     .with_polling_config(PollingConfig::new().with_idle_interval(Duration::from_secs(120)))
///     .build(CognitoIdentityProvider::gmg()?)
///     .await?;
/// # let _ = manager;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GrillManagerBuilder {
    credentials: Credentials,
    cloud: CloudConfig,
    polling: PollingConfig,
    event_capacity: usize,
}

impl GrillManagerBuilder {
    /// Starts a builder for one account.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            cloud: CloudConfig::new(),
            polling: PollingConfig::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Sets the cloud API configuration.
    #[must_use]
    pub fn with_cloud_config(mut self, config: CloudConfig) -> Self {
        self.cloud = config;
        self
    }

    /// Sets the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.cloud = self.cloud.with_base_url(base_url);
        self
    }

    /// Sets a transport timeout for every API request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.cloud = self.cloud.with_timeout(timeout);
        self
    }

    /// Sets the polling intervals.
    #[must_use]
    pub fn with_polling_config(mut self, config: PollingConfig) -> Self {
        self.polling = config;
        self
    }

    /// Sets the event bus capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Returns the account credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the cloud API configuration.
    #[must_use]
    pub fn cloud_config(&self) -> &CloudConfig {
        &self.cloud
    }

    /// Returns the polling intervals.
    #[must_use]
    pub fn polling_config(&self) -> PollingConfig {
        self.polling
    }

    /// Authenticates, loads the directory, runs the first sweep and starts
    /// polling.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] if the login is rejected
    /// - [`Error::NoDevices`] if the account has no addressable grill
    /// - [`Error::Protocol`] if the configured base URL is invalid
    ///
    /// On error everything set up so far is released again.
    pub async fn build<P: IdentityProvider>(self, provider: P) -> Result<GrillManager<P>> {
        let cloud = Arc::new(GrillCloud::new(self.cloud, self.credentials, provider)?);

        cloud.authenticate().await?;

        let devices = match cloud.list_devices().await {
            Ok(devices) => devices,
            Err(err) => {
                cloud.close();
                return Err(err);
            }
        };
        if devices.is_empty() {
            tracing::error!(identity = %cloud.identity(), "No grills found for account");
            cloud.close();
            return Err(Error::NoDevices(cloud.identity().to_string()));
        }

        let poller = Poller::with_event_bus(
            Arc::clone(&cloud),
            self.polling,
            EventBus::with_capacity(self.event_capacity),
        );

        if let Err(err) = poller.refresh().await {
            cloud.close();
            return Err(err);
        }
        poller.start();

        tracing::info!(
            identity = %cloud.identity(),
            grills = devices.len(),
            "Grill manager ready"
        );

        Ok(GrillManager::from_parts(cloud, poller))
    }
}
