// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grill directory of the account.

use reqwest::StatusCode;

use crate::auth::IdentityProvider;
use crate::device::Device;
use crate::error::Result;

use super::{GrillCloud, Request};

const DIRECTORY_PATH: &str = "/grill";

impl<P: IdentityProvider> GrillCloud<P> {
    /// Fetches the grills attached to the account and caches them.
    ///
    /// Records without a grill id are dropped with a warning. On any
    /// failure other than a missing token an empty list is returned and the
    /// cache is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`](crate::Error::NotAuthenticated) if
    /// the client has no token.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let response = match self.authorized(Request::Get(DIRECTORY_PATH)).await? {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch grill directory");
                return Ok(Vec::new());
            }
        };

        if response.status() != StatusCode::OK {
            tracing::warn!(
                status = response.status().as_u16(),
                body = response.excerpt(),
                "Grill directory request failed"
            );
            return Ok(Vec::new());
        }

        let records: Vec<Device> = match response.parse() {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(error = %err, body = response.excerpt(), "Invalid grill directory");
                return Ok(Vec::new());
            }
        };

        let devices: Vec<Device> = records
            .into_iter()
            .filter(|device| {
                if !device.is_addressable() {
                    tracing::warn!(name = device.name(), "Skipping grill without an id");
                }
                device.is_addressable()
            })
            .collect();

        tracing::info!(count = devices.len(), identity = %self.identity(), "Grill directory loaded");
        self.directory.write().clone_from(&devices);
        Ok(devices)
    }

    /// Returns the directory cached by the last successful
    /// [`list_devices`](Self::list_devices). No I/O.
    #[must_use]
    pub fn cached_devices(&self) -> Vec<Device> {
        self.directory.read().clone()
    }

    /// Returns the cached record for a grill id.
    #[must_use]
    pub fn cached_device(&self, grill_id: &str) -> Option<Device> {
        self.directory
            .read()
            .iter()
            .find(|device| device.id() == grill_id)
            .cloned()
    }
}
