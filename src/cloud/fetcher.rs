// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-grill state snapshots.

use reqwest::StatusCode;

use crate::auth::IdentityProvider;
use crate::device::Device;
use crate::error::Result;
use crate::state::GrillState;

use super::{GrillCloud, Request, grill_path};

impl<P: IdentityProvider> GrillCloud<P> {
    /// Reads the current snapshot of one grill.
    ///
    /// Returns `Ok(None)` when the grill is offline (404), when the token is
    /// still rejected after one renewal, or on any other failure. Absence is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`](crate::Error::NotAuthenticated) if
    /// the client has no token.
    pub async fn fetch_state(&self, device: &Device) -> Result<Option<GrillState>> {
        let path = grill_path(device, "state");
        let grill_id = device.id();

        let response = match self.authorized(Request::Get(&path)).await? {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(grill_id, error = %err, "Failed to fetch grill state");
                return Ok(None);
            }
        };

        match response.status() {
            StatusCode::OK => match response.parse::<GrillState>() {
                Ok(state) => Ok(Some(state)),
                Err(err) => {
                    tracing::warn!(grill_id, error = %err, body = response.excerpt(), "Invalid grill state");
                    Ok(None)
                }
            },
            StatusCode::NOT_FOUND => {
                tracing::debug!(grill_id, "Grill is offline");
                Ok(None)
            }
            status if response.is_auth_failure() => {
                tracing::warn!(grill_id, status = status.as_u16(), "Grill state still unauthorized after re-authentication");
                Ok(None)
            }
            status => {
                tracing::warn!(
                    grill_id,
                    status = status.as_u16(),
                    body = response.excerpt(),
                    "Grill state request failed"
                );
                Ok(None)
            }
        }
    }
}
