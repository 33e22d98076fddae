// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command delivery.

use reqwest::StatusCode;

use crate::auth::IdentityProvider;
use crate::command::Command;
use crate::device::Device;
use crate::error::Result;

use super::{GrillCloud, Request, grill_path};

/// Statuses the cloud uses to acknowledge a command.
const ACCEPTED: [StatusCode; 3] = [StatusCode::OK, StatusCode::CREATED, StatusCode::ACCEPTED];

impl<P: IdentityProvider> GrillCloud<P> {
    /// Sends a raw command body to a grill.
    ///
    /// Returns whether the cloud accepted the command (200, 201 or 202).
    /// Delivery failures are logged and reported as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`](crate::Error::NotAuthenticated) if
    /// the client has no token.
    pub async fn send_command(&self, device: &Device, body: &[u8]) -> Result<bool> {
        let path = grill_path(device, "command");
        let grill_id = device.id();
        let command = String::from_utf8_lossy(body);

        tracing::debug!(grill_id, command = %command, "Sending grill command");

        let response = match self.authorized(Request::Put { path: &path, body }).await? {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(grill_id, command = %command, error = %err, "Failed to send grill command");
                return Ok(false);
            }
        };

        if ACCEPTED.contains(&response.status()) {
            tracing::info!(grill_id, command = %command, "Grill command accepted");
            Ok(true)
        } else {
            tracing::warn!(
                grill_id,
                command = %command,
                status = response.status().as_u16(),
                body = response.excerpt(),
                "Grill command rejected"
            );
            Ok(false)
        }
    }

    /// Encodes and sends a typed command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`](crate::Error::NotAuthenticated) if
    /// the client has no token.
    pub async fn send<C: Command + ?Sized>(&self, device: &Device, command: &C) -> Result<bool> {
        self.send_command(device, &command.to_bytes()).await
    }
}
