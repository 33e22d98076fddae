// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated client for the grill cloud API.
//!
//! [`GrillCloud`] combines the [`HttpClient`] transport with a [`Session`]
//! and the cached grill directory. Every request carries the current bearer
//! token; when the API answers 401 or 403 the session is renewed and the
//! request is retried exactly once.
//!
//! Apart from a missing token, failures never surface as errors: a grill
//! that cannot be read is reported as absent and a command that cannot be
//! delivered as `false`.

mod commands;
mod directory;
mod fetcher;

use parking_lot::RwLock;

use crate::auth::{Credentials, IdentityProvider, Session};
use crate::device::Device;
use crate::error::{Error, ProtocolError, Result};
use crate::protocol::{CloudConfig, HttpClient, RawResponse};

/// Outcome of one HTTP exchange after the reauth-and-retry step.
type Exchange = std::result::Result<RawResponse, ProtocolError>;

/// Request shapes used against the API.
#[derive(Debug, Clone, Copy)]
enum Request<'a> {
    Get(&'a str),
    Put { path: &'a str, body: &'a [u8] },
}

impl Request<'_> {
    fn path(&self) -> &str {
        match self {
            Self::Get(path) | Self::Put { path, .. } => *path,
        }
    }
}

/// Client for one account on the grill cloud.
///
/// # Examples
///
/// ```no_run
/// use gmg_cloud::GrillCloud;
/// use gmg_cloud::auth::{CognitoIdentityProvider, Credentials};
/// use gmg_cloud::protocol::CloudConfig;
///
/// # async fn example() -> gmg_cloud::Result<()> {
/// let cloud = GrillCloud::new(
///     CloudConfig::new(),
///     Credentials::new("cook@example.com", "secret"),
///     CognitoIdentityProvider::gmg()?,
/// )?;
///
/// cloud.authenticate().await?;
/// for grill in cloud.list_devices().await? {
///     let state = cloud.fetch_state(&grill).await?;
///     println!("{}: {:?}", grill.name(), state.and_then(|s| s.grill_temperature()));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GrillCloud<P> {
    http: HttpClient,
    session: Session<P>,
    directory: RwLock<Vec<Device>>,
}

impl<P: IdentityProvider> GrillCloud<P> {
    /// Creates a client. No request is made until
    /// [`authenticate`](Self::authenticate).
    ///
    /// # Errors
    ///
    /// Returns error if the configured base URL is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: CloudConfig, credentials: Credentials, provider: P) -> Result<Self> {
        Ok(Self::from_parts(
            config.into_client()?,
            Session::new(provider, credentials),
        ))
    }

    /// Creates a client from an existing transport and session.
    #[must_use]
    pub fn from_parts(http: HttpClient, session: Session<P>) -> Self {
        Self {
            http,
            session,
            directory: RwLock::new(Vec::new()),
        }
    }

    /// Returns the session.
    #[must_use]
    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    /// Returns the account identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.session.identity()
    }

    /// Logs in with the account credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the identity provider rejects the login.
    pub async fn authenticate(&self) -> Result<()> {
        self.session.authenticate().await.map_err(Error::from)
    }

    /// Releases the session and the HTTP connection pool.
    ///
    /// Afterwards every call fails with [`Error::NotAuthenticated`] until the
    /// client is authenticated again; the transport stays closed.
    pub fn close(&self) {
        self.session.close();
        self.http.close();
        tracing::debug!(identity = %self.identity(), "Grill cloud client closed");
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.http.is_closed()
    }

    fn token(&self) -> Result<String> {
        self.session.token().ok_or(Error::NotAuthenticated)
    }

    async fn execute(&self, request: Request<'_>, token: &str) -> Exchange {
        match request {
            Request::Get(path) => self.http.get(path, token).await,
            Request::Put { path, body } => self.http.put_octets(path, token, body.to_vec()).await,
        }
    }

    /// Sends `request`, renewing the session and retrying once if the token
    /// is rejected.
    ///
    /// A second rejection is returned as is. Only a missing token is an
    /// error; transport failures are part of the returned exchange.
    async fn authorized(&self, request: Request<'_>) -> Result<Exchange> {
        let token = self.token()?;
        let response = match self.execute(request, &token).await {
            Ok(response) if response.is_auth_failure() => response,
            other => return Ok(other),
        };

        tracing::info!(
            path = request.path(),
            status = response.status().as_u16(),
            "Token rejected, re-authenticating"
        );

        if !self.session.renew_rejected(&token).await {
            tracing::warn!(path = request.path(), "Re-authentication failed");
            return Ok(Ok(response));
        }

        let token = self.token()?;
        Ok(self.execute(request, &token).await)
    }
}

/// Path of a grill-scoped endpoint, e.g. `/grill/remote%7C123/state`.
fn grill_path(device: &Device, endpoint: &str) -> String {
    format!("/grill/{}/{endpoint}", device.route_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grill_path_uses_encoded_route_key() {
        let device = Device::new("41029462", "remote");
        assert_eq!(grill_path(&device, "state"), "/grill/remote%7C41029462/state");
        assert_eq!(
            grill_path(&device, "command"),
            "/grill/remote%7C41029462/command"
        );
    }

    #[test]
    fn request_path() {
        assert_eq!(Request::Get("/grill").path(), "/grill");
        let put = Request::Put {
            path: "/grill/x/command",
            body: b"UK004!",
        };
        assert_eq!(put.path(), "/grill/x/command");
    }
}
