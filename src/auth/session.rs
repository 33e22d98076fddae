// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The authenticated session shared by every cloud call.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::error::AuthError;

use super::{Credentials, IdentityProvider, RenewalHandle, Tokens};

/// Token material held after a successful handshake.
#[derive(Debug, Clone)]
struct SessionState {
    bearer: String,
    renewal: Option<RenewalHandle>,
    authenticated_at: DateTime<Utc>,
}

/// Owns the bearer token for one account.
///
/// The token is read without blocking by every request. Logins and
/// renewals are serialized: while one is in flight, other callers wait for
/// it and then reuse its outcome instead of starting their own.
///
/// # Examples
///
/// ```no_run
/// use gmg_cloud::auth::{CognitoIdentityProvider, Credentials, Session};
///
/// # async fn example() -> gmg_cloud::Result<()> {
/// let provider = CognitoIdentityProvider::gmg()?;
/// let session = Session::new(provider, Credentials::new("cook@example.com", "secret"));
///
/// session.authenticate().await?;
/// assert!(session.token().is_some());
///
/// // Later, after the API rejected the token:
/// let usable = session.ensure_token().await;
/// # let _ = usable;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<P> {
    provider: P,
    credentials: Credentials,
    state: RwLock<Option<SessionState>>,
    /// Held for the duration of a login or renewal handshake.
    handshake: Mutex<()>,
}

impl<P: IdentityProvider> Session<P> {
    /// Creates an empty, unauthenticated session.
    #[must_use]
    pub fn new(provider: P, credentials: Credentials) -> Self {
        Self {
            provider,
            credentials,
            state: RwLock::new(None),
            handshake: Mutex::new(()),
        }
    }

    /// Returns the account identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.credentials.identity()
    }

    /// Returns the identity provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.read().as_ref().map(|s| s.bearer.clone())
    }

    /// Returns true once a handshake has succeeded and the session is open.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_some()
    }

    /// Returns when the current token was obtained.
    #[must_use]
    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().as_ref().map(|s| s.authenticated_at)
    }

    /// Performs a full login and stores the resulting token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the provider rejects the credentials or yields
    /// an empty token.
    pub async fn authenticate(&self) -> Result<(), AuthError> {
        let _handshake = self.handshake.lock().await;
        self.login_locked().await
    }

    /// Makes sure a usable token exists, renewing it if possible.
    ///
    /// Logs in when the session never authenticated. Otherwise tries a silent
    /// renewal and falls back to a full login if that fails. Errors are
    /// logged, not returned.
    ///
    /// Callers that queue up behind a handshake already in flight reuse its
    /// token instead of starting another one.
    ///
    /// Returns whether a usable token exists afterwards.
    pub async fn ensure_token(&self) -> bool {
        let seen = self.token();
        self.refresh_unless_replaced(seen.as_deref()).await
    }

    /// Renews after the API rejected `rejected`.
    ///
    /// If the token was already replaced by a concurrent caller, the new token
    /// is used as is and no handshake happens.
    pub(crate) async fn renew_rejected(&self, rejected: &str) -> bool {
        self.refresh_unless_replaced(Some(rejected)).await
    }

    async fn refresh_unless_replaced(&self, seen: Option<&str>) -> bool {
        let _handshake = self.handshake.lock().await;

        if self.token().is_some_and(|current| Some(current.as_str()) != seen) {
            tracing::debug!(identity = %self.identity(), "Token already renewed by a concurrent call");
            return true;
        }

        self.refresh_locked().await
    }

    /// Forgets the token. Later calls need a new [`authenticate`](Self::authenticate).
    pub fn close(&self) {
        if self.state.write().take().is_some() {
            tracing::debug!(identity = %self.identity(), "Session closed");
        }
    }

    async fn login_locked(&self) -> Result<(), AuthError> {
        tracing::debug!(identity = %self.identity(), "Logging in");

        let tokens = match self.provider.login(&self.credentials).await {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::error!(identity = %self.identity(), error = %err, "Authentication failed");
                return Err(err);
            }
        };

        if tokens.bearer.is_empty() {
            tracing::error!(identity = %self.identity(), "Identity provider returned an empty token");
            return Err(AuthError::MissingToken);
        }

        *self.state.write() = Some(SessionState {
            bearer: tokens.bearer,
            renewal: tokens.renewal,
            authenticated_at: Utc::now(),
        });

        tracing::info!(identity = %self.identity(), "Authenticated with grill cloud");
        Ok(())
    }

    async fn refresh_locked(&self) -> bool {
        let renewal = self.state.read().as_ref().map(|s| s.renewal.clone());

        match renewal {
            None => return self.login_locked().await.is_ok(),
            Some(None) => {
                tracing::debug!(identity = %self.identity(), "No renewal handle, logging in again");
            }
            Some(Some(handle)) => match self.provider.renew(&self.credentials, &handle).await {
                Ok(tokens) if !tokens.bearer.is_empty() => {
                    self.apply_renewal(tokens);
                    tracing::info!(identity = %self.identity(), "Token renewed");
                    return true;
                }
                Ok(_) => {
                    tracing::warn!(identity = %self.identity(), "Renewal returned no token, re-authenticating");
                }
                Err(err) => {
                    tracing::warn!(identity = %self.identity(), error = %err, "Token renewal failed, re-authenticating");
                }
            },
        }

        self.login_locked().await.is_ok()
    }

    fn apply_renewal(&self, tokens: Tokens) {
        // A session closed while the renewal was in flight stays closed.
        let mut state = self.state.write();
        if let Some(current) = state.as_mut() {
            current.bearer = tokens.bearer;
            if let Some(renewal) = tokens.renewal {
                current.renewal = Some(renewal);
            }
            current.authenticated_at = Utc::now();
        }
    }
}
