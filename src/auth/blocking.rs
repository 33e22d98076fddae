// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adapter running a synchronous identity provider off the async runtime.

use std::sync::Arc;

use crate::error::AuthError;

use super::{Credentials, IdentityProvider, RenewalHandle, Tokens};

/// A login/renewal handshake implemented with blocking I/O.
pub trait BlockingIdentityProvider: Send + Sync + 'static {
    /// Performs a full login, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the provider rejects the credentials.
    fn login(&self, credentials: &Credentials) -> Result<Tokens, AuthError>;

    /// Exchanges a renewal handle for a fresh token, blocking the calling
    /// thread.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the handle is no longer accepted.
    fn renew(&self, credentials: &Credentials, handle: &RenewalHandle)
    -> Result<Tokens, AuthError>;
}

/// Runs a [`BlockingIdentityProvider`] on tokio's blocking worker pool so
/// that the polling timer is never stalled by a slow handshake.
///
/// # Examples
///
/// ```
/// use gmg_cloud::auth::{Blocking, BlockingIdentityProvider, Credentials, RenewalHandle, Tokens};
/// use gmg_cloud::error::AuthError;
///
/// struct Static;
///
/// impl BlockingIdentityProvider for Static {
///     fn login(&self, _: &Credentials) -> Result<Tokens, AuthError> {
///         Ok(Tokens::new("token", None))
///     }
///     fn renew(&self, _: &Credentials, _: &RenewalHandle) -> Result<Tokens, AuthError> {
///         Err(AuthError::MissingToken)
///     }
/// }
///
/// let provider = Blocking::new(Static);
/// # let _ = provider;
/// ```
#[derive(Debug)]
pub struct Blocking<P>(Arc<P>);

impl<P> Blocking<P> {
    /// Wraps a synchronous provider.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self(Arc::new(provider))
    }

    /// Returns the wrapped provider.
    #[must_use]
    pub fn inner(&self) -> &P {
        &self.0
    }
}

impl<P> Clone for Blocking<P> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<P: BlockingIdentityProvider> IdentityProvider for Blocking<P> {
    async fn login(&self, credentials: &Credentials) -> Result<Tokens, AuthError> {
        let provider = Arc::clone(&self.0);
        let credentials = credentials.clone();

        tokio::task::spawn_blocking(move || {
            BlockingIdentityProvider::login(provider.as_ref(), &credentials)
        })
        .await
        .map_err(|e| AuthError::Worker(e.to_string()))?
    }

    async fn renew(
        &self,
        credentials: &Credentials,
        handle: &RenewalHandle,
    ) -> Result<Tokens, AuthError> {
        let provider = Arc::clone(&self.0);
        let credentials = credentials.clone();
        let handle = handle.clone();

        tokio::task::spawn_blocking(move || {
            BlockingIdentityProvider::renew(provider.as_ref(), &credentials, &handle)
        })
        .await
        .map_err(|e| AuthError::Worker(e.to_string()))?
    }
}
