// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account credentials, identity providers and the authenticated session.
//!
//! The cloud API accepts an id token issued by a hosted identity pool. An
//! [`IdentityProvider`] performs the login and renewal handshakes; the
//! [`Session`] owns the resulting token and decides when to renew it.
//!
//! # Providers
//!
//! - [`CognitoIdentityProvider`]: talks to the identity pool's JSON API
//!   (SRP or password login, refresh-token renewal)
//! - [`Blocking`]: runs a synchronous [`BlockingIdentityProvider`] on the
//!   blocking worker pool, for handshakes implemented by a blocking library

mod blocking;
mod cognito;
mod session;
mod srp;

pub use blocking::{Blocking, BlockingIdentityProvider};
pub use cognito::{CognitoIdentityProvider, LoginFlow};
pub use session::Session;

use std::fmt;
use std::future::Future;

use crate::error::AuthError;

/// Account identity and secret.
///
/// The identity is passed to the identity provider exactly as given. Use
/// [`Credentials::normalized`] for accounts whose pool stores identities in
/// lowercase, as the vendor's pool does for emails. The secret never appears
/// in `Debug` output.
///
/// # Examples
///
/// ```
/// use gmg_cloud::auth::Credentials;
///
/// let creds = Credentials::new("Cook@Example.com", "hunter2");
/// assert_eq!(creds.identity(), "Cook@Example.com");
/// assert!(!format!("{creds:?}").contains("hunter2"));
///
/// let creds = Credentials::normalized(" Cook@Example.com ", "hunter2");
/// assert_eq!(creds.identity(), "cook@example.com");
/// ```
#[derive(Clone)]
pub struct Credentials {
    identity: String,
    secret: String,
}

impl Credentials {
    /// Creates credentials from an account identity and secret.
    #[must_use]
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }

    /// Creates credentials with the identity trimmed and lower-cased.
    #[must_use]
    pub fn normalized(identity: impl AsRef<str>, secret: impl Into<String>) -> Self {
        Self::new(identity.as_ref().trim().to_lowercase(), secret)
    }

    /// Returns the account identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the account secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Opaque, provider-specific handle used to renew a token silently.
#[derive(Clone, PartialEq, Eq)]
pub struct RenewalHandle(String);

impl RenewalHandle {
    /// Wraps a provider handle.
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Returns the raw handle.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RenewalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenewalHandle(<redacted>)")
    }
}

/// Result of a successful login or renewal.
#[derive(Clone, PartialEq, Eq)]
pub struct Tokens {
    /// Bearer token presented to the cloud API.
    pub bearer: String,
    /// Handle for the next renewal. `None` on a renewal keeps the old one.
    pub renewal: Option<RenewalHandle>,
}

impl Tokens {
    /// Creates a token set.
    #[must_use]
    pub fn new(bearer: impl Into<String>, renewal: Option<RenewalHandle>) -> Self {
        Self {
            bearer: bearer.into(),
            renewal,
        }
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokens")
            .field("bearer", &"<redacted>")
            .field("renewal", &self.renewal)
            .finish()
    }
}

/// A login/renewal handshake against a hosted identity service.
///
/// Both calls are single suspend points from the session's point of view.
/// Their futures must be `Send` so sessions can be shared across tasks.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Performs a full login with the account credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the provider rejects the credentials or cannot
    /// be reached.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Tokens, AuthError>> + Send;

    /// Exchanges a renewal handle for a fresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the handle is no longer accepted.
    fn renew(
        &self,
        credentials: &Credentials,
        handle: &RenewalHandle,
    ) -> impl Future<Output = Result<Tokens, AuthError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_keep_identity_verbatim() {
        let creds = Credentials::new("Pit.Master@Example.COM", "secret");
        assert_eq!(creds.identity(), "Pit.Master@Example.COM");
        assert_eq!(creds.secret(), "secret");
    }

    #[test]
    fn normalized_credentials_lowercase_identity() {
        let creds = Credentials::normalized("  Pit.Master@Example.COM ", "secret");
        assert_eq!(creds.identity(), "pit.master@example.com");
        assert_eq!(creds.secret(), "secret");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::new("a@b.c", "pa55word");
        let tokens = Tokens::new("eyJraWQ", Some(RenewalHandle::new("refresh-me")));

        let rendered = format!("{creds:?} {tokens:?}");
        assert!(!rendered.contains("pa55word"));
        assert!(!rendered.contains("eyJraWQ"));
        assert!(!rendered.contains("refresh-me"));
    }
}
