// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `gmg_cloud` library.
//!
//! Only a few of these ever reach the host. Per-device failures while
//! polling or sending commands are absorbed where they are detected and show
//! up as an offline grill or a `false` command result instead.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The identity provider refused the credentials, or every login and
    /// renewal attempt failed.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Error occurred during communication with the cloud API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a cloud response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A call that needs a bearer token was made before a successful login.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The account authenticated fine but has no grills attached to it.
    #[error("no grills found for account {0}")]
    NoDevices(String),

    /// The grill is not part of the cached directory.
    #[error("grill not found: {0}")]
    DeviceNotFound(String),

    /// A background polling task failed to complete.
    #[error("polling task failed: {0}")]
    Task(String),
}

/// Errors raised by an identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider rejected the request (bad credentials, revoked refresh
    /// token, unknown client, ...).
    #[error("{kind}: {message}")]
    Rejected {
        /// Provider error type, e.g. `NotAuthorizedException`.
        kind: String,
        /// Human readable reason returned by the provider.
        message: String,
    },

    /// The provider answered with a challenge this flow cannot satisfy.
    #[error("unsupported authentication challenge: {0}")]
    ChallengeRequired(String),

    /// The handshake succeeded but yielded no usable bearer token.
    #[error("identity provider returned no token")]
    MissingToken,

    /// The provider could not be reached.
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider's answer could not be understood.
    #[error("unexpected identity provider response: {0}")]
    UnexpectedResponse(String),

    /// The user pool id is not of the form `{region}_{name}`.
    #[error("invalid user pool id: {0}")]
    InvalidPoolId(String),

    /// The blocking worker running a synchronous provider died.
    #[error("authentication worker failed: {0}")]
    Worker(String),
}

/// Errors related to the HTTP transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The client was closed and can no longer issue requests.
    #[error("client is closed")]
    Closed,
}

/// Errors related to parsing cloud responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An unknown grill mode name was provided.
    #[error("invalid grill mode: {0}")]
    InvalidMode(String),

    /// Only food probes 1 and 2 exist.
    #[error("invalid probe number: {0}")]
    InvalidProbe(u8),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 150,
            max: 500,
            actual: 600,
        };
        assert_eq!(err.to_string(), "value 600 is out of range [150, 500]");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::InvalidProbe(3).into();
        assert!(matches!(err, Error::Value(ValueError::InvalidProbe(3))));
    }

    #[test]
    fn auth_rejected_display() {
        let err = AuthError::Rejected {
            kind: "NotAuthorizedException".to_string(),
            message: "Incorrect username or password.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "NotAuthorizedException: Incorrect username or password."
        );
    }

    #[test]
    fn no_devices_names_the_account() {
        let err = Error::NoDevices("cook@example.com".to_string());
        assert_eq!(err.to_string(), "no grills found for account cook@example.com");
    }

    #[test]
    fn error_from_auth_error() {
        let err: Error = AuthError::MissingToken.into();
        assert!(matches!(err, Error::Auth(AuthError::MissingToken)));
    }
}
