// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the grill cloud API.
//!
//! [`HttpClient`] issues the raw authenticated requests; it knows nothing
//! about sessions or retries. Those live in [`GrillCloud`](crate::GrillCloud).

mod http;

pub use http::{CloudConfig, HttpClient};

use reqwest::StatusCode;

use crate::error::{ParseError, ProtocolError};

/// Longest body excerpt kept for log messages.
const LOG_EXCERPT_LEN: usize = 200;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    body: String,
}

impl RawResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }

    async fn read(response: reqwest::Response) -> Result<Self, ProtocolError> {
        let status = response.status();
        let body = response.text().await.map_err(ProtocolError::Http)?;
        tracing::debug!(status = status.as_u16(), "Received HTTP response");
        Ok(Self { status, body })
    }

    /// Returns the HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true for 401 and 403, the statuses that mean the bearer token
    /// is no longer accepted.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
    }

    /// Returns the start of the body, for log messages.
    #[must_use]
    pub fn excerpt(&self) -> &str {
        match self.body.char_indices().nth(LOG_EXCERPT_LEN) {
            Some((idx, _)) => &self.body[..idx],
            None => &self.body,
        }
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}
