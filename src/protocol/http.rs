// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the grill cloud API.

use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::error::ProtocolError;
use crate::protocol::RawResponse;

// ============================================================================
// CloudConfig - Where and how to reach the cloud API
// ============================================================================

/// Configuration of the cloud API endpoint.
///
/// No request timeout is set by default: the transport's own behaviour
/// applies unless [`with_timeout`](Self::with_timeout) is used.
///
/// # Examples
///
/// ```
/// use gmg_cloud::protocol::CloudConfig;
/// use std::time::Duration;
///
/// let config = CloudConfig::new();
/// assert_eq!(config.base_url(), "https://prime-api.gmgserver.net/v1");
///
/// let config = CloudConfig::new()
///     .with_base_url("http://127.0.0.1:8080/v1/")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://127.0.0.1:8080/v1");
/// ```
#[derive(Debug, Clone)]
pub struct CloudConfig {
    base_url: String,
    timeout: Option<Duration>,
}

impl CloudConfig {
    /// Production API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://prime-api.gmgserver.net/v1";

    /// Creates a configuration pointing at the production API.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Sets a different API root. A trailing slash is ignored.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets a transport timeout applied to every request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the transport timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an http(s) URL or the HTTP client
    /// cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url,
            client: RwLock::new(Some(client)),
        })
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HttpClient - Authenticated requests against the API root
// ============================================================================

/// HTTP client for the grill cloud API.
///
/// Every call carries the bearer token verbatim in the `Authorization`
/// header, without an authentication-scheme prefix. Non-2xx statuses are
/// returned as a [`RawResponse`] so that callers can decide what a 401 or a
/// 404 means for them; only transport failures are errors.
#[derive(Debug)]
pub struct HttpClient {
    base_url: String,
    client: RwLock<Option<Client>>,
}

impl HttpClient {
    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the absolute URL for an API path such as `/grill`.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn client(&self) -> Result<Client, ProtocolError> {
        self.client.read().clone().ok_or(ProtocolError::Closed)
    }

    /// Sends an authenticated `GET`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or if the client was closed.
    pub async fn get(&self, path: &str, token: &str) -> Result<RawResponse, ProtocolError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Sending HTTP GET");

        let response = self
            .client()?
            .get(&url)
            .header(AUTHORIZATION, token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        RawResponse::read(response).await
    }

    /// Sends an authenticated `PUT` with a binary body.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or if the client was closed.
    pub async fn put_octets(
        &self,
        path: &str,
        token: &str,
        body: Vec<u8>,
    ) -> Result<RawResponse, ProtocolError> {
        let url = self.url(path);
        tracing::debug!(url = %url, bytes = body.len(), "Sending HTTP PUT");

        let response = self
            .client()?
            .put(&url)
            .header(AUTHORIZATION, token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        RawResponse::read(response).await
    }

    /// Drops the underlying connection pool. Later requests fail with
    /// [`ProtocolError::Closed`]; requests already in flight finish normally.
    pub fn close(&self) {
        if self.client.write().take().is_some() {
            tracing::debug!(base_url = %self.base_url, "HTTP client closed");
        }
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.client.read().is_none()
    }
}
