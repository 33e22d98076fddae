// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use gmg_cloud::GrillCloud;
use gmg_cloud::auth::{Credentials, IdentityProvider, RenewalHandle, Tokens};
use gmg_cloud::error::AuthError;
use gmg_cloud::poller::PollingConfig;
use gmg_cloud::protocol::CloudConfig;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Identity provider issuing `login-N` and `renewed-N` tokens and counting
/// every handshake.
#[derive(Debug, Default)]
pub struct CountingProvider {
    pub logins: AtomicUsize,
    pub renewals: AtomicUsize,
    pub reject: AtomicBool,
}

impl CountingProvider {
    pub fn rejecting() -> Self {
        let provider = Self::default();
        provider.reject.store(true, Ordering::SeqCst);
        provider
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn renewals(&self) -> usize {
        self.renewals.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for CountingProvider {
    async fn login(&self, _credentials: &Credentials) -> Result<Tokens, AuthError> {
        let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject.load(Ordering::SeqCst) {
            return Err(AuthError::Rejected {
                kind: "NotAuthorizedException".to_string(),
                message: "Incorrect username or password.".to_string(),
            });
        }
        Ok(Tokens::new(format!("login-{n}"), Some(RenewalHandle::new("refresh"))))
    }

    async fn renew(
        &self,
        _credentials: &Credentials,
        _handle: &RenewalHandle,
    ) -> Result<Tokens, AuthError> {
        let n = self.renewals.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Tokens::new(format!("renewed-{n}"), None))
    }
}

pub const GRILL_ID: &str = "41029462";
pub const STATE_PATH: &str = "/v1/grill/remote%7C41029462/state";
pub const COMMAND_PATH: &str = "/v1/grill/remote%7C41029462/command";

pub fn credentials() -> Credentials {
    Credentials::new("Cook@Example.com", "secret")
}

pub fn cloud_config(server: &MockServer) -> CloudConfig {
    CloudConfig::new()
        .with_base_url(format!("{}/v1", server.uri()))
        .with_timeout(Duration::from_secs(5))
}

/// Unauthenticated client against the mock server.
pub fn cloud(server: &MockServer) -> GrillCloud<CountingProvider> {
    GrillCloud::new(cloud_config(server), credentials(), CountingProvider::default()).unwrap()
}

/// Authenticated client with its directory loaded.
pub async fn ready_cloud(server: &MockServer) -> Arc<GrillCloud<CountingProvider>> {
    let cloud = cloud(server);
    cloud.authenticate().await.unwrap();
    cloud.list_devices().await.unwrap();
    Arc::new(cloud)
}

/// Short intervals so that timer-driven tests finish quickly.
pub fn fast_polling() -> PollingConfig {
    PollingConfig::new()
        .with_burst_interval(Duration::from_millis(20))
        .with_active_interval(Duration::from_millis(60))
        .with_idle_interval(Duration::from_secs(5))
        .with_fallback_interval(Duration::from_secs(5))
        .with_burst_duration(Duration::from_millis(200))
}

pub fn grill(id: &str, name: &str) -> Value {
    json!({ "grillId": id, "grillName": name, "connectionType": "remote", "bleName": "DB" })
}

pub fn state(grill_state: i64, grill_temp: i64) -> Value {
    json!({
        "grillTemp": grill_temp,
        "setGrillTemp": 225,
        "foodTemp": 89,
        "setFoodTemp": 0,
        "grillState": grill_state,
        "grillMode": 0,
        "warningCode": 0,
        "firmwareVersion": "1.2.3",
        "lastUpdated": "2024-05-01T12:00:00.123456789Z"
    })
}

pub async fn mount_directory(server: &MockServer, grills: Value) {
    Mock::given(method("GET"))
        .and(path("/v1/grill"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grills))
        .mount(server)
        .await;
}

pub async fn mount_state(server: &MockServer, state_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(state_path))
        .respond_with(response)
        .mount(server)
        .await;
}
