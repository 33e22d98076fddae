// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity provider speaking the hosted user pool's JSON API.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AuthError;

use super::srp::{self, PasswordChallenge, SrpHandshake};
use super::{Credentials, IdentityProvider, RenewalHandle, Tokens};

const TARGET_HEADER: &str = "X-Amz-Target";
const INITIATE_AUTH_TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
const RESPOND_TARGET: &str = "AWSCognitoIdentityProviderService.RespondToAuthChallenge";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

const SRP_FLOW: &str = "USER_SRP_AUTH";
const PASSWORD_FLOW: &str = "USER_PASSWORD_AUTH";
const REFRESH_FLOW: &str = "REFRESH_TOKEN_AUTH";
const PASSWORD_VERIFIER: &str = "PASSWORD_VERIFIER";

/// How [`CognitoIdentityProvider`] performs a full login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginFlow {
    /// `USER_SRP_AUTH` answered with a `PASSWORD_VERIFIER` claim. The
    /// password never leaves the process.
    #[default]
    Srp,
    /// `USER_PASSWORD_AUTH`. Only works for app clients that enable it.
    Password,
}

impl LoginFlow {
    /// Returns the pool's name for the flow.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Srp => SRP_FLOW,
            Self::Password => PASSWORD_FLOW,
        }
    }
}

impl fmt::Display for LoginFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity provider for the user pool backing the grill cloud.
///
/// Logs in with the SRP password verifier by default and renews with
/// `REFRESH_TOKEN_AUTH`. The pool's id token is the bearer token the grill
/// API expects; the refresh token is the renewal handle.
///
/// # Examples
///
/// ```
/// use gmg_cloud::auth::{CognitoIdentityProvider, LoginFlow};
///
/// let provider = CognitoIdentityProvider::gmg().unwrap();
/// assert_eq!(provider.endpoint(), "https://cognito-idp.us-east-1.amazonaws.com/");
/// assert_eq!(provider.login_flow(), LoginFlow::Srp);
/// ```
#[derive(Debug, Clone)]
pub struct CognitoIdentityProvider {
    client: Client,
    endpoint: String,
    pool_id: String,
    client_id: String,
    flow: LoginFlow,
}

/// Answer to `InitiateAuth` and `RespondToAuthChallenge`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthResponse {
    #[serde(default)]
    authentication_result: Option<AuthenticationResult>,
    #[serde(default)]
    challenge_name: Option<String>,
    #[serde(default)]
    challenge_parameters: HashMap<String, String>,
    #[serde(default)]
    session: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl AuthenticationResult {
    fn into_tokens(self) -> Result<Tokens, AuthError> {
        let bearer = self.id_token.ok_or(AuthError::MissingToken)?;
        Ok(Tokens::new(bearer, self.refresh_token.map(RenewalHandle::new)))
    }
}

/// Error body returned with 4xx/5xx statuses.
#[derive(Debug, Default, Deserialize)]
struct ServiceError {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(default, alias = "Message")]
    message: String,
}

impl CognitoIdentityProvider {
    /// User pool of the grill vendor.
    pub const GMG_POOL_ID: &'static str = "us-east-1_i4HRNwzTt";

    /// App client id used by the vendor's mobile app.
    pub const GMG_CLIENT_ID: &'static str = "2me003sbd4ouslkekf2uco2cna";

    /// Creates a provider for a user pool and app client.
    ///
    /// The service region is taken from the pool id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidPoolId`] if the pool id has no region
    /// prefix, or an HTTP error if the client cannot be created.
    pub fn new(pool_id: impl Into<String>, client_id: impl Into<String>) -> Result<Self, AuthError> {
        let pool_id = pool_id.into();
        let region = match pool_id.split_once('_') {
            Some((region, name)) if !region.is_empty() && !name.is_empty() => region.to_string(),
            _ => return Err(AuthError::InvalidPoolId(pool_id)),
        };

        Ok(Self {
            client: Client::builder().build()?,
            endpoint: format!("https://cognito-idp.{region}.amazonaws.com/"),
            pool_id,
            client_id: client_id.into(),
            flow: LoginFlow::default(),
        })
    }

    /// Creates a provider for the grill vendor's pool.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn gmg() -> Result<Self, AuthError> {
        Self::new(Self::GMG_POOL_ID, Self::GMG_CLIENT_ID)
    }

    /// Overrides the service endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Selects the login flow.
    #[must_use]
    pub fn with_login_flow(mut self, flow: LoginFlow) -> Self {
        self.flow = flow;
        self
    }

    /// Returns the service endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the user pool id.
    #[must_use]
    pub fn pool_id(&self) -> &str {
        &self.pool_id
    }

    /// Returns the app client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the login flow.
    #[must_use]
    pub fn login_flow(&self) -> LoginFlow {
        self.flow
    }

    fn pool_name(&self) -> &str {
        self.pool_id
            .split_once('_')
            .map_or(self.pool_id.as_str(), |(_, name)| name)
    }

    async fn call(&self, target: &str, body: Value) -> Result<AuthResponse, AuthError> {
        tracing::debug!(operation = target, endpoint = %self.endpoint, "Calling identity pool");

        let response = self
            .client
            .post(&self.endpoint)
            .header(TARGET_HEADER, target)
            .header(CONTENT_TYPE, AMZ_JSON)
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let error: ServiceError = serde_json::from_str(&text).unwrap_or_default();
            // `__type` is sometimes namespaced: "com.amazonaws...#NotAuthorizedException".
            let kind = error
                .kind
                .rsplit('#')
                .next()
                .filter(|k| !k.is_empty())
                .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string);
            return Err(AuthError::Rejected {
                kind,
                message: error.message,
            });
        }

        serde_json::from_str(&text).map_err(|e| AuthError::UnexpectedResponse(e.to_string()))
    }

    async fn initiate(&self, flow: &str, parameters: Value) -> Result<AuthResponse, AuthError> {
        self.call(
            INITIATE_AUTH_TARGET,
            json!({
                "AuthFlow": flow,
                "ClientId": self.client_id,
                "AuthParameters": parameters,
            }),
        )
        .await
    }

    async fn login_with_password(&self, credentials: &Credentials) -> Result<Tokens, AuthError> {
        let response = self
            .initiate(
                PASSWORD_FLOW,
                json!({
                    "USERNAME": credentials.identity(),
                    "PASSWORD": credentials.secret(),
                }),
            )
            .await?;

        authenticated(response)?.into_tokens()
    }

    async fn login_with_srp(&self, credentials: &Credentials) -> Result<Tokens, AuthError> {
        let handshake = SrpHandshake::new(self.pool_name());

        let response = self
            .initiate(
                SRP_FLOW,
                json!({
                    "USERNAME": credentials.identity(),
                    "SRP_A": handshake.public_hex(),
                }),
            )
            .await?;

        if response.challenge_name.as_deref() != Some(PASSWORD_VERIFIER) {
            return authenticated(response)?.into_tokens();
        }

        let parameters = &response.challenge_parameters;
        let challenge = PasswordChallenge {
            user_id: challenge_parameter(parameters, "USER_ID_FOR_SRP")?,
            salt: challenge_parameter(parameters, "SALT")?,
            server_public: challenge_parameter(parameters, "SRP_B")?,
            secret_block: challenge_parameter(parameters, "SECRET_BLOCK")?,
        };
        let timestamp = srp::timestamp(Utc::now());
        let signature = handshake.sign(&challenge, credentials.secret(), &timestamp)?;

        let mut body = json!({
            "ChallengeName": PASSWORD_VERIFIER,
            "ClientId": self.client_id,
            "ChallengeResponses": {
                "USERNAME": challenge.user_id,
                "TIMESTAMP": timestamp,
                "PASSWORD_CLAIM_SECRET_BLOCK": challenge.secret_block,
                "PASSWORD_CLAIM_SIGNATURE": signature,
            },
        });
        if let Some(session) = &response.session {
            body["Session"] = Value::String(session.clone());
        }

        tracing::debug!(user_id = challenge.user_id, "Answering password verifier challenge");
        authenticated(self.call(RESPOND_TARGET, body).await?)?.into_tokens()
    }
}

/// Extracts the authentication result, mapping any other challenge to an error.
fn authenticated(response: AuthResponse) -> Result<AuthenticationResult, AuthError> {
    match (response.authentication_result, response.challenge_name) {
        (Some(result), _) => Ok(result),
        (None, Some(challenge)) => Err(AuthError::ChallengeRequired(challenge)),
        (None, None) => Err(AuthError::UnexpectedResponse(
            "neither AuthenticationResult nor ChallengeName present".to_string(),
        )),
    }
}

fn challenge_parameter<'a>(
    parameters: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, AuthError> {
    parameters
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| AuthError::UnexpectedResponse(format!("challenge is missing {name}")))
}

impl IdentityProvider for CognitoIdentityProvider {
    async fn login(&self, credentials: &Credentials) -> Result<Tokens, AuthError> {
        match self.flow {
            LoginFlow::Srp => self.login_with_srp(credentials).await,
            LoginFlow::Password => self.login_with_password(credentials).await,
        }
    }

    async fn renew(
        &self,
        _credentials: &Credentials,
        handle: &RenewalHandle,
    ) -> Result<Tokens, AuthError> {
        let response = self
            .initiate(REFRESH_FLOW, json!({ "REFRESH_TOKEN": handle.as_str() }))
            .await?;

        authenticated(response)?.into_tokens()
    }
}
