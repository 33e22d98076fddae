// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grill directory records.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Connection type assumed when the directory omits it.
pub const DEFAULT_CONNECTION_TYPE: &str = "remote";

/// Fallback display name and model.
const DEFAULT_NAME: &str = "GMG Grill";

/// One grill as listed by the cloud directory (`GET /grill`).
///
/// The identifier and connection type are opaque: they are never parsed,
/// only combined into the route key used by the state and command endpoints.
///
/// # Examples
///
/// ```
/// use gmg_cloud::Device;
///
/// let json = r#"{"grillId":"41029462","grillName":"Backyard","connectionType":"remote"}"#;
/// let grill: Device = serde_json::from_str(json).unwrap();
///
/// assert_eq!(grill.id(), "41029462");
/// assert_eq!(grill.route_key(), "remote%7C41029462");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "grillId", default, deserialize_with = "opaque_id")]
    id: String,

    #[serde(rename = "grillName", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(
        rename = "connectionType",
        default = "default_connection_type",
        deserialize_with = "connection_type"
    )]
    connection_type: String,

    #[serde(rename = "bleName", default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,

    /// Directory fields this library does not interpret.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Device {
    /// Creates a record by hand, mostly useful for tests and tooling.
    #[must_use]
    pub fn new(id: impl Into<String>, connection_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            connection_type: connection_type.into(),
            model: None,
            extra: Map::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the hardware model tag.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Returns the stable grill identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name, or a generic one when the account never
    /// named the grill.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Returns the connection-type tag.
    #[must_use]
    pub fn connection_type(&self) -> &str {
        &self.connection_type
    }

    /// Returns the hardware model tag.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Returns directory fields not modelled by this struct.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Returns true if the record carries an identifier and can be routed.
    #[must_use]
    pub fn is_addressable(&self) -> bool {
        !self.id.is_empty()
    }

    /// Builds the path segment addressing this grill:
    /// `{connectionType}|{grillId}` with every reserved byte percent-encoded.
    #[must_use]
    pub fn route_key(&self) -> String {
        urlencoding::encode(&format!("{}|{}", self.connection_type, self.id)).into_owned()
    }
}

fn default_connection_type() -> String {
    DEFAULT_CONNECTION_TYPE.to_string()
}

fn connection_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.unwrap_or_else(default_connection_type))
}

/// Accepts identifiers sent either as JSON strings or numbers.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "grill id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_record() {
        let json = r#"{
            "grillId": "41029462",
            "grillName": "Daniel Boone",
            "connectionType": "remote",
            "bleName": "GMG-DB-1234",
            "sk": "Grill|remote|41029462"
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.id(), "41029462");
        assert_eq!(device.name(), "Daniel Boone");
        assert_eq!(device.model(), "GMG-DB-1234");
        assert_eq!(device.extra()["sk"], "Grill|remote|41029462");
    }

    #[test]
    fn numeric_id_is_kept_verbatim() {
        let device: Device = serde_json::from_str(r#"{"grillId": 41029462}"#).unwrap();
        assert_eq!(device.id(), "41029462");
    }

    #[test]
    fn missing_connection_type_defaults_to_remote() {
        let device: Device = serde_json::from_str(r#"{"grillId":"7"}"#).unwrap();
        assert_eq!(device.connection_type(), "remote");

        let device: Device =
            serde_json::from_str(r#"{"grillId":"7","connectionType":null}"#).unwrap();
        assert_eq!(device.connection_type(), "remote");
    }

    #[test]
    fn missing_id_is_not_addressable() {
        let device: Device = serde_json::from_str(r#"{"grillName":"ghost"}"#).unwrap();
        assert!(!device.is_addressable());
        assert_eq!(device.name(), "ghost");
    }

    #[test]
    fn defaults_for_name_and_model() {
        let device = Device::new("1", "remote");
        assert_eq!(device.name(), "GMG Grill");
        assert_eq!(device.model(), "GMG Grill");
    }

    #[test]
    fn route_key_encodes_pipe_and_reserved_bytes() {
        assert_eq!(Device::new("41029462", "remote").route_key(), "remote%7C41029462");
        assert_eq!(Device::new("a b/c", "wifi").route_key(), "wifi%7Ca%20b%2Fc");
        assert_eq!(Device::new("x-1_2.3~", "ble").route_key(), "ble%7Cx-1_2.3~");
    }
}
