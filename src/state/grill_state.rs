// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser and projections for `GET /grill/{key}/state` snapshots.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::{GrillMode, OperatingState, Probe, ProfileStatus, Warning};

/// `profileRemainingTime` value meaning "no profile / runs forever".
const PROFILE_TIME_INFINITE: u64 = 0xFFFF_FFFF;

/// One point-in-time read of a grill's reported fields.
///
/// The cloud does not publish a schema, so every known field is optional and
/// anything unknown is kept in [`extra`](Self::extra). Every known field is
/// read leniently: numbers may arrive as strings (`"226"`), integer codes as
/// floats (`1.0`), and a value of the wrong shape reads as absent instead of
/// failing the whole snapshot.
///
/// # Examples
///
/// ```
/// use gmg_cloud::state::GrillState;
/// use gmg_cloud::types::OperatingState;
///
/// let json = r#"{"grillTemp":231,"setGrillTemp":225,"grillState":3,"warningCode":0}"#;
/// let state: GrillState = serde_json::from_str(json).unwrap();
///
/// assert_eq!(state.grill_temperature(), Some(231.0));
/// assert_eq!(state.operating_state(), OperatingState::Smoking);
/// assert!(state.is_running());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrillState {
    /// Current grill chamber temperature.
    #[serde(
        default,
        deserialize_with = "lenient_float",
        skip_serializing_if = "Option::is_none"
    )]
    grill_temp: Option<f64>,

    /// Grill setpoint, 0 when unset.
    #[serde(
        default,
        deserialize_with = "lenient_float",
        skip_serializing_if = "Option::is_none"
    )]
    set_grill_temp: Option<f64>,

    /// Food probe 1 reading.
    #[serde(
        default,
        deserialize_with = "lenient_float",
        skip_serializing_if = "Option::is_none"
    )]
    food_temp: Option<f64>,

    /// Food probe 2 reading.
    #[serde(
        default,
        deserialize_with = "lenient_float",
        skip_serializing_if = "Option::is_none"
    )]
    food_temp2: Option<f64>,

    /// Food probe 1 target, 0 when unset.
    #[serde(
        default,
        deserialize_with = "lenient_float",
        skip_serializing_if = "Option::is_none"
    )]
    set_food_temp: Option<f64>,

    /// Food probe 2 target, 0 when unset.
    #[serde(
        default,
        deserialize_with = "lenient_float",
        skip_serializing_if = "Option::is_none"
    )]
    set_food_temp2: Option<f64>,

    /// Operating-mode code: 0 off, 1 grill, 2 fan, 3 smoke.
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    grill_state: Option<i64>,

    /// Secondary mode code; 3 marks pizza mode.
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    grill_mode: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    warning_code: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    fire_state: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    fire_state_progress: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    firmware_version: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    software_path: Option<String>,

    /// RFC 3339 timestamp, often with nanosecond precision.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    last_updated: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    cur_profile_id: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    cur_profile_step_id: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    num_profile_steps: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    cur_profile_paused: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    profile_remaining_time: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    profile_end_mode: Option<i64>,

    /// Fields this library does not interpret.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl GrillState {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Temperatures ==========

    /// Returns the current grill chamber temperature.
    #[must_use]
    pub fn grill_temperature(&self) -> Option<f64> {
        self.grill_temp
    }

    /// Returns the grill setpoint, or `None` when the grill reports 0 (unset).
    #[must_use]
    pub fn grill_target(&self) -> Option<f64> {
        self.set_grill_temp.filter(|t| *t > 0.0)
    }

    /// Returns the current reading of a food probe.
    #[must_use]
    pub fn probe_temperature(&self, probe: Probe) -> Option<f64> {
        match probe {
            Probe::One => self.food_temp,
            Probe::Two => self.food_temp2,
        }
    }

    /// Returns the target of a food probe, or `None` when unset.
    #[must_use]
    pub fn probe_target(&self, probe: Probe) -> Option<f64> {
        let raw = match probe {
            Probe::One => self.set_food_temp,
            Probe::Two => self.set_food_temp2,
        };
        raw.filter(|t| *t > 0.0)
    }

    // ========== Status ==========

    /// Returns the raw operating-mode code, if reported.
    #[must_use]
    pub fn operating_code(&self) -> Option<i64> {
        self.grill_state
    }

    /// Returns the decoded operating mode. Missing codes decode as `Off`.
    #[must_use]
    pub fn operating_state(&self) -> OperatingState {
        OperatingState::from_code(self.grill_state.unwrap_or(0))
    }

    /// Returns true if the grill reports a running operating mode.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.operating_state().is_running()
    }

    /// Returns true while grilling or smoking. Fan mode (cool-down) does not
    /// count.
    #[must_use]
    pub fn is_cooking(&self) -> bool {
        matches!(
            self.operating_state(),
            OperatingState::Grilling | OperatingState::Smoking
        )
    }

    /// Returns the mode a mode selector should show.
    ///
    /// `None` means the snapshot does not say (grill off); callers keep their
    /// last selection in that case.
    #[must_use]
    pub fn selected_mode(&self) -> Option<GrillMode> {
        match (self.grill_state.unwrap_or(0), self.grill_mode.unwrap_or(0)) {
            (3, _) => Some(GrillMode::Smoke),
            (_, 3) => Some(GrillMode::Pizza),
            (1 | 2, _) => Some(GrillMode::Grill),
            _ => None,
        }
    }

    /// Returns the active warning.
    #[must_use]
    pub fn warning(&self) -> Warning {
        Warning::from_code(self.warning_code.unwrap_or(0))
    }

    /// Returns the raw warning code.
    #[must_use]
    pub fn warning_code(&self) -> Option<i64> {
        self.warning_code
    }

    /// Returns the fire (ignitor) state code.
    #[must_use]
    pub fn fire_state(&self) -> Option<i64> {
        self.fire_state
    }

    /// Returns the ignition progress indicator.
    #[must_use]
    pub fn fire_state_progress(&self) -> Option<i64> {
        self.fire_state_progress
    }

    /// Returns the raw grill mode code.
    #[must_use]
    pub fn grill_mode_code(&self) -> Option<i64> {
        self.grill_mode
    }

    // ========== Firmware ==========

    /// Returns the controller firmware version.
    #[must_use]
    pub fn firmware_version(&self) -> Option<&str> {
        self.firmware_version.as_deref()
    }

    /// Returns the firmware software path.
    #[must_use]
    pub fn software_path(&self) -> Option<&str> {
        self.software_path.as_deref()
    }

    /// Returns when the cloud last heard from the grill.
    ///
    /// Returns `None` if the field is missing or not a valid RFC 3339 timestamp.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_updated.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    // ========== Cook profile ==========

    /// Returns the cook-program status.
    #[must_use]
    pub fn profile_status(&self) -> ProfileStatus {
        match (self.cur_profile_id.unwrap_or(0), self.cur_profile_paused.unwrap_or(0)) {
            (id, _) if id <= 0 => ProfileStatus::None,
            (_, 0) => ProfileStatus::Active,
            _ => ProfileStatus::Paused,
        }
    }

    /// Returns the running profile id, 0 when none.
    #[must_use]
    pub fn profile_id(&self) -> i64 {
        self.cur_profile_id.unwrap_or(0)
    }

    /// Returns `(current step, number of steps)` of the running profile.
    #[must_use]
    pub fn profile_step(&self) -> (i64, i64) {
        (
            self.cur_profile_step_id.unwrap_or(0),
            self.num_profile_steps.unwrap_or(0),
        )
    }

    /// Returns the time left in the running profile.
    ///
    /// `None` when no profile runs or the profile has no end.
    #[must_use]
    pub fn profile_remaining(&self) -> Option<Duration> {
        let secs = u64::try_from(self.profile_remaining_time?).ok()?;
        (secs != PROFILE_TIME_INFINITE).then(|| Duration::from_secs(secs))
    }

    /// Returns what the controller does when the profile ends.
    #[must_use]
    pub fn profile_end_mode(&self) -> Option<i64> {
        self.profile_end_mode
    }

    /// Returns fields not modelled by this struct.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::Bool(b)) => Some(i64::from(b)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(value.filter(|v: &f64| v.is_finite()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
