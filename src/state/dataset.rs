// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The per-sweep dataset published to the host.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::device::Device;

use super::GrillState;

/// Status label shown for grills the cloud cannot reach.
const OFFLINE_LABEL: &str = "offline";

/// Directory info and latest snapshot of one grill.
#[derive(Debug, Clone, PartialEq)]
pub struct GrillEntry {
    info: Device,
    state: Option<GrillState>,
}

impl GrillEntry {
    /// Creates an entry. The grill counts as online iff `state` is present.
    #[must_use]
    pub fn new(info: Device, state: Option<GrillState>) -> Self {
        Self { info, state }
    }

    /// Returns the directory record.
    #[must_use]
    pub fn info(&self) -> &Device {
        &self.info
    }

    /// Returns the snapshot, absent while the grill is offline.
    #[must_use]
    pub fn state(&self) -> Option<&GrillState> {
        self.state.as_ref()
    }

    /// Returns true if the cloud returned a snapshot for this grill.
    #[must_use]
    pub fn online(&self) -> bool {
        self.state.is_some()
    }

    /// Returns true if the grill is online and running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.as_ref().is_some_and(GrillState::is_running)
    }

    /// Returns the status label: `offline`, or the operating state.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        self.state
            .as_ref()
            .map_or(OFFLINE_LABEL, |s| s.operating_state().label())
    }
}

/// Result of one complete sweep over the directory.
///
/// A dataset always contains exactly one entry per grill that was swept; it
/// is built once and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use gmg_cloud::Device;
/// use gmg_cloud::state::{Dataset, GrillEntry};
///
/// let dataset = Dataset::from_entries(vec![GrillEntry::new(Device::new("1", "remote"), None)]);
/// assert_eq!(dataset.len(), 1);
/// assert!(!dataset.any_active());
/// assert_eq!(dataset.get("1").unwrap().status_label(), "offline");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    grills: HashMap<String, GrillEntry>,
    any_active: bool,
    completed_at: DateTime<Utc>,
}

impl Dataset {
    /// Builds a dataset from the entries of a finished sweep.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = GrillEntry>) -> Self {
        let grills: HashMap<String, GrillEntry> = entries
            .into_iter()
            .map(|entry| (entry.info.id().to_string(), entry))
            .collect();
        let any_active = grills.values().any(GrillEntry::is_running);

        Self {
            grills,
            any_active,
            completed_at: Utc::now(),
        }
    }

    /// Returns the entry for a grill id.
    #[must_use]
    pub fn get(&self, grill_id: &str) -> Option<&GrillEntry> {
        self.grills.get(grill_id)
    }

    /// Iterates over `(grill id, entry)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GrillEntry)> {
        self.grills.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Returns the number of grills in the dataset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grills.len()
    }

    /// Returns true if the dataset has no grills.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grills.is_empty()
    }

    /// Returns the number of grills that answered this sweep.
    #[must_use]
    pub fn online_count(&self) -> usize {
        self.grills.values().filter(|e| e.online()).count()
    }

    /// Returns true if at least one grill reported a running mode.
    #[must_use]
    pub fn any_active(&self) -> bool {
        self.any_active
    }

    /// Returns when the sweep finished.
    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
