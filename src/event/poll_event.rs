// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poller event types.

use std::sync::Arc;
use std::time::Duration;

use crate::poller::Cadence;
use crate::state::Dataset;

/// Events emitted by the poller.
///
/// # Examples
///
/// ```
/// use gmg_cloud::event::PollEvent;
/// use gmg_cloud::poller::Cadence;
/// use std::time::Duration;
///
/// let event = PollEvent::IntervalChanged {
///     cadence: Cadence::Burst,
///     interval: Duration::from_secs(1),
/// };
/// assert!(event.dataset().is_none());
/// ```
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// A sweep finished and its dataset was published.
    SweepCompleted {
        /// The complete dataset of the sweep.
        dataset: Arc<Dataset>,
    },

    /// A sweep could not be completed. The previous dataset stays published.
    SweepFailed {
        /// Why the sweep failed.
        error: String,
    },

    /// The polling interval changed.
    IntervalChanged {
        /// The cadence now governing.
        cadence: Cadence,
        /// The new interval.
        interval: Duration,
    },
}

impl PollEvent {
    /// Returns the dataset carried by a [`SweepCompleted`](Self::SweepCompleted) event.
    #[must_use]
    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        match self {
            Self::SweepCompleted { dataset } => Some(dataset),
            _ => None,
        }
    }

    /// Returns true for events reporting a sweep outcome.
    #[must_use]
    pub fn is_sweep(&self) -> bool {
        matches!(self, Self::SweepCompleted { .. } | Self::SweepFailed { .. })
    }
}
