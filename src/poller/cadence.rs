// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling interval selection.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

// ============================================================================
// PollingConfig - Interval settings
// ============================================================================

/// Interval settings for the adaptive poller.
///
/// # Examples
///
/// ```
/// use gmg_cloud::poller::PollingConfig;
/// use std::time::Duration;
///
/// let config = PollingConfig::new();
/// assert_eq!(config.active_interval(), Duration::from_secs(2));
///
/// let config = PollingConfig::new()
///     .with_idle_interval(Duration::from_secs(120))
///     .with_burst_duration(Duration::from_secs(10));
/// assert_eq!(config.idle_interval(), Duration::from_secs(120));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    burst_interval: Duration,
    active_interval: Duration,
    idle_interval: Duration,
    fallback_interval: Duration,
    burst_duration: Duration,
}

impl PollingConfig {
    /// Interval while a recent command is being followed up.
    pub const DEFAULT_BURST_INTERVAL: Duration = Duration::from_secs(1);
    /// Interval while at least one grill is running.
    pub const DEFAULT_ACTIVE_INTERVAL: Duration = Duration::from_secs(2);
    /// Interval while every grill is off or offline.
    pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_secs(60);
    /// Interval before the first sweep has completed.
    pub const DEFAULT_FALLBACK_INTERVAL: Duration = Duration::from_secs(30);
    /// How long burst mode lasts after a request.
    pub const DEFAULT_BURST_DURATION: Duration = Duration::from_secs(30);

    /// Creates a configuration with the default intervals.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            burst_interval: Self::DEFAULT_BURST_INTERVAL,
            active_interval: Self::DEFAULT_ACTIVE_INTERVAL,
            idle_interval: Self::DEFAULT_IDLE_INTERVAL,
            fallback_interval: Self::DEFAULT_FALLBACK_INTERVAL,
            burst_duration: Self::DEFAULT_BURST_DURATION,
        }
    }

    /// Sets the burst interval.
    #[must_use]
    pub const fn with_burst_interval(mut self, interval: Duration) -> Self {
        self.burst_interval = interval;
        self
    }

    /// Sets the active interval.
    #[must_use]
    pub const fn with_active_interval(mut self, interval: Duration) -> Self {
        self.active_interval = interval;
        self
    }

    /// Sets the idle interval.
    #[must_use]
    pub const fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval = interval;
        self
    }

    /// Sets the interval used before the first sweep.
    #[must_use]
    pub const fn with_fallback_interval(mut self, interval: Duration) -> Self {
        self.fallback_interval = interval;
        self
    }

    /// Sets how long a burst lasts.
    #[must_use]
    pub const fn with_burst_duration(mut self, duration: Duration) -> Self {
        self.burst_duration = duration;
        self
    }

    /// Returns the burst interval.
    #[must_use]
    pub const fn burst_interval(&self) -> Duration {
        self.burst_interval
    }

    /// Returns the active interval.
    #[must_use]
    pub const fn active_interval(&self) -> Duration {
        self.active_interval
    }

    /// Returns the idle interval.
    #[must_use]
    pub const fn idle_interval(&self) -> Duration {
        self.idle_interval
    }

    /// Returns the fallback interval.
    #[must_use]
    pub const fn fallback_interval(&self) -> Duration {
        self.fallback_interval
    }

    /// Returns the burst duration.
    #[must_use]
    pub const fn burst_duration(&self) -> Duration {
        self.burst_duration
    }

    /// Returns the interval of a cadence.
    #[must_use]
    pub const fn interval(&self, cadence: Cadence) -> Duration {
        match cadence {
            Cadence::Fallback => self.fallback_interval,
            Cadence::Burst => self.burst_interval,
            Cadence::Active => self.active_interval,
            Cadence::Idle => self.idle_interval,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Cadence - Which interval governs
// ============================================================================

/// The rule currently governing the polling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    /// No sweep has completed yet.
    Fallback,
    /// A command was sent recently.
    Burst,
    /// At least one grill was running at the last sweep.
    Active,
    /// Nothing was running at the last sweep.
    Idle,
}

impl Cadence {
    /// Returns the cadence name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fallback => "fallback",
            Self::Burst => "burst",
            Self::Active => "active",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PollingCadence - State machine
// ============================================================================

/// Decides the polling interval from recent commands and grill activity.
///
/// Precedence is burst, then active, then idle. The fallback interval only
/// applies until the first recomputation. This type does no I/O and takes
/// the current instant as a parameter.
///
/// # Examples
///
/// ```
/// use gmg_cloud::poller::{Cadence, PollingCadence, PollingConfig};
/// use std::time::Duration;
/// use tokio::time::Instant;
///
/// let mut cadence = PollingCadence::new(PollingConfig::new());
/// assert_eq!(cadence.cadence(), Cadence::Fallback);
///
/// let now = Instant::now();
/// cadence.recompute(now, false);
/// assert_eq!(cadence.interval(), Duration::from_secs(60));
///
/// cadence.request_burst(now);
/// assert_eq!(cadence.interval(), Duration::from_secs(1));
///
/// cadence.recompute(now + Duration::from_secs(31), true);
/// assert_eq!(cadence.cadence(), Cadence::Active);
/// ```
#[derive(Debug, Clone)]
pub struct PollingCadence {
    config: PollingConfig,
    current: Cadence,
    burst_until: Option<Instant>,
}

impl PollingCadence {
    /// Creates a cadence in the fallback state.
    #[must_use]
    pub fn new(config: PollingConfig) -> Self {
        Self {
            config,
            current: Cadence::Fallback,
            burst_until: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PollingConfig {
        &self.config
    }

    /// Returns the governing cadence.
    #[must_use]
    pub fn cadence(&self) -> Cadence {
        self.current
    }

    /// Returns the interval of the governing cadence.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.config.interval(self.current)
    }

    /// Returns when the current burst ends, if one was ever requested.
    #[must_use]
    pub fn burst_until(&self) -> Option<Instant> {
        self.burst_until
    }

    /// Returns true while `now` is before the burst expiry.
    #[must_use]
    pub fn is_burst_active(&self, now: Instant) -> bool {
        self.burst_until.is_some_and(|until| now < until)
    }

    /// Enters burst mode until `now + burst_duration`.
    ///
    /// A later expiry already set is kept: re-arming never shortens a burst.
    /// Returns true if the interval changed.
    pub fn request_burst(&mut self, now: Instant) -> bool {
        let until = now + self.config.burst_duration;
        self.burst_until = Some(self.burst_until.map_or(until, |current| current.max(until)));
        self.set(Cadence::Burst)
    }

    /// Picks the cadence after a sweep. Returns true if the interval changed.
    pub fn recompute(&mut self, now: Instant, any_active: bool) -> bool {
        let next = if self.is_burst_active(now) {
            Cadence::Burst
        } else if any_active {
            Cadence::Active
        } else {
            Cadence::Idle
        };
        self.set(next)
    }

    fn set(&mut self, next: Cadence) -> bool {
        let before = self.interval();
        self.current = next;
        before != self.interval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn default_config_values() {
        let config = PollingConfig::default();
        assert_eq!(config.burst_interval(), secs(1));
        assert_eq!(config.active_interval(), secs(2));
        assert_eq!(config.idle_interval(), secs(60));
        assert_eq!(config.fallback_interval(), secs(30));
        assert_eq!(config.burst_duration(), secs(30));
    }

    #[test]
    fn starts_at_fallback() {
        let cadence = PollingCadence::new(PollingConfig::new());
        assert_eq!(cadence.cadence(), Cadence::Fallback);
        assert_eq!(cadence.interval(), secs(30));
        assert!(cadence.burst_until().is_none());
    }

    #[test]
    fn activity_selects_active_or_idle() {
        let now = Instant::now();
        let mut cadence = PollingCadence::new(PollingConfig::new());

        assert!(cadence.recompute(now, true));
        assert_eq!(cadence.interval(), secs(2));

        assert!(cadence.recompute(now, false));
        assert_eq!(cadence.interval(), secs(60));

        assert!(!cadence.recompute(now, false));
    }

    #[test]
    fn burst_wins_until_expiry() {
        let now = Instant::now();
        let mut cadence = PollingCadence::new(PollingConfig::new());
        cadence.recompute(now, false);

        assert!(cadence.request_burst(now));
        assert_eq!(cadence.interval(), secs(1));

        cadence.recompute(now + secs(29), true);
        assert_eq!(cadence.cadence(), Cadence::Burst);

        cadence.recompute(now + secs(30), true);
        assert_eq!(cadence.cadence(), Cadence::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_expires_as_the_clock_advances() {
        let mut cadence = PollingCadence::new(PollingConfig::new());
        cadence.recompute(Instant::now(), false);
        cadence.request_burst(Instant::now());

        tokio::time::advance(secs(29)).await;
        assert!(cadence.is_burst_active(Instant::now()));
        assert!(!cadence.recompute(Instant::now(), false));

        tokio::time::advance(secs(1)).await;
        assert!(!cadence.is_burst_active(Instant::now()));
        assert!(cadence.recompute(Instant::now(), false));
        assert_eq!(cadence.cadence(), Cadence::Idle);
        assert_eq!(cadence.interval(), secs(60));
    }

    #[test]
    fn rearming_extends_but_never_shortens() {
        let config = PollingConfig::new().with_burst_duration(secs(10));
        let mut cadence = PollingCadence::new(config);
        let now = Instant::now();

        cadence.request_burst(now + secs(5));
        assert_eq!(cadence.burst_until(), Some(now + secs(15)));

        // An earlier request must not pull the expiry in.
        cadence.request_burst(now);
        assert_eq!(cadence.burst_until(), Some(now + secs(15)));

        cadence.request_burst(now + secs(8));
        assert_eq!(cadence.burst_until(), Some(now + secs(18)));
    }

    #[test]
    fn rearming_during_burst_reports_no_change() {
        let now = Instant::now();
        let mut cadence = PollingCadence::new(PollingConfig::new());
        assert!(cadence.request_burst(now));
        assert!(!cadence.request_burst(now + secs(1)));
    }

    #[test]
    fn equal_intervals_are_not_a_change() {
        let config = PollingConfig::new().with_active_interval(secs(60));
        let mut cadence = PollingCadence::new(config);
        let now = Instant::now();

        cadence.recompute(now, true);
        assert!(!cadence.recompute(now, false));
        assert_eq!(cadence.cadence(), Cadence::Idle);
    }

    #[test]
    fn cadence_names() {
        assert_eq!(Cadence::Burst.to_string(), "burst");
        assert_eq!(Cadence::Fallback.as_str(), "fallback");
    }
}
